#[cfg(feature = "cli")]
pub use sampling::{SystemMonitor, SystemStats};

#[cfg(not(feature = "cli"))]
pub use noop::SystemMonitor;

#[cfg(feature = "cli")]
mod sampling {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

    #[derive(Debug, Clone)]
    pub struct SystemStats {
        pub cpu_usage: f32,
        pub memory_usage_mb: u64,
        pub memory_usage_percent: f32,
        pub peak_memory_mb: u64,
        /// Time since the previous sample (or since start for the first one)
        pub phase_time: Duration,
        pub elapsed_time: Duration,
    }

    struct SamplerState {
        system: System,
        peak_memory_mb: u64,
        last_sample: Instant,
    }

    /// Samples this process' CPU and memory between pipeline phases.
    pub struct SystemMonitor {
        state: Option<(Pid, Mutex<SamplerState>)>,
        start_time: Instant,
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            let start_time = Instant::now();
            if !enabled {
                return Self {
                    state: None,
                    start_time,
                };
            }

            let state = match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new();
                    system.refresh_memory();
                    Some((
                        pid,
                        Mutex::new(SamplerState {
                            system,
                            peak_memory_mb: 0,
                            last_sample: start_time,
                        }),
                    ))
                }
                Err(e) => {
                    tracing::warn!("⚠️ Could not resolve current PID, monitoring disabled: {}", e);
                    None
                }
            };

            Self { state, start_time }
        }

        pub fn is_enabled(&self) -> bool {
            self.state.is_some()
        }

        pub fn get_stats(&self) -> Option<SystemStats> {
            let (pid, state) = self.state.as_ref()?;
            let mut state = state.lock().ok()?;

            state.system.refresh_memory();
            state.system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[*pid]),
                true,
                ProcessRefreshKind::nothing().with_cpu().with_memory(),
            );

            let (cpu_usage, memory_mb) = {
                let process = state.system.process(*pid)?;
                (process.cpu_usage(), process.memory() / 1024 / 1024)
            };
            let total_mb = state.system.total_memory() / 1024 / 1024;
            state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

            let now = Instant::now();
            let phase_time = now.duration_since(state.last_sample);
            state.last_sample = now;

            Some(SystemStats {
                cpu_usage,
                memory_usage_mb: memory_mb,
                memory_usage_percent: if total_mb > 0 {
                    memory_mb as f32 / total_mb as f32 * 100.0
                } else {
                    0.0
                },
                peak_memory_mb: state.peak_memory_mb,
                phase_time,
                elapsed_time: now.duration_since(self.start_time),
            })
        }

        pub fn log_stats(&self, phase: &str) {
            if let Some(stats) = self.get_stats() {
                tracing::info!(
                    "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Phase: {:?}, Total: {:?}",
                    phase,
                    stats.cpu_usage,
                    stats.memory_usage_mb,
                    stats.memory_usage_percent,
                    stats.peak_memory_mb,
                    stats.phase_time,
                    stats.elapsed_time
                );
            }
        }

        pub fn log_final_stats(&self) {
            if let Some(stats) = self.get_stats() {
                tracing::info!(
                    "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                    stats.elapsed_time,
                    stats.peak_memory_mb
                );
            }
        }
    }

}

// 沒有 sysinfo 時的空實現
#[cfg(not(feature = "cli"))]
mod noop {
    pub struct SystemMonitor;

    impl SystemMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn log_stats(&self, _phase: &str) {}

        pub fn log_final_stats(&self) {}
    }
}
