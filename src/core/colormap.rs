/// Sequential colormaps sampled at ten evenly spaced stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Viridis,
    Plasma,
    Inferno,
    Magma,
}

const VIRIDIS: [u32; 10] = [
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b,
    0xfde725,
];
const PLASMA: [u32; 10] = [
    0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26,
    0xf0f921,
];
const INFERNO: [u32; 10] = [
    0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d,
    0xfcffa4,
];
const MAGMA: [u32; 10] = [
    0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d,
    0xfcfdbf,
];

impl Colormap {
    pub const NAMES: &'static [&'static str] = &["viridis", "plasma", "inferno", "magma"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Some(Self::Viridis),
            "plasma" => Some(Self::Plasma),
            "inferno" => Some(Self::Inferno),
            "magma" => Some(Self::Magma),
            _ => None,
        }
    }

    fn stops(&self) -> &'static [u32; 10] {
        match self {
            Self::Viridis => &VIRIDIS,
            Self::Plasma => &PLASMA,
            Self::Inferno => &INFERNO,
            Self::Magma => &MAGMA,
        }
    }

    /// Linear interpolation between stops; `t` is clamped to [0, 1].
    pub fn sample(&self, t: f64) -> String {
        let stops = self.stops();
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (stops.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(stops.len() - 1);
        let frac = scaled - lower as f64;

        let channel = |color: u32, shift: u32| ((color >> shift) & 0xff) as f64;
        let mix = |shift: u32| {
            let a = channel(stops[lower], shift);
            let b = channel(stops[upper], shift);
            (a + (b - a) * frac).round() as u8
        };

        format!("#{:02x}{:02x}{:02x}", mix(16), mix(8), mix(0))
    }
}
