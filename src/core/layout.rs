use crate::config::CloudConfig;
use crate::core::colormap::Colormap;
use crate::domain::model::{PlacedWord, WordCloud, WordFrequency};
use crate::utils::error::{PipelineError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Baseline offset from the top of a horizontal box, as a fraction of font size.
pub const ASCENT: f64 = 0.95;
const LINE_HEIGHT: f64 = 1.2;

const GRID_CELL: u32 = 4;
/// Radius growth per radian of the spiral.
const SPIRAL_GROWTH: f64 = 2.0;
/// Approximate distance between consecutive spiral samples.
const SPIRAL_ARC_STEP: f64 = 3.0;

fn char_width_factor(c: char) -> f64 {
    match c {
        'i' | 'l' | 'j' | '\'' | '.' | ',' | '!' | '|' | ':' | ';' => 0.28,
        'f' | 't' | 'r' | 'I' => 0.38,
        'm' | 'w' => 0.85,
        'M' | 'W' => 0.95,
        c if c.is_uppercase() => 0.7,
        c if c.is_ascii_digit() => 0.6,
        _ => 0.58,
    }
}

/// 估計文字框大小 (寬, 高)；直排時交換
pub fn text_extent(word: &str, font_size: u32, vertical: bool) -> (u32, u32) {
    let size = font_size as f64;
    let advance: f64 = word.chars().map(char_width_factor).sum();
    let width = (advance * size).ceil().max(1.0) as u32;
    let height = (LINE_HEIGHT * size).ceil().max(1.0) as u32;
    if vertical {
        (height, width)
    } else {
        (width, height)
    }
}

/// Coarse occupancy bitmap with a summed-area table for O(1) box queries.
struct OccupancyGrid {
    width: u32,
    height: u32,
    cols: usize,
    rows: usize,
    occupied: Vec<bool>,
    sums: Vec<u32>,
}

impl OccupancyGrid {
    fn new(width: u32, height: u32) -> Self {
        let cols = width.div_ceil(GRID_CELL) as usize;
        let rows = height.div_ceil(GRID_CELL) as usize;
        Self {
            width,
            height,
            cols,
            rows,
            occupied: vec![false; cols * rows],
            sums: vec![0; (cols + 1) * (rows + 1)],
        }
    }

    fn cell_span(&self, x: u32, y: u32, w: u32, h: u32) -> (usize, usize, usize, usize) {
        let c0 = (x / GRID_CELL) as usize;
        let r0 = (y / GRID_CELL) as usize;
        let c1 = (((x + w - 1) / GRID_CELL) as usize).min(self.cols - 1);
        let r1 = (((y + h - 1) / GRID_CELL) as usize).min(self.rows - 1);
        (c0, r0, c1, r1)
    }

    fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        let (c0, r0, c1, r1) = self.cell_span(x, y, w, h);
        let stride = self.cols + 1;
        let at = |r: usize, c: usize| self.sums[r * stride + c];
        at(r1 + 1, c1 + 1) + at(r0, c0) == at(r0, c1 + 1) + at(r1 + 1, c0)
    }

    fn occupy(&mut self, x: u32, y: u32, w: u32, h: u32, margin: u32) {
        let x0 = x.saturating_sub(margin);
        let y0 = y.saturating_sub(margin);
        let x1 = x.saturating_add(w).saturating_add(margin).min(self.width);
        let y1 = y.saturating_add(h).saturating_add(margin).min(self.height);
        let (c0, r0, c1, r1) = self.cell_span(x0, y0, x1 - x0, y1 - y0);
        for r in r0..=r1 {
            for c in c0..=c1 {
                self.occupied[r * self.cols + c] = true;
            }
        }
        self.rebuild_sums();
    }

    fn rebuild_sums(&mut self) {
        let stride = self.cols + 1;
        for r in 0..self.rows {
            let mut row_sum = 0;
            for c in 0..self.cols {
                row_sum += self.occupied[r * self.cols + c] as u32;
                self.sums[(r + 1) * stride + c + 1] = self.sums[r * stride + c + 1] + row_sum;
            }
        }
    }

    /// 由畫布中心沿橢圓螺旋往外找第一個可放置的位置
    fn find_position(&self, w: u32, h: u32, start_angle: f64) -> Option<(u32, u32)> {
        if w > self.width || h > self.height {
            return None;
        }

        let cx = (self.width - w) as f64 / 2.0;
        let cy = (self.height - h) as f64 / 2.0;
        let aspect = self.height as f64 / self.width as f64;
        let max_radius = self.width.max(self.height) as f64;

        let mut theta = 0.0_f64;
        loop {
            let radius = SPIRAL_GROWTH * theta;
            if radius > max_radius {
                return None;
            }

            let px = (cx + radius * (theta + start_angle).cos()).round();
            let py = (cy + radius * aspect * (theta + start_angle).sin()).round();
            if px >= 0.0 && py >= 0.0 {
                let (x, y) = (px as u32, py as u32);
                if x + w <= self.width && y + h <= self.height && self.is_free(x, y, w, h) {
                    return Some((x, y));
                }
            }

            theta += (SPIRAL_ARC_STEP / radius.max(1.0)).min(0.5);
        }
    }
}

pub fn layout_cloud(frequencies: &[WordFrequency], config: &CloudConfig) -> Result<WordCloud> {
    let colormap = Colormap::from_name(&config.colormap).ok_or_else(|| {
        PipelineError::InvalidConfigValueError {
            field: "wordcloud.colormap".to_string(),
            value: config.colormap.clone(),
            reason: format!("Supported values: {}", Colormap::NAMES.join(", ")),
        }
    })?;

    let mut cloud = WordCloud {
        width: config.width,
        height: config.height,
        background_color: config.background_color.clone(),
        words: Vec::new(),
    };

    let candidates: Vec<&WordFrequency> = frequencies
        .iter()
        .filter(|f| f.count > 0)
        .take(config.max_words)
        .collect();
    let Some(max_count) = candidates.first().map(|f| f.count as f64) else {
        return Ok(cloud);
    };
    if config.width == 0 || config.height == 0 {
        return Ok(cloud);
    }

    let mut rng = StdRng::seed_from_u64(config.random_seed);
    let mut grid = OccupancyGrid::new(config.width, config.height);
    let min_font_size = config.min_font_size.max(1) as i64;
    let font_step = config.font_step.max(1) as i64;
    let rs = config.relative_scaling;

    let mut font_size = config.max_font_size as i64;
    let mut last_freq = 1.0;

    for entry in candidates {
        let freq = entry.count as f64 / max_count;
        if rs != 0.0 {
            font_size = ((rs * (freq / last_freq) + (1.0 - rs)) * font_size as f64).round() as i64;
        }

        let mut vertical = rng.gen::<f64>() >= config.prefer_horizontal;
        let start_angle = rng.gen::<f64>() * TAU;
        let mut tried_other_orientation = false;

        let placement = loop {
            if font_size < min_font_size {
                break None;
            }
            let (w, h) = text_extent(&entry.word, font_size as u32, vertical);
            if let Some((x, y)) = grid.find_position(w, h, start_angle) {
                break Some((x, y, w, h));
            }
            if !tried_other_orientation && config.prefer_horizontal < 1.0 {
                vertical = !vertical;
                tried_other_orientation = true;
            } else {
                font_size -= font_step;
                vertical = false;
            }
        };

        // 字級已低於下限，剩下的詞也不可能放得下
        let Some((x, y, w, h)) = placement else {
            tracing::debug!(
                "Stopping layout at '{}': font size fell below {}",
                entry.word,
                min_font_size
            );
            break;
        };

        grid.occupy(x, y, w, h, config.margin);
        cloud.words.push(PlacedWord {
            word: entry.word.clone(),
            count: entry.count,
            font_size: font_size as u32,
            x,
            y,
            width: w,
            height: h,
            vertical,
            color: colormap.sample(rng.gen::<f64>()),
        });
        last_freq = freq;
    }

    Ok(cloud)
}
