use serde::{Deserialize, Serialize};

use crate::scale::{ColorScale, SqrtScale};
use crate::style::Rgb;

/// Placement of the legend key. Geometry never depends on the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendLayout {
    /// Translation of the whole key in canvas pixels.
    pub origin: (f64, f64),
    /// Density range the key spans; open bucket ends are clamped to it.
    pub domain: (f64, f64),
    /// Horizontal pixel range of the key, inside the translated group.
    pub range: (f64, f64),
    pub swatch_height: f64,
    pub tick_size: f64,
    pub caption: String,
    /// Caption baseline relative to the swatches' top edge.
    pub caption_offset: f64,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            origin: (-50.0, 600.0),
            domain: (0.0, 1500.0),
            range: (440.0, 1000.0),
            swatch_height: 8.0,
            tick_size: 13.0,
            caption: "Population density".to_string(),
            caption_offset: -6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub bucket: usize,
    pub lo: f64,
    pub hi: f64,
    pub x: f64,
    pub width: f64,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Swatches, caption and axis ticks in legend-local coordinates
/// (translate by `origin` to place them on the canvas). The caption is
/// drawn bold with its start at `x`; tick labels are centred under ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub origin: (f64, f64),
    pub swatch_height: f64,
    pub tick_size: f64,
    pub swatches: Vec<Swatch>,
    pub caption: Caption,
    pub ticks: Vec<Tick>,
}

impl Legend {
    pub fn build(scale: &ColorScale, layout: &LegendLayout) -> Self {
        let x = SqrtScale::new(layout.domain, layout.range);
        let swatches = (0..scale.bucket_count())
            .map(|bucket| {
                let (lo, hi) = scale.invert_extent(bucket);
                let lo = lo.unwrap_or(layout.domain.0);
                let hi = hi.unwrap_or(layout.domain.1);
                let x0 = x.apply_round(lo);
                Swatch {
                    bucket,
                    lo,
                    hi,
                    x: x0,
                    width: x.apply_round(hi) - x0,
                    fill: scale.color(lo),
                }
            })
            .collect();
        let ticks = scale
            .thresholds()
            .iter()
            .map(|&value| Tick {
                value,
                x: x.apply_round(value),
                label: format_tick(value),
            })
            .collect();

        Self {
            origin: layout.origin,
            swatch_height: layout.swatch_height,
            tick_size: layout.tick_size,
            swatches,
            caption: Caption {
                text: layout.caption.clone(),
                x: layout.range.0,
                y: layout.caption_offset,
            },
            ticks,
        }
    }

    /// Re-evaluate swatch fills after a palette switch.
    pub fn recolor(&mut self, scale: &ColorScale) {
        for swatch in &mut self.swatches {
            swatch.fill = scale.color(swatch.lo);
        }
    }
}

/// Axis label: integers with thousands separators, other values as-is.
pub fn format_tick(value: f64) -> String {
    if value.fract() != 0.0 || value.abs() >= 1e15 {
        return value.to_string();
    }
    let digits = (value.abs() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
