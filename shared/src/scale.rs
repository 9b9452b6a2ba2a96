use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::style::Rgb;

/// Density class boundaries, people per square mile.
pub const THRESHOLDS: [f64; 8] = [1.0, 10.0, 25.0, 50.0, 100.0, 200.0, 500.0, 1000.0];

/// ColorBrewer OrRd, 8 classes.
const OR_RD: [Rgb; 8] = [
    Rgb(0xff, 0xf7, 0xec),
    Rgb(0xfe, 0xe8, 0xc8),
    Rgb(0xfd, 0xd4, 0x9e),
    Rgb(0xfd, 0xbb, 0x84),
    Rgb(0xfc, 0x8d, 0x59),
    Rgb(0xef, 0x65, 0x48),
    Rgb(0xd7, 0x30, 0x1f),
    Rgb(0x99, 0x00, 0x00),
];

/// ColorBrewer Blues, 8 classes.
const BLUES: [Rgb; 8] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x45, 0x94),
];

/// The two palettes the map can cycle through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    #[default]
    OrRd,
    Blues,
}

impl PaletteKind {
    pub fn colors(self) -> &'static [Rgb; 8] {
        match self {
            PaletteKind::OrRd => &OR_RD,
            PaletteKind::Blues => &BLUES,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PaletteKind::OrRd => PaletteKind::Blues,
            PaletteKind::Blues => PaletteKind::OrRd,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteKind::OrRd => "orrd",
            PaletteKind::Blues => "blues",
        }
    }
}

impl fmt::Display for PaletteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaletteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orrd" | "or_rd" => Ok(PaletteKind::OrRd),
            "blues" => Ok(PaletteKind::Blues),
            other => Err(format!("unknown palette: {other}")),
        }
    }
}

/// Threshold scale from density to palette color.
///
/// Bucket `i` covers `[t_i, t_{i+1})`. Values under the first threshold
/// fall into bucket 0 and values at or over the last threshold into the
/// last bucket, so there is exactly one bucket per threshold and one color
/// per bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    thresholds: [f64; 8],
    palette: PaletteKind,
}

impl ColorScale {
    pub fn new(palette: PaletteKind) -> Self {
        Self {
            thresholds: THRESHOLDS,
            palette,
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Swap the colors; thresholds stay put.
    pub fn set_palette(&mut self, palette: PaletteKind) {
        self.palette = palette;
    }

    pub fn colors(&self) -> &'static [Rgb; 8] {
        self.palette.colors()
    }

    pub fn bucket_count(&self) -> usize {
        self.thresholds.len()
    }

    /// Bucket index for `value`, `None` for NaN.
    pub fn bucket(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let above = self.thresholds.partition_point(|t| *t <= value);
        Some(above.saturating_sub(1))
    }

    /// Color for a value that is present but may be NaN.
    pub fn color(&self, value: f64) -> Rgb {
        match self.bucket(value) {
            Some(i) => self.colors()[i],
            None => self.unknown(),
        }
    }

    /// Color for a lookup that may have missed.
    pub fn color_of(&self, value: Option<f64>) -> Rgb {
        value.map_or_else(|| self.unknown(), |v| self.color(v))
    }

    /// Fallback for NaN and missing densities: the lowest bucket.
    pub fn unknown(&self) -> Rgb {
        self.colors()[0]
    }

    /// Value extent of a bucket. Open ends are `None`.
    pub fn invert_extent(&self, bucket: usize) -> (Option<f64>, Option<f64>) {
        let lo = if bucket == 0 {
            None
        } else {
            self.thresholds.get(bucket).copied()
        };
        (lo, self.thresholds.get(bucket + 1).copied())
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(PaletteKind::default())
    }
}

/// Continuous square-root scale, used for legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let d0 = signed_sqrt(self.domain.0);
        let d1 = signed_sqrt(self.domain.1);
        if d1 == d0 {
            return self.range.0;
        }
        let t = (signed_sqrt(value) - d0) / (d1 - d0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn apply_round(&self, value: f64) -> f64 {
        self.apply(value).round()
    }
}

fn signed_sqrt(v: f64) -> f64 {
    v.signum() * v.abs().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual} (diff: {diff})");
    }

    #[test]
    fn buckets_are_interval_anchored() {
        let scale = ColorScale::default();
        assert_eq!(scale.bucket(-5.0), Some(0));
        assert_eq!(scale.bucket(0.5), Some(0));
        assert_eq!(scale.bucket(1.0), Some(0));
        assert_eq!(scale.bucket(9.99), Some(0));
        assert_eq!(scale.bucket(10.0), Some(1));
        assert_eq!(scale.bucket(25.0), Some(2));
        assert_eq!(scale.bucket(42.0), Some(2));
        assert_eq!(scale.bucket(50.0), Some(3));
        assert_eq!(scale.bucket(999.0), Some(6));
        assert_eq!(scale.bucket(1000.0), Some(7));
        assert_eq!(scale.bucket(f64::INFINITY), Some(7));
        assert_eq!(scale.bucket(f64::NAN), None);
    }

    #[test]
    fn bucket_is_monotonic_and_skips_nothing() {
        let scale = ColorScale::default();
        let mut last = 0;
        let mut v = -10.0;
        while v < 2000.0 {
            let b = scale.bucket(v).unwrap();
            assert!(b == last || b == last + 1, "jump from {last} to {b} at {v}");
            last = b;
            v += 0.25;
        }
        assert_eq!(last, scale.bucket_count() - 1);
    }

    #[test]
    fn color_uses_the_active_palette() {
        let mut scale = ColorScale::default();
        assert_eq!(scale.color(42.0), PaletteKind::OrRd.colors()[2]);
        scale.set_palette(PaletteKind::Blues);
        assert_eq!(scale.color(42.0), PaletteKind::Blues.colors()[2]);
        assert_eq!(scale.thresholds(), &THRESHOLDS);
    }

    #[test]
    fn nan_and_missing_fall_back_to_lowest_bucket() {
        let scale = ColorScale::default();
        assert_eq!(scale.color(f64::NAN), scale.colors()[0]);
        assert_eq!(scale.color_of(None), scale.colors()[0]);
        assert_eq!(scale.color_of(Some(1500.0)), scale.colors()[7]);
    }

    #[test]
    fn invert_extent_covers_every_bucket() {
        let scale = ColorScale::default();
        assert_eq!(scale.invert_extent(0), (None, Some(10.0)));
        assert_eq!(scale.invert_extent(2), (Some(25.0), Some(50.0)));
        assert_eq!(scale.invert_extent(7), (Some(1000.0), None));
        for i in 1..scale.bucket_count() {
            let (lo, _) = scale.invert_extent(i);
            assert_eq!(scale.bucket(lo.unwrap()), Some(i));
        }
    }

    #[test]
    fn palette_cycle_and_parse() {
        assert_eq!(PaletteKind::OrRd.next(), PaletteKind::Blues);
        assert_eq!(PaletteKind::OrRd.next().next(), PaletteKind::OrRd);
        assert_eq!("Blues".parse::<PaletteKind>(), Ok(PaletteKind::Blues));
        assert_eq!("orrd".parse::<PaletteKind>(), Ok(PaletteKind::OrRd));
        assert!("viridis".parse::<PaletteKind>().is_err());
        for kind in [PaletteKind::OrRd, PaletteKind::Blues] {
            assert_eq!(kind.name().parse::<PaletteKind>(), Ok(kind));
        }
    }

    #[test]
    fn sqrt_scale_endpoints_and_midpoints() {
        let x = SqrtScale::new((0.0, 1500.0), (440.0, 1000.0));
        assert_close(x.apply(0.0), 440.0);
        assert_close(x.apply(1500.0), 1000.0);
        assert_close(x.apply(375.0), 720.0);
        assert_eq!(x.apply_round(10.0), 486.0);
        assert_eq!(x.apply_round(1000.0), 897.0);
    }
}
