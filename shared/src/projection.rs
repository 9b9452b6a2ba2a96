//! Geographic projections from lon/lat degrees to canvas pixels.

/// Maps a longitude/latitude pair (degrees) to a drawing position.
/// `None` means the point lies outside the projection's clip region.
pub trait Projection {
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)>;
}

/// Albers equal-area conic with a longitude rotation, a centre and a
/// scale/translate transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
    rotate: f64,
    k: f64,
    dx: f64,
    dy: f64,
}

impl ConicEqualArea {
    /// `parallels`, `rotate` and `center` are in degrees; `rotate` is added
    /// to every input longitude and `center` (in the rotated frame) lands on
    /// `translate`.
    pub fn new(
        parallels: (f64, f64),
        rotate: f64,
        center: (f64, f64),
        scale: f64,
        translate: (f64, f64),
    ) -> Self {
        let sy0 = parallels.0.to_radians().sin();
        let n = (sy0 + parallels.1.to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let mut projection = Self {
            n,
            c,
            r0: c.sqrt() / n,
            rotate: rotate.to_radians(),
            k: scale,
            dx: 0.0,
            dy: 0.0,
        };
        let (cx, cy) = projection.raw(center.0.to_radians(), center.1.to_radians());
        projection.dx = translate.0 - scale * cx;
        projection.dy = translate.1 + scale * cy;
        projection
    }

    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let a = lambda * self.n;
        (r * a.sin(), self.r0 - r * a.cos())
    }
}

impl Projection for ConicEqualArea {
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lambda = wrap_pi(lon.to_radians() + self.rotate);
        let (x, y) = self.raw(lambda, lat.to_radians());
        let point = (self.dx + self.k * x, self.dy - self.k * y);
        (point.0.is_finite() && point.1.is_finite()).then_some(point)
    }
}

fn wrap_pi(lambda: f64) -> f64 {
    use std::f64::consts::PI;
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min: (f64, f64),
    max: (f64, f64),
}

impl Extent {
    fn contains(&self, (x, y): (f64, f64)) -> bool {
        self.min.0 <= x && x <= self.max.0 && self.min.1 <= y && y <= self.max.1
    }
}

/// Composite US projection: the lower 48 plus Alaska and Hawaii insets.
///
/// Each point is tried against the lower-48 projection first, then the
/// two insets; a point outside all three clip boxes is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlbersUsa {
    lower48: ConicEqualArea,
    alaska: ConicEqualArea,
    hawaii: ConicEqualArea,
    extents: [Extent; 3],
}

const EPSILON: f64 = 1e-6;

impl AlbersUsa {
    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        let k = scale;
        let (x, y) = translate;
        let e = EPSILON;
        Self {
            lower48: ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), k, (x, y)),
            alaska: ConicEqualArea::new(
                (55.0, 65.0),
                154.0,
                (-2.0, 58.5),
                k * 0.35,
                (x - 0.307 * k, y + 0.201 * k),
            ),
            hawaii: ConicEqualArea::new(
                (8.0, 18.0),
                157.0,
                (-3.0, 19.9),
                k,
                (x - 0.205 * k, y + 0.212 * k),
            ),
            extents: [
                Extent {
                    min: (x - 0.455 * k, y - 0.238 * k),
                    max: (x + 0.455 * k, y + 0.238 * k),
                },
                Extent {
                    min: (x - 0.425 * k + e, y + 0.120 * k + e),
                    max: (x - 0.214 * k - e, y + 0.234 * k - e),
                },
                Extent {
                    min: (x - 0.214 * k + e, y + 0.166 * k + e),
                    max: (x - 0.115 * k - e, y + 0.234 * k - e),
                },
            ],
        }
    }
}

impl Projection for AlbersUsa {
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        [&self.lower48, &self.alaska, &self.hawaii]
            .into_iter()
            .zip(&self.extents)
            .find_map(|(projection, extent)| {
                projection
                    .project(lon, lat)
                    .filter(|point| extent.contains(*point))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(actual: (f64, f64), expected: (f64, f64), tolerance: f64) {
        let dx = (actual.0 - expected.0).abs();
        let dy = (actual.1 - expected.1).abs();
        assert!(
            dx < tolerance && dy < tolerance,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn centre_lands_on_translate() {
        let p = ConicEqualArea::new((29.5, 45.5), 96.0, (-0.6, 38.7), 1000.0, (480.0, 250.0));
        let point = p.project(-96.6, 38.7).unwrap();
        assert_near(point, (480.0, 250.0), 1e-9);
    }

    #[test]
    fn standard_usa_frame() {
        let usa = AlbersUsa::new(1070.0, (480.0, 250.0));
        // Lebanon, Kansas sits near the centre of the lower 48.
        let kansas = usa.project(-98.58, 39.83).unwrap();
        assert_near(kansas, (480.0, 250.0), 40.0);
        // East is right, north is up.
        let east = usa.project(-80.0, 39.83).unwrap();
        let north = usa.project(-98.58, 47.0).unwrap();
        assert!(east.0 > kansas.0);
        assert!(north.1 < kansas.1);
    }

    #[test]
    fn insets_catch_alaska_and_hawaii() {
        let (k, x, y) = (1070.0, 480.0, 250.0);
        let usa = AlbersUsa::new(k, (x, y));
        let anchorage = usa.project(-149.9, 61.2).unwrap();
        assert!(anchorage.0 < x - 0.214 * k && anchorage.1 > y + 0.120 * k);
        let honolulu = usa.project(-157.86, 21.3).unwrap();
        assert!(honolulu.0 > x - 0.214 * k && honolulu.0 < x - 0.115 * k);
        assert!(honolulu.1 > y + 0.166 * k);
    }

    #[test]
    fn points_outside_every_inset_are_dropped() {
        let usa = AlbersUsa::new(1070.0, (480.0, 250.0));
        assert_eq!(usa.project(2.35, 48.85), None);
        assert_eq!(usa.project(139.7, 35.7), None);
    }

    #[test]
    fn nevada_is_framed_by_the_map_translate() {
        let usa = AlbersUsa::new(4000.0, (960.0 * 1.4, 660.0 / 1.5));
        let (x, y) = usa.project(-117.0, 39.0).unwrap();
        assert!((0.0..960.0).contains(&x), "x = {x}");
        assert!((0.0..660.0).contains(&y), "y = {y}");
    }

    #[test]
    fn rotation_wraps_around_the_antimeridian() {
        assert!((wrap_pi(3.5) - (3.5 - 2.0 * std::f64::consts::PI)).abs() < 1e-12);
        assert!((wrap_pi(-3.5) - (-3.5 + 2.0 * std::f64::consts::PI)).abs() < 1e-12);
        assert_eq!(wrap_pi(1.0), 1.0);
    }
}
