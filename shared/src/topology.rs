//! Minimal TopoJSON decoding: polygon objects to features, shared arcs to a mesh.

use std::collections::HashMap;

use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::{Deserialize, Deserializer};

use crate::error::LoadError;

/// Feature identifier. Numeric ids are normalized to their decimal text so
/// that `32003` and `"32003"` name the same county.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawId")]
pub struct FeatureId(String);

impl FeatureId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawId> for FeatureId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => FeatureId(s),
            RawId::Integer(i) => FeatureId(i.to_string()),
            RawId::Float(f) => FeatureId(f.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// A geometry object. Only polygonal types carry arcs we use; points,
/// lines and null-typed objects deserialize as `Unsupported` and are skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    GeometryCollection {
        #[serde(deserialize_with = "nullable_geometries")]
        geometries: Vec<Geometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<FeatureId>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<FeatureId>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    #[serde(other)]
    Unsupported,
}

/// A geometry slot that also accepts `"type": null` or no type at all.
struct NullableGeometry(Geometry);

impl<'de> Deserialize<'de> for NullableGeometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("type").is_none_or(serde_json::Value::is_null) {
            return Ok(Self(Geometry::Unsupported));
        }
        Geometry::deserialize(value)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

fn nullable_geometries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Geometry>, D::Error> {
    let slots = Vec::<NullableGeometry>::deserialize(deserializer)?;
    Ok(slots.into_iter().map(|slot| slot.0).collect())
}

fn nullable_objects<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<String, Geometry>, D::Error> {
    let slots = HashMap::<String, NullableGeometry>::deserialize(deserializer)?;
    Ok(slots.into_iter().map(|(name, slot)| (name, slot.0)).collect())
}

impl Geometry {
    fn arc_refs(&self) -> Vec<i64> {
        match self {
            Geometry::Polygon { arcs, .. } => arcs.iter().flatten().copied().collect(),
            Geometry::MultiPolygon { arcs, .. } => {
                arcs.iter().flatten().flatten().copied().collect()
            }
            Geometry::GeometryCollection { .. } | Geometry::Unsupported => Vec::new(),
        }
    }

    fn leaves<'a>(&'a self, out: &mut Vec<&'a Geometry>) {
        match self {
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.leaves(out);
                }
            }
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => out.push(self),
            Geometry::Unsupported => {}
        }
    }
}

/// A decoded county or state: optional id plus lon/lat polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<FeatureId>,
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(FeatureId::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(deserialize_with = "nullable_objects")]
    pub objects: HashMap<String, Geometry>,
    pub arcs: Vec<Vec<Vec<f64>>>,
}

impl Topology {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::Topology(e.to_string()))
    }

    pub fn object(&self, name: &str) -> Result<&Geometry, LoadError> {
        self.objects
            .get(name)
            .ok_or_else(|| LoadError::MissingObject(name.to_string()))
    }

    /// Absolute coordinates of every arc, undoing delta encoding and
    /// quantization when the topology has a transform.
    pub fn decode_arcs(&self) -> Result<Vec<Vec<Coord<f64>>>, LoadError> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(i, arc)| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .map(|position| match position[..] {
                        [px, py, ..] => Ok(self.transformed(px, py, &mut x, &mut y)),
                        _ => Err(LoadError::Topology(format!(
                            "arc {i} has a position with {} coordinates",
                            position.len()
                        ))),
                    })
                    .collect()
            })
            .collect()
    }

    fn transformed(&self, px: f64, py: f64, x: &mut f64, y: &mut f64) -> Coord<f64> {
        match self.transform {
            Some(t) => {
                *x += px;
                *y += py;
                Coord {
                    x: *x * t.scale[0] + t.translate[0],
                    y: *y * t.scale[1] + t.translate[1],
                }
            }
            None => Coord { x: px, y: py },
        }
    }

    /// Every polygonal geometry of `object` as a feature, in document order.
    pub fn features(&self, object: &str) -> Result<Vec<Feature>, LoadError> {
        let arcs = self.decode_arcs()?;
        let mut leaves = Vec::new();
        self.object(object)?.leaves(&mut leaves);
        leaves
            .into_iter()
            .map(|geometry| match geometry {
                Geometry::Polygon { id, arcs: rings } => Ok(Feature {
                    id: id.clone(),
                    geometry: MultiPolygon::new(vec![polygon(rings, &arcs)?]),
                }),
                Geometry::MultiPolygon { id, arcs: polygons } => Ok(Feature {
                    id: id.clone(),
                    geometry: MultiPolygon::new(
                        polygons
                            .iter()
                            .map(|rings| polygon(rings, &arcs))
                            .collect::<Result<_, _>>()?,
                    ),
                }),
                _ => Err(LoadError::Topology("unexpected non-polygon leaf".into())),
            })
            .collect()
    }

    /// Arcs of `object` whose first and last user geometries pass `filter`.
    ///
    /// Geometries are numbered by their position among the object's polygon
    /// leaves; an arc used by a single geometry is passed as `(g, g)`, so
    /// `|a, b| a != b` keeps only borders between two different geometries.
    pub fn mesh<F>(&self, object: &str, filter: F) -> Result<MultiLineString<f64>, LoadError>
    where
        F: Fn(usize, usize) -> bool,
    {
        let arcs = self.decode_arcs()?;
        let mut leaves = Vec::new();
        self.object(object)?.leaves(&mut leaves);

        let mut users: Vec<Vec<usize>> = vec![Vec::new(); arcs.len()];
        for (geometry_index, geometry) in leaves.iter().enumerate() {
            for arc in geometry.arc_refs() {
                let index = arc_index(arc, arcs.len())?;
                users[index].push(geometry_index);
            }
        }

        let lines = users
            .iter()
            .enumerate()
            .filter_map(|(index, geometries)| {
                let (first, last) = (geometries.first()?, geometries.last()?);
                filter(*first, *last).then(|| LineString::new(arcs[index].clone()))
            })
            .collect();
        Ok(MultiLineString::new(lines))
    }
}

fn arc_index(arc: i64, len: usize) -> Result<usize, LoadError> {
    let index = if arc < 0 { !arc } else { arc };
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or(LoadError::InvalidArc(arc))
}

fn ring(refs: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>, LoadError> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for &arc in refs {
        let points = &arcs[arc_index(arc, arcs.len())?];
        // Consecutive arcs share their joining point.
        let skip = usize::from(!coords.is_empty());
        if arc < 0 {
            coords.extend(points.iter().rev().skip(skip).copied());
        } else {
            coords.extend(points.iter().skip(skip).copied());
        }
    }
    Ok(LineString::new(coords))
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>, LoadError> {
    let mut rings = rings.iter().map(|refs| ring(refs, arcs));
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(Vec::new()));
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}
