//! Country border geometry.
//!
//! Turns GeoJSON features of mixed nesting depth (single rings, polygons,
//! multipolygons) into polylines projected onto the border shell.

use super::{GeoFeature, GeoProjector};
use crate::error::GlobeError;
use geo_types::Coord;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A ring of `(longitude, latitude)` pairs.
pub type Ring = Vec<Coord<f64>>;

/// Which rings of a nested geometry become border lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingPolicy {
    /// Every ring of every polygon part, including holes and islands.
    #[default]
    AllRings,
    /// Only the first ring of the first polygon part.
    OuterOnly,
}

/// One projected border line.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderLine {
    /// Index of the source feature within its collection.
    pub feature_index: usize,
    /// Name of the source feature, if it has one.
    pub name: Option<String>,
    /// Projected points in source order. Closed only if the source ring was.
    pub points: Vec<Vec3>,
}

/// Result of building borders for a whole feature collection.
#[derive(Debug, Clone, Default)]
pub struct BorderSet {
    /// All generated lines, in feature order.
    pub lines: Vec<BorderLine>,
    /// Features that were skipped, with the reason.
    pub skipped: Vec<GlobeError>,
}

impl BorderSet {
    /// Number of lines produced for the given feature.
    pub fn lines_for(&self, feature_index: usize) -> usize {
        self.lines
            .iter()
            .filter(|l| l.feature_index == feature_index)
            .count()
    }
}

/// Builds border polylines at a fixed shell radius.
#[derive(Debug, Clone, Copy)]
pub struct BorderBuilder {
    radius: f64,
    policy: RingPolicy,
}

impl BorderBuilder {
    pub fn new(radius: f64, policy: RingPolicy) -> Self {
        Self { radius, policy }
    }

    /// Builds lines for every feature.
    ///
    /// Malformed features are skipped and reported; they never abort the build.
    pub fn build(&self, features: &[GeoFeature]) -> BorderSet {
        let mut set = BorderSet::default();

        for feature in features {
            match self.build_feature(feature) {
                Ok(lines) => set.lines.extend(lines),
                Err(err) => {
                    log::warn!("Skipping {}: {}", feature.display_name(), err);
                    set.skipped.push(err);
                }
            }
        }

        log::info!(
            "Built {} border lines from {} features ({} skipped)",
            set.lines.len(),
            features.len(),
            set.skipped.len()
        );

        set
    }

    /// Builds the lines of a single feature.
    pub fn build_feature(&self, feature: &GeoFeature) -> Result<Vec<BorderLine>, GlobeError> {
        if let Some(reason) = &feature.invalid {
            return Err(GlobeError::malformed(feature.index, reason.clone()));
        }

        let coordinates = feature
            .coordinates
            .as_ref()
            .ok_or_else(|| GlobeError::malformed(feature.index, "missing geometry coordinates"))?;

        let rings = normalize_rings(coordinates, self.policy)
            .map_err(|reason| GlobeError::malformed(feature.index, reason))?;

        Ok(rings
            .iter()
            .map(|ring| BorderLine {
                feature_index: feature.index,
                name: feature.name.clone(),
                points: self.project_ring(ring),
            })
            .collect())
    }

    fn project_ring(&self, ring: &[Coord<f64>]) -> Vec<Vec3> {
        ring.iter()
            .map(|c| GeoProjector::project(c.y, c.x, self.radius))
            .collect()
    }
}

/// Flattens a coordinate array of any supported nesting depth into rings.
///
/// The depth is read from the data, not the declared geometry type:
/// `[[x, y], ..]` is one ring, `[[[x, y], ..], ..]` a polygon and one level
/// deeper a multipolygon.
pub fn normalize_rings(coordinates: &Value, policy: RingPolicy) -> Result<Vec<Ring>, String> {
    match nesting_depth(coordinates)? {
        0 => Err("a single position is not a ring".to_string()),
        1 => Ok(vec![parse_ring(coordinates)?]),
        2 => {
            let rings = as_non_empty_array(coordinates)?;
            match policy {
                RingPolicy::OuterOnly => Ok(vec![parse_ring(&rings[0])?]),
                RingPolicy::AllRings => rings.iter().map(parse_ring).collect(),
            }
        }
        3 => {
            let polygons = as_non_empty_array(coordinates)?;
            match policy {
                RingPolicy::OuterOnly => {
                    let rings = as_non_empty_array(&polygons[0])?;
                    Ok(vec![parse_ring(&rings[0])?])
                }
                RingPolicy::AllRings => {
                    let mut out = Vec::new();
                    for polygon in polygons {
                        for ring in as_non_empty_array(polygon)? {
                            out.push(parse_ring(ring)?);
                        }
                    }
                    Ok(out)
                }
            }
        }
        depth => Err(format!("unsupported coordinate nesting depth {}", depth)),
    }
}

/// Depth of array nesting above the innermost number, following first entries.
fn nesting_depth(value: &Value) -> Result<usize, String> {
    let items = as_non_empty_array(value)?;
    match &items[0] {
        Value::Number(_) => Ok(0),
        first @ Value::Array(_) => Ok(1 + nesting_depth(first)?),
        other => Err(format!("non-numeric coordinate value: {}", other)),
    }
}

fn as_non_empty_array(value: &Value) -> Result<&Vec<Value>, String> {
    match value {
        Value::Array(items) if items.is_empty() => Err("empty coordinate array".to_string()),
        Value::Array(items) => Ok(items),
        other => Err(format!("expected a coordinate array, found {}", other)),
    }
}

fn parse_ring(value: &Value) -> Result<Ring, String> {
    let ring = as_non_empty_array(value)?
        .iter()
        .map(parse_position)
        .collect::<Result<Ring, String>>()?;

    if ring.len() < 2 {
        return Err(format!("ring has {} position(s), need at least 2", ring.len()));
    }

    Ok(ring)
}

fn parse_position(value: &Value) -> Result<Coord<f64>, String> {
    let items = as_non_empty_array(value)?;
    if items.len() < 2 {
        return Err("position has fewer than 2 values".to_string());
    }

    let number = |v: &Value| {
        v.as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("non-numeric coordinate value: {}", v))
    };

    Ok(Coord {
        x: number(&items[0])?,
        y: number(&items[1])?,
    })
}
