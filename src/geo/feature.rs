//! GeoJSON feature collection parsing.
//!
//! Each feature is read with the `geojson` crate on its own, so one broken entry
//! never fails the collection. The geometry's coordinate array is kept as a raw
//! JSON value so that border building can inspect its nesting depth.

use super::GeoCoordinate;
use crate::error::GlobeError;
use geojson::Feature;
use serde_json::Value;

/// Property keys tried, in order, for a feature's display name.
const NAME_KEYS: &[&str] = &["name", "NAME", "admin", "ADMIN"];

/// One entity from a geographic feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// Position of the feature within its collection.
    pub index: usize,
    /// Display name from the properties bag.
    pub name: Option<String>,
    /// Representative point from the properties bag, used for search.
    pub anchor: Option<GeoCoordinate>,
    /// Raw nested `[longitude, latitude]` coordinate arrays.
    pub coordinates: Option<Value>,
    /// Why the entry could not be read as a GeoJSON feature, if it could not.
    pub invalid: Option<String>,
}

impl GeoFeature {
    /// Creates a feature from a bare coordinate array.
    pub fn from_coordinates(index: usize, name: Option<&str>, coordinates: Value) -> Self {
        Self {
            index,
            name: name.map(str::to_string),
            anchor: None,
            coordinates: Some(coordinates),
            invalid: None,
        }
    }

    /// Label used in log messages.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("feature #{}", self.index))
    }

    fn from_json(index: usize, value: Value) -> Self {
        match Feature::from_json_value(value) {
            Ok(feature) => Self::from_geojson(index, &feature),
            Err(e) => Self {
                index,
                name: None,
                anchor: None,
                coordinates: None,
                invalid: Some(e.to_string()),
            },
        }
    }

    fn from_geojson(index: usize, feature: &Feature) -> Self {
        let coordinates = feature
            .geometry
            .as_ref()
            .and_then(|g| serde_json::to_value(g).ok())
            .and_then(|mut g| g.get_mut("coordinates").map(Value::take));

        Self {
            index,
            name: read_name(feature),
            anchor: read_anchor(feature),
            coordinates,
            invalid: None,
        }
    }
}

/// Parses a GeoJSON document into features.
///
/// Accepts a `FeatureCollection` or a single `Feature`. Only a document that is
/// not JSON, or has neither shape, is an error; entries that are not valid
/// features are kept with [`GeoFeature::invalid`] set.
pub fn parse_feature_collection(geojson_str: &str) -> Result<Vec<GeoFeature>, GlobeError> {
    let mut doc: Value = serde_json::from_str(geojson_str)
        .map_err(|e| GlobeError::Parse(format!("Failed to parse GeoJSON: {}", e)))?;

    let features = match doc.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => match doc.get_mut("features").map(Value::take) {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .enumerate()
                .map(|(idx, entry)| GeoFeature::from_json(idx, entry))
                .collect(),
            _ => {
                return Err(GlobeError::Parse(
                    "FeatureCollection has no features array".to_string(),
                ))
            }
        },
        Some("Feature") => vec![GeoFeature::from_json(0, doc)],
        Some(other) => {
            return Err(GlobeError::Parse(format!(
                "Unsupported GeoJSON type: {}",
                other
            )))
        }
        None => {
            return Err(GlobeError::Parse(
                "GeoJSON document has no type".to_string(),
            ))
        }
    };

    log::info!("Read {} features from GeoJSON", features.len());
    Ok(features)
}

fn read_name(feature: &Feature) -> Option<String> {
    NAME_KEYS
        .iter()
        .filter_map(|key| feature.property(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_anchor(feature: &Feature) -> Option<GeoCoordinate> {
    let number = |key: &str| feature.property(key).and_then(Value::as_f64);

    let lat = number("lat").or_else(|| number("label_y"))?;
    let lon = number("lon").or_else(|| number("label_x"))?;
    Some(GeoCoordinate::new(lat, lon))
}
