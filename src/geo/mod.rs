//! Geographic data for the globe.
//!
//! This module provides the latitude/longitude projection shared by every
//! globe layer, GeoJSON feature parsing, and the border line builder.

mod borders;
mod feature;
mod projection;

pub use borders::{normalize_rings, BorderBuilder, BorderLine, BorderSet, Ring, RingPolicy};
pub use feature::{parse_feature_collection, GeoFeature};
pub use projection::{GeoCoordinate, GeoProjector};
