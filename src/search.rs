//! Search by name over locations and countries.

use crate::geo::{normalize_rings, GeoCoordinate, GeoFeature, GeoProjector, RingPolicy};
use crate::markers::MarkerLayer;
use glam::Vec3;

/// A searchable country with its representative point.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryEntry {
    pub name: String,
    pub anchor: GeoCoordinate,
}

/// Country names in document order.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    entries: Vec<CountryEntry>,
}

impl CountryIndex {
    /// Indexes every named feature that has, or can derive, a representative point.
    ///
    /// The point comes from the feature's properties, falling back to the mean of
    /// its outer ring.
    pub fn from_features(features: &[GeoFeature]) -> Self {
        let entries = features
            .iter()
            .filter_map(|feature| {
                let name = feature.name.clone()?;
                let anchor = feature.anchor.or_else(|| ring_center(feature))?;
                Some(CountryEntry { name, anchor })
            })
            .collect::<Vec<_>>();

        log::info!("Indexed {} countries for search", entries.len());
        Self { entries }
    }

    /// First country whose name contains `term`, ignoring case.
    pub fn find(&self, term: &str) -> Option<&CountryEntry> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.name.to_lowercase().contains(&term))
    }

    pub fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn ring_center(feature: &GeoFeature) -> Option<GeoCoordinate> {
    let rings = normalize_rings(feature.coordinates.as_ref()?, RingPolicy::OuterOnly).ok()?;
    let ring = rings.first()?;

    let n = ring.len() as f64;
    let (lon, lat) = ring
        .iter()
        .fold((0.0, 0.0), |(x, y), c| (x + c.x, y + c.y));
    Some(GeoCoordinate::new(lat / n, lon / n))
}

/// What kind of entry a search matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Location,
    Country,
}

/// Result of a search, shown to the user as a status message.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        name: String,
        kind: MatchKind,
        /// Fly-to point on the marker shell.
        position: Vec3,
    },
    NotFound(String),
    EmptyTerm,
}

impl SearchOutcome {
    pub fn message(&self) -> String {
        match self {
            SearchOutcome::Found { name, .. } => format!("Flying to {}", name),
            SearchOutcome::NotFound(term) => format!("Location not found: {}", term),
            SearchOutcome::EmptyTerm => "Please enter a location name.".to_string(),
        }
    }
}

/// Looks up `term`: exact location names first, then country name substrings.
pub fn search(
    term: &str,
    markers: &MarkerLayer,
    countries: &CountryIndex,
    marker_radius: f64,
) -> SearchOutcome {
    let term = term.trim();
    if term.is_empty() {
        return SearchOutcome::EmptyTerm;
    }

    if let Some((location, position)) = markers.find_location(term) {
        return SearchOutcome::Found {
            name: location.name.clone(),
            kind: MatchKind::Location,
            position,
        };
    }

    search_countries(term, countries, marker_radius)
        .unwrap_or_else(|| SearchOutcome::NotFound(term.to_string()))
}

/// Country part of [`search`]: first name containing `term`, ignoring case.
///
/// Returns `None` for an empty term or no match.
pub fn search_countries(
    term: &str,
    countries: &CountryIndex,
    marker_radius: f64,
) -> Option<SearchOutcome> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    countries.find(term).map(|country| SearchOutcome::Found {
        name: country.name.clone(),
        kind: MatchKind::Country,
        position: GeoProjector::project_coordinate(country.anchor, marker_radius),
    })
}
