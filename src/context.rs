//! The globe as a single explicit value.
//!
//! [`GlobeContext`] owns the scene, camera, markers and animation state, and is
//! the one entry point for input events and frame updates. Everything runs on
//! the UI thread: a click or search may start a camera animation, and the next
//! [`GlobeContext::advance`] picks it up.

use crate::animation::CameraAnimator;
use crate::config::{load_locations, GlobeConfig, Location};
use crate::error::GlobeError;
use crate::geo::{parse_feature_collection, BorderBuilder, GeoProjector};
use crate::markers::MarkerLayer;
use crate::orbit::OrbitControls;
use crate::picking::{PickResult, PickingController};
use crate::scene::{DecorativeLayer, PerspectiveCamera, Scene, Viewport};
use crate::search::{search, search_countries, CountryIndex, SearchOutcome};
use glam::Vec3;
use std::time::Duration;
use web_time::Instant;

/// Country borders bundled with the application.
pub static COUNTRIES_GEOJSON: &str = include_str!("../assets/countries.geo.json");

/// Locations bundled with the application.
pub static LOCATIONS_JSON: &str = include_str!("../assets/locations.json");

/// Globe state shared by input handling, the frame loop and rendering.
pub struct GlobeContext {
    config: GlobeConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    viewport: Viewport,
    markers: MarkerLayer,
    countries: CountryIndex,
    animator: CameraAnimator,
    orbit: OrbitControls,

    /// Message for the status bar.
    status: String,
    last_pick: Option<PickResult>,
    /// Country the live search last flew to.
    live_match: Option<String>,
}

impl GlobeContext {
    /// Builds the globe from a GeoJSON document and a location list.
    ///
    /// Fails only if the configuration is invalid or the document cannot be
    /// parsed at all; malformed features are skipped.
    pub fn new(
        config: GlobeConfig,
        geojson: &str,
        locations: Vec<Location>,
    ) -> Result<Self, GlobeError> {
        config.validate()?;

        let features = parse_feature_collection(geojson)?;
        let borders = BorderBuilder::new(config.border_radius, config.ring_policy).build(&features);
        let countries = CountryIndex::from_features(&features);
        let markers = MarkerLayer::build(locations, &config);

        let skipped = borders.skipped.len();
        let scene = Scene::new(
            config.globe_radius as f32,
            borders.lines,
            vec![DecorativeLayer::moon()],
        );

        let viewport = Viewport::default();
        let mut camera =
            PerspectiveCamera::new(config.fov_degrees, viewport.aspect(), config.near, config.far);
        camera.position = Vec3::new(0.0, 0.0, config.camera_distance);

        let orbit = OrbitControls::from_config(&config);
        let animator = CameraAnimator::with_easing(config.easing);

        let status = if skipped > 0 {
            format!("Ready ({} malformed features skipped)", skipped)
        } else {
            "Ready".to_string()
        };

        Ok(Self {
            config,
            scene,
            camera,
            viewport,
            markers,
            countries,
            animator,
            orbit,
            status,
            last_pick: None,
            live_match: None,
        })
    }

    /// Builds the globe from the bundled country and location data.
    pub fn with_bundled_data(config: GlobeConfig) -> Result<Self, GlobeError> {
        let locations = load_locations(LOCATIONS_JSON)?;
        Self::new(config, COUNTRIES_GEOJSON, locations)
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn countries(&self) -> &CountryIndex {
        &self.countries
    }

    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_pick(&self) -> Option<&PickResult> {
        self.last_pick.as_ref()
    }

    /// Updates the viewport and camera aspect after a resize.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.camera.set_viewport(viewport);
        }
    }

    /// Picks under the pointer and flies to the hit, if any. A miss changes nothing.
    pub fn handle_pointer_click(&mut self, x: f32, y: f32, now: Instant) -> Option<PickResult> {
        let result = PickingController::pick(x, y, self.viewport, &self.camera, &self.markers)?;

        log::info!("Picked location {}", result.location.name);

        let position = GeoProjector::project_coordinate(
            result.location.coordinate(),
            self.config.marker_radius,
        );
        self.fly_to(position, now);
        self.status = format!("Selected {}", result.location.name);
        self.last_pick = Some(result.clone());

        Some(result)
    }

    /// Searches locations, then countries, and flies to the first match.
    pub fn handle_search(&mut self, term: &str, now: Instant) -> SearchOutcome {
        let outcome = search(
            term,
            &self.markers,
            &self.countries,
            self.config.marker_radius,
        );

        match &outcome {
            SearchOutcome::Found { name, position, .. } => {
                log::info!("Search '{}' matched {}", term.trim(), name);
                self.fly_to(*position, now);
            }
            SearchOutcome::NotFound(term) => log::info!("Search '{}' found nothing", term),
            SearchOutcome::EmptyTerm => log::debug!("Ignoring empty search"),
        }

        self.status = outcome.message();
        outcome
    }

    /// Live country lookup while the search text is being edited.
    ///
    /// Flies to the first country whose name contains the text. Misses and empty
    /// text change nothing and report nothing; typing more letters that still
    /// match the same country does not restart the flight.
    pub fn handle_search_input(&mut self, term: &str, now: Instant) -> Option<&str> {
        let Some(SearchOutcome::Found { name, position, .. }) =
            search_countries(term, &self.countries, self.config.marker_radius)
        else {
            self.live_match = None;
            return None;
        };

        if self.live_match.as_deref() != Some(name.as_str()) {
            log::debug!("Live search '{}' matched {}", term.trim(), name);
            self.fly_to(position, now);
            self.status = format!("Flying to {}", name);
            self.live_match = Some(name);
        }
        self.live_match.as_deref()
    }

    /// Queues an orbit rotation for a pointer drag.
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        self.orbit.rotate(dx, dy, self.viewport);
    }

    /// Queues an orbit zoom step.
    pub fn handle_scroll(&mut self, delta: f32) {
        self.orbit.dolly(delta);
    }

    /// Starts a camera animation towards `position`, replacing any in flight.
    pub fn fly_to(&mut self, position: Vec3, now: Instant) {
        self.animator.animate_to(
            &self.camera,
            position,
            self.config.forward_offset,
            self.config.animation_duration(),
            now,
        );
    }

    /// Advances the camera animation. Returns whether one ran this frame.
    pub fn step_animation(&mut self, now: Instant) -> bool {
        self.animator.tick(now, &mut self.camera).is_some()
    }

    /// Spins decorative layers by `dt` seconds.
    pub fn step_decorations(&mut self, dt: f32) {
        self.scene.advance_decorations(dt);
    }

    /// Applies orbit controls for `dt` seconds.
    pub fn step_orbit(&mut self, dt: f32) {
        self.orbit.update(&mut self.camera, dt);
    }

    /// One frame: animation, decorations, then orbit controls.
    ///
    /// The orbit step is skipped while an animation owns the camera.
    pub fn advance(&mut self, dt: Duration, now: Instant) {
        let dt = dt.as_secs_f32();
        let animating = self.step_animation(now);
        self.step_decorations(dt);
        if !animating {
            self.step_orbit(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MatchKind;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Japan", "lat": 36.2, "lon": 138.25 },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[130.0, 31.0], [132.0, 34.0], [130.0, 33.0], [130.0, 31.0]]],
                        [[[139.0, 35.0], [141.0, 41.0], [140.0, 36.0], [139.0, 35.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Nowhere" },
                "geometry": { "type": "Polygon", "coordinates": [] }
            }
        ]
    }"#;

    fn context() -> GlobeContext {
        let config = GlobeConfig {
            auto_rotate: false,
            ..GlobeConfig::default()
        };
        let locations = vec![Location::new("Tokyo", 35.6762, 139.6503)];
        let mut ctx = GlobeContext::new(config, GEOJSON, locations).unwrap();
        ctx.resize(800.0, 600.0);
        ctx
    }

    #[test]
    fn test_build_skips_malformed_features() {
        let ctx = context();
        assert_eq!(ctx.scene().borders.len(), 2);
        assert_eq!(ctx.countries().len(), 1);
        assert_eq!(ctx.markers().markers().len(), 1);
        assert!(ctx.status().contains("1 malformed"));
    }

    #[test]
    fn test_unparseable_document_fails() {
        let result = GlobeContext::new(GlobeConfig::default(), "{", Vec::new());
        assert!(matches!(result, Err(GlobeError::Parse(_))));
    }

    #[test]
    fn test_click_tokyo_then_fly_there() {
        let mut ctx = context();
        let t0 = Instant::now();

        let tokyo = ctx.markers().markers()[0].position;
        let screen = ctx.camera().world_to_screen(tokyo, ctx.viewport()).unwrap();

        let pick = ctx.handle_pointer_click(screen.x, screen.y, t0).unwrap();
        assert_eq!(pick.location.name, "Tokyo");
        assert!(ctx.animator().is_active());

        let duration = ctx.config().animation_duration();
        ctx.advance(Duration::from_millis(16), t0 + duration);

        let expected = GeoProjector::project(35.6762, 139.6503, 1.05) + Vec3::new(0.0, 0.0, 2.0);
        assert!((ctx.camera().position - expected).length() < 1e-4);
        assert!(!ctx.animator().is_active());
        assert_eq!(ctx.status(), "Selected Tokyo");
        assert_eq!(ctx.last_pick().unwrap().location.name, "Tokyo");
    }

    #[test]
    fn test_click_on_empty_space_is_noop() {
        let mut ctx = context();
        let before = ctx.camera().position;

        assert!(ctx.handle_pointer_click(1.0, 1.0, Instant::now()).is_none());
        assert!(!ctx.animator().is_active());
        assert_eq!(ctx.camera().position, before);
        assert!(ctx.last_pick().is_none());
    }

    #[test]
    fn test_search_flies_to_country() {
        let mut ctx = context();
        let t0 = Instant::now();

        let outcome = ctx.handle_search("jap", t0);
        assert!(matches!(
            outcome,
            SearchOutcome::Found {
                kind: MatchKind::Country,
                ..
            }
        ));
        assert!(ctx.animator().is_active());
        assert_eq!(ctx.status(), "Flying to Japan");
    }

    #[test]
    fn test_live_search_flies_while_typing() {
        let mut ctx = context();
        let t0 = Instant::now();

        assert_eq!(ctx.handle_search_input("j", t0), Some("Japan"));
        assert_eq!(ctx.status(), "Flying to Japan");
        assert_eq!(ctx.animator().active().unwrap().start_time, t0);

        // More letters, same country: the flight keeps going.
        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(ctx.handle_search_input("jap", t1), Some("Japan"));
        assert_eq!(ctx.animator().active().unwrap().start_time, t0);

        // A miss while typing is silent.
        assert_eq!(ctx.handle_search_input("japx", t1), None);
        assert_eq!(ctx.status(), "Flying to Japan");
        assert_eq!(ctx.animator().active().unwrap().start_time, t0);

        // Matching again after a miss starts a new flight.
        let t2 = t0 + Duration::from_millis(200);
        assert_eq!(ctx.handle_search_input("japan", t2), Some("Japan"));
        assert_eq!(ctx.animator().active().unwrap().start_time, t2);
    }

    #[test]
    fn test_live_search_ignores_empty_text() {
        let mut ctx = context();
        let status = ctx.status().to_string();

        assert_eq!(ctx.handle_search_input("   ", Instant::now()), None);
        assert_eq!(ctx.status(), status);
        assert!(!ctx.animator().is_active());
    }

    #[test]
    fn test_failed_searches_change_nothing() {
        let mut ctx = context();
        let before = ctx.camera().position;

        assert_eq!(ctx.handle_search("", Instant::now()), SearchOutcome::EmptyTerm);
        assert_eq!(ctx.status(), "Please enter a location name.");

        let outcome = ctx.handle_search("Atlantis", Instant::now());
        assert_eq!(outcome, SearchOutcome::NotFound("Atlantis".to_string()));
        assert!(!ctx.animator().is_active());
        assert_eq!(ctx.camera().position, before);
    }

    #[test]
    fn test_orbit_waits_for_animation() {
        let config = GlobeConfig::default();
        let locations = vec![Location::new("Tokyo", 35.6762, 139.6503)];
        let mut ctx = GlobeContext::new(config, GEOJSON, locations).unwrap();
        let t0 = Instant::now();

        ctx.handle_search("Tokyo", t0);
        let half = ctx.config().animation_duration() / 2;
        ctx.advance(Duration::from_millis(16), t0 + half);
        let mid = ctx.camera().position;

        // The same instant again: auto-rotate must not have nudged the camera.
        ctx.advance(Duration::from_millis(16), t0 + half);
        assert_eq!(ctx.camera().position, mid);

        // Once the animation is over, auto-rotate resumes.
        let done = t0 + ctx.config().animation_duration();
        ctx.advance(Duration::from_millis(16), done);
        let settled = ctx.camera().position;
        ctx.advance(Duration::from_millis(16), done + Duration::from_millis(16));
        assert_ne!(ctx.camera().position, settled);
    }

    #[test]
    fn test_advance_spins_decorations() {
        let mut ctx = context();
        ctx.advance(Duration::from_secs(1), Instant::now());
        assert!(ctx.scene().decorations[0].rotation > 0.0);
    }

    #[test]
    fn test_bundled_data_loads() {
        let ctx = GlobeContext::with_bundled_data(GlobeConfig::default()).unwrap();
        assert!(!ctx.scene().borders.is_empty());
        assert!(!ctx.markers().markers().is_empty());
        assert!(ctx.markers().find_location("Tokyo").is_some());
    }
}
