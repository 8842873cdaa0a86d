//! Globe Explorer engine.
//!
//! Projects geographic data onto a 3D globe, builds country borders and
//! location markers, resolves pointer picks, and animates the camera to a
//! selected place. Rendering is left to the caller; see `ui` in the binary.

pub mod animation;
pub mod config;
pub mod context;
pub mod error;
pub mod geo;
pub mod markers;
pub mod orbit;
pub mod picking;
pub mod scene;
pub mod search;

pub use config::{GlobeConfig, Location};
pub use context::GlobeContext;
pub use error::GlobeError;
