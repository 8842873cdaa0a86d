//! UI modules for the Globe Explorer application.
//!
//! The UI is split into two parts:
//! - Top bar: title, search box, and status
//! - Central canvas: the globe itself, drawn with the egui painter

mod canvas;
mod top_bar;

pub use canvas::render_canvas;
pub use top_bar::render_top_bar;
