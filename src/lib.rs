//! Rendering-backend abstraction for an HTML/CSS layout-and-paint engine.
//!
//! One [`GraphicsSurface`] contract, several concrete backends: the paint
//! core draws lines, rectangles, paths, images and text against the trait
//! and never learns which toolkit is underneath. Resource descriptors
//! (brush, pen, font, image, path) are portable value types each backend
//! realizes into its native form.
//!
//! Shipped backends:
//! - [`backends::recording`] — records draw calls, always available; the
//!   reference backend the contract tests run against.
//! - [`backends::cairo`] — immediate-mode rendering onto a
//!   `cairo::Context` (feature `cairo`).
//! - [`backends::svg`] — streams an SVG document (feature `svg`).

pub mod api;
pub mod backends;
pub mod error;
pub mod geometry;
pub mod resource;

pub use api::{GraphicsSurface, Smoothing, SmoothingState, TextFit, with_anti_alias};
pub use error::{FoliumError, Result};
pub use geometry::{Color, Point, Rect, Size};
pub use resource::{
    Brush, Corner, DashStyle, Figure, Font, FontStyle, Image, LineCap, LineJoin, Path,
    PathGeometry, Pen, PenAlignment, Segment, linear_gradient_line,
};
