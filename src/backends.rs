//! Concrete [`crate::GraphicsSurface`] implementations.

pub mod recording;

#[cfg(feature = "cairo")]
pub mod cairo;

#[cfg(feature = "svg")]
pub mod svg;
