//! The graphics-surface contract the layout/paint core draws against.
//!
//! A [`GraphicsSurface`] wraps one backend-native drawing target for the
//! duration of one paint pass. The core issues draw calls in painter's-
//! algorithm order using resources it built via the factory methods; no
//! backend-specific type ever crosses back into the core.
//!
//! Capability gaps (unsupported clip exclusion, missing smoothing toggle,
//! no sub-pixel char-fit) are never errors: a surface degrades to the
//! documented fallback and the paint pass continues. Errors are reserved for
//! backend faults and invalid resource descriptors.

use crate::error::Result;
use crate::geometry::{Color, Point, Rect, Size};
use crate::resource::{Brush, Font, Image, Path, Pen};

/// Result of a bounded text measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFit {
    /// Bounding box of the whole string, as [`GraphicsSurface::measure_text`]
    /// would report it.
    pub size: Size,
    /// How many leading characters fit within the requested width. Backends
    /// that cannot truncate mid-measurement report the full character count;
    /// the core treats that as an imprecision, not a failure.
    pub chars_fit: usize,
    /// Advance width of the fitting prefix.
    pub fit_width: f64,
}

/// Observable smoothing mode of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Smoothing {
    #[default]
    Default,
    AntiAlias,
    Aliased,
}

/// Opaque token returned by [`GraphicsSurface::set_anti_alias`] and consumed
/// by [`GraphicsSurface::restore_smoothing`]. Surfaces without a smoothing
/// toggle hand out [`SmoothingState::NOOP`], so the pair is always safe to
/// call around precision-sensitive strokes.
#[must_use = "pass this token back to restore_smoothing"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmoothingState(pub(crate) Option<Smoothing>);

impl SmoothingState {
    pub const NOOP: SmoothingState = SmoothingState(None);

    pub(crate) fn previous(mode: Smoothing) -> SmoothingState {
        SmoothingState(Some(mode))
    }

    pub fn is_noop(&self) -> bool {
        self.0.is_none()
    }
}

/// One paint pass against one native drawing target.
///
/// Single-threaded and synchronous: every call completes before returning,
/// and a surface belongs to exactly one pass. Disposal is by ownership —
/// backends expose a consuming finisher (or plain `Drop`) instead of a
/// runtime release flag, so double-release is unrepresentable.
pub trait GraphicsSurface {
    /// Bounding box the backend would use to lay `text` out at `font`,
    /// left-to-right, current locale. Idempotent, and consistent with what
    /// [`GraphicsSurface::draw_text`] paints to sub-pixel tolerance; layout
    /// depends on that equality.
    fn measure_text(&self, text: &str, font: &Font) -> Result<Size>;

    /// Like [`GraphicsSurface::measure_text`], additionally reporting how
    /// many leading characters fit in `max_width`. See [`TextFit`] for the
    /// degraded behavior of backends without sub-pixel char-fit.
    fn measure_text_fit(&self, text: &str, font: &Font, max_width: f64) -> Result<TextFit>;

    /// Paints `text` at `origin` with a solid fill of `color`. `size` is the
    /// pre-measured layout box; backends that need an explicit box must use
    /// it. `rtl` flips the run direction.
    fn draw_text(
        &mut self,
        text: &str,
        font: &Font,
        color: Color,
        origin: Point,
        size: Size,
        rtl: bool,
    ) -> Result<()>;

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) -> Result<()>;

    fn stroke_rect(&mut self, pen: &Pen, rect: Rect) -> Result<()>;

    fn fill_rect(&mut self, brush: &Brush, rect: Rect) -> Result<()>;

    /// Strokes a closed geometry snapshot. An empty geometry is a no-op.
    fn stroke_path(&mut self, pen: &Pen, path: &crate::resource::PathGeometry) -> Result<()>;

    /// Fills a closed geometry snapshot. An empty geometry is a no-op.
    fn fill_path(&mut self, brush: &Brush, path: &crate::resource::PathGeometry) -> Result<()>;

    /// Fills the polygon described by `points`. Zero points is a no-op,
    /// never an error.
    fn fill_polygon(&mut self, brush: &Brush, points: &[Point]) -> Result<()>;

    /// Paints the whole image scaled into `dest`.
    fn draw_image(&mut self, image: &Image, dest: Rect) -> Result<()>;

    /// Paints the `src` region of the image scaled into `dest`.
    fn draw_image_region(&mut self, image: &Image, dest: Rect, src: Rect) -> Result<()>;

    /// Current clip bounds, or [`Rect::UNBOUNDED`] when the backend offers
    /// no clip query or no clip has been set. Callers must treat an
    /// unbounded clip as "no restriction", not literal pixel bounds.
    fn clip_bounds(&self) -> Result<Rect>;

    /// Replaces the active clip with `rect`.
    fn set_clip_replace(&mut self, rect: Rect) -> Result<()>;

    /// Subtracts `rect` from the active clip. Backends without region
    /// subtraction accept the call and leave the clip unchanged.
    fn set_clip_exclude(&mut self, rect: Rect) -> Result<()>;

    /// Switches the surface to anti-aliased rendering, returning the
    /// previous state for [`GraphicsSurface::restore_smoothing`]. Safe on
    /// every backend; where smoothing is unsupported the returned token is a
    /// no-op.
    fn set_anti_alias(&mut self) -> Result<SmoothingState>;

    /// Restores the smoothing state captured by
    /// [`GraphicsSurface::set_anti_alias`].
    fn restore_smoothing(&mut self, previous: SmoothingState) -> Result<()>;

    /// Fresh solid brush. Factories never hand out shared cached instances.
    fn create_solid_brush(&mut self, color: Color) -> Result<Brush> {
        Ok(Brush::Solid(color))
    }

    fn create_linear_gradient_brush(
        &mut self,
        rect: Rect,
        start: Color,
        end: Color,
        angle: f64,
    ) -> Result<Brush> {
        Ok(Brush::LinearGradient {
            rect,
            start,
            end,
            angle,
        })
    }

    fn create_texture_brush(
        &mut self,
        image: Image,
        viewport: Rect,
        offset: Point,
    ) -> Result<Brush> {
        Ok(Brush::Texture {
            image,
            viewport,
            offset,
        })
    }

    fn create_path(&mut self) -> Path {
        Path::new()
    }
}

/// Runs `body` with anti-aliasing switched on, restoring the previous
/// smoothing state on every exit path, including early error returns.
pub fn with_anti_alias<S, T>(
    surface: &mut S,
    body: impl FnOnce(&mut S) -> Result<T>,
) -> Result<T>
where
    S: GraphicsSurface + ?Sized,
{
    let previous = surface.set_anti_alias()?;
    let outcome = body(surface);
    surface.restore_smoothing(previous)?;
    outcome
}
