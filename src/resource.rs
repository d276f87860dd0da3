//! Portable drawing resources: brushes, pens, fonts, images and paths.
//!
//! Each resource is a descriptor the paint core constructs once (usually via
//! the surface factory methods) and reuses across many draw calls. Backends
//! realize a descriptor into their native form per use; nothing native is
//! stored here, so a resource outlives any single surface or paint pass.

use std::sync::Arc;

use crate::error::{FoliumError, Result};
use crate::geometry::{Color, Point, Rect, Size};

/// Fill capability. A closed sum type: every backend matches on the variant
/// and builds its native paint from the carried data, so no downcasting is
/// ever needed.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    LinearGradient {
        rect: Rect,
        start: Color,
        end: Color,
        /// Degrees clockwise from the positive X axis (Y-down).
        angle: f64,
    },
    Texture {
        image: Image,
        viewport: Rect,
        offset: Point,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DashStyle {
    Solid,
    Dash,
    Dot,
    Custom(Vec<f64>),
}

/// Where the stroke sits relative to the path. Backends without inset
/// stroking treat `Inset` as `Center`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenAlignment {
    Center,
    Inset,
}

/// Stroke descriptor. Width, dash and cap/join may be adjusted between draw
/// calls, so backends rebuild their native stroke from the descriptor on
/// every use rather than caching one.
#[derive(Clone, Debug, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    pub dash: DashStyle,
    pub cap: LineCap,
    pub join: LineJoin,
    pub alignment: PenAlignment,
}

impl Pen {
    pub fn new(color: Color) -> Pen {
        Pen {
            color,
            width: 1.0,
            dash: DashStyle::Solid,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            alignment: PenAlignment::Center,
        }
    }

    pub fn with_width(mut self, width: f64) -> Pen {
        self.width = width;
        self
    }

    /// The dash segments a backend should apply, scaled by the current
    /// width. Pure function of the descriptor: calling it twice yields the
    /// same pattern, so per-draw stroke rebuilds stay deterministic.
    pub fn dash_pattern(&self) -> Vec<f64> {
        let w = self.width.max(1.0);
        match &self.dash {
            DashStyle::Solid => Vec::new(),
            DashStyle::Dash => vec![2.0 * w, 2.0 * w],
            DashStyle::Dot => vec![w, w],
            DashStyle::Custom(segments) => segments.clone(),
        }
    }

    /// Rejects descriptors no backend can stroke with. Called by surfaces
    /// before drawing; a zero or negative width is a caller bug.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || !self.width.is_finite() {
            return Err(FoliumError::Resource(format!(
                "pen width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle {
        bold: false,
        italic: false,
        underline: false,
    };

    pub const fn bold() -> FontStyle {
        FontStyle {
            bold: true,
            italic: false,
            underline: false,
        }
    }
}

/// A glyph-run descriptor resolved against the hosting environment's font
/// catalog by the backend. Immutable; share it freely across draw calls and
/// across surfaces.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    family: String,
    size: f64,
    style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64, style: FontStyle) -> Result<Font> {
        let family = family.into();
        if family.trim().is_empty() {
            return Err(FoliumError::Resource("font family must not be empty".into()));
        }
        if size <= 0.0 || !size.is_finite() {
            return Err(FoliumError::Resource(format!(
                "font size must be positive, got {}",
                size
            )));
        }
        Ok(Font {
            family,
            size,
            style,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Line box height used by backends without real font metrics.
    pub fn line_height(&self) -> f64 {
        self.size * 1.2
    }

    /// Per-glyph advance used by backends without text shaping. Both
    /// measurement and drawing in such backends derive from this value, so
    /// the measure/draw consistency contract holds there too.
    pub fn nominal_advance(&self) -> f64 {
        if self.style.bold {
            self.size * 0.62
        } else {
            self.size * 0.58
        }
    }
}

/// A decoded raster image: RGBA8 pixels plus natural size. The payload sits
/// behind an `Arc`, so clones are cheap and a texture brush can share the
/// pixels with the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Image {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Image> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| FoliumError::Resource("image dimensions overflow".into()))?;
        if data.len() != expected {
            return Err(FoliumError::Resource(format!(
                "RGBA buffer length {} does not match {}x{}x4",
                data.len(),
                width,
                height
            )));
        }
        Ok(Image {
            width,
            height,
            data: data.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural size in device-independent units.
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn data_rgba(&self) -> &[u8] {
        &self.data
    }
}

/// Which rounded corner a quarter-circle path segment turns through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Line {
        to: Point,
    },
    /// Quarter arc of the given radius ending at `to`, turning through
    /// `corner`. Matches the rounded-border corners the paint core emits.
    Arc {
        to: Point,
        radius: f64,
        corner: Corner,
    },
}

impl Segment {
    pub fn end_point(&self) -> Point {
        match self {
            Segment::Line { to } => *to,
            Segment::Arc { to, .. } => *to,
        }
    }
}

/// One subpath: a start point, appended segments, and a closed flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub start: Point,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

/// An appendable 2D path. Append operations are the only mutators; call
/// [`Path::geometry`] to take an immutable closed snapshot for drawing. The
/// builder stays appendable after snapshotting.
#[derive(Clone, Debug, Default)]
pub struct Path {
    figures: Vec<Figure>,
    current: Option<Figure>,
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    /// Begins a new figure at `at`, finishing any figure in progress as open.
    pub fn start(&mut self, at: Point) {
        self.finish_current();
        self.current = Some(Figure {
            start: at,
            segments: Vec::new(),
            closed: false,
        });
    }

    pub fn line_to(&mut self, to: Point) {
        self.ensure_figure();
        if let Some(fig) = self.current.as_mut() {
            fig.segments.push(Segment::Line { to });
        }
    }

    pub fn arc_to(&mut self, to: Point, radius: f64, corner: Corner) {
        self.ensure_figure();
        if let Some(fig) = self.current.as_mut() {
            fig.segments.push(Segment::Arc { to, radius, corner });
        }
    }

    /// Marks the figure in progress as closed (its end connects back to its
    /// start) and ends it.
    pub fn close_figure(&mut self) {
        if let Some(mut fig) = self.current.take() {
            fig.closed = true;
            self.figures.push(fig);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty() && self.current.is_none()
    }

    /// Takes an immutable snapshot with every figure closed, the form the
    /// draw calls consume. Snapshotting twice without intervening appends
    /// yields equal geometry.
    pub fn geometry(&self) -> PathGeometry {
        let mut figures = self.figures.clone();
        if let Some(fig) = &self.current {
            let mut fig = fig.clone();
            fig.closed = true;
            figures.push(fig);
        }
        PathGeometry { figures }
    }

    fn ensure_figure(&mut self) {
        if self.current.is_none() {
            self.current = Some(Figure {
                start: Point::new(0.0, 0.0),
                segments: Vec::new(),
                closed: false,
            });
        }
    }

    fn finish_current(&mut self) {
        if let Some(fig) = self.current.take() {
            self.figures.push(fig);
        }
    }
}

/// Immutable closed-geometry snapshot of a [`Path`].
#[derive(Clone, Debug, PartialEq)]
pub struct PathGeometry {
    figures: Vec<Figure>,
}

impl PathGeometry {
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty() || self.figures.iter().all(|f| f.segments.is_empty())
    }
}

/// Endpoints of the gradient axis for a linear-gradient brush: the line
/// through the center of `rect` at `angle` degrees, extended to span the
/// rectangle. Shared by the shipped backends so gradients render the same
/// everywhere.
pub fn linear_gradient_line(rect: &Rect, angle: f64) -> (Point, Point) {
    let theta = angle.to_radians();
    let (sin, cos) = theta.sin_cos();
    let center = rect.center();
    // Half-extent of the rectangle projected onto the gradient direction.
    let half = (rect.width * cos.abs() + rect.height * sin.abs()) / 2.0;
    (
        Point::new(center.x - cos * half, center.y - sin * half),
        Point::new(center.x + cos * half, center.y + sin * half),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_dash_pattern_is_deterministic() {
        let mut pen = Pen::new(Color::BLACK).with_width(2.0);
        pen.dash = DashStyle::Dash;
        assert_eq!(pen.dash_pattern(), vec![4.0, 4.0]);
        assert_eq!(pen.dash_pattern(), pen.dash_pattern());

        pen.dash = DashStyle::Solid;
        assert!(pen.dash_pattern().is_empty());
    }

    #[test]
    fn pen_rejects_nonpositive_width() {
        let pen = Pen::new(Color::BLACK).with_width(0.0);
        assert!(pen.validate().is_err());
        assert!(Pen::new(Color::BLACK).validate().is_ok());
    }

    #[test]
    fn font_rejects_bad_descriptors() {
        assert!(Font::new("", 12.0, FontStyle::REGULAR).is_err());
        assert!(Font::new("Serif", 0.0, FontStyle::REGULAR).is_err());
        let font = Font::new("Serif", 12.0, FontStyle::bold()).unwrap();
        assert_eq!(font.family(), "Serif");
        assert!(font.nominal_advance() > 0.0);
        assert!(font.line_height() > font.size());
    }

    #[test]
    fn image_validates_buffer_length() {
        assert!(Image::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(Image::from_rgba(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn image_clones_share_pixels() {
        let img = Image::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        let clone = img.clone();
        assert_eq!(img, clone);
        assert_eq!(clone.data_rgba(), &[1, 2, 3, 4]);
    }

    #[test]
    fn path_snapshots_are_equal_and_closed() {
        let mut path = Path::new();
        path.start(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 0.0));
        path.line_to(Point::new(5.0, 8.0));

        let first = path.geometry();
        let second = path.geometry();
        assert_eq!(first, second);
        assert_eq!(first.figures().len(), 1);
        assert!(first.figures()[0].closed);
        assert_eq!(first.figures()[0].segments.len(), 2);
    }

    #[test]
    fn path_stays_appendable_after_snapshot() {
        let mut path = Path::new();
        path.start(Point::new(0.0, 0.0));
        path.line_to(Point::new(1.0, 0.0));
        let before = path.geometry();

        path.line_to(Point::new(1.0, 1.0));
        let after = path.geometry();
        assert_ne!(before, after);
        assert_eq!(after.figures()[0].segments.len(), 2);
    }

    #[test]
    fn empty_path_yields_empty_geometry() {
        let path = Path::new();
        assert!(path.is_empty());
        assert!(path.geometry().is_empty());
    }

    #[test]
    fn gradient_line_spans_rect_for_axis_angles() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);

        let (a, b) = linear_gradient_line(&rect, 0.0);
        assert!((a.x - 0.0).abs() < 1e-9);
        assert!((b.x - 100.0).abs() < 1e-9);
        assert!((a.y - 25.0).abs() < 1e-9);

        let (top, bottom) = linear_gradient_line(&rect, 90.0);
        assert!((top.y - 0.0).abs() < 1e-9);
        assert!((bottom.y - 50.0).abs() < 1e-9);
        assert!((top.x - 50.0).abs() < 1e-9);
    }
}
