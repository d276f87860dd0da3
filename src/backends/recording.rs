//! Recording backend: captures every draw call as a [`DrawOp`] instead of
//! rasterizing. Always compiled; it is the reference backend the surface
//! contract is tested against, and doubles as a display-list producer for
//! callers that want to replay a paint pass elsewhere.

use crate::api::{GraphicsSurface, Smoothing, SmoothingState, TextFit};
use crate::error::Result;
use crate::geometry::{Color, Point, Rect, Size};
use crate::resource::{Brush, Font, Image, PathGeometry, Pen};

/// Drawing state in effect when an op was recorded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateSnapshot {
    pub clip: Rect,
    pub smoothing: Smoothing,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Line {
        pen: Pen,
        from: Point,
        to: Point,
        state: StateSnapshot,
    },
    StrokeRect {
        pen: Pen,
        rect: Rect,
        state: StateSnapshot,
    },
    FillRect {
        brush: Brush,
        rect: Rect,
        state: StateSnapshot,
    },
    StrokePath {
        pen: Pen,
        geometry: PathGeometry,
        state: StateSnapshot,
    },
    FillPath {
        brush: Brush,
        geometry: PathGeometry,
        state: StateSnapshot,
    },
    FillPolygon {
        brush: Brush,
        points: Vec<Point>,
        state: StateSnapshot,
    },
    DrawImage {
        width: u32,
        height: u32,
        dest: Rect,
        src: Option<Rect>,
        state: StateSnapshot,
    },
    DrawText {
        text: String,
        font: Font,
        color: Color,
        origin: Point,
        size: Size,
        rtl: bool,
        state: StateSnapshot,
    },
    ClipReplace {
        rect: Rect,
    },
    ClipExclude {
        rect: Rect,
    },
    SetAntiAlias,
    RestoreSmoothing {
        mode: Smoothing,
    },
}

/// One recorded paint pass. Construct, draw, then take the ops with
/// [`RecordingSurface::into_ops`]; consuming the surface ends the pass, so a
/// second disposal is unrepresentable.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    clip: Option<Rect>,
    smoothing: Smoothing,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            clip: None,
            smoothing: Smoothing::Default,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            clip: self.clip.unwrap_or(Rect::UNBOUNDED),
            smoothing: self.smoothing,
        }
    }

    fn record(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl GraphicsSurface for RecordingSurface {
    fn measure_text(&self, text: &str, font: &Font) -> Result<Size> {
        let chars = text.chars().count() as f64;
        Ok(Size::new(chars * font.nominal_advance(), font.line_height()))
    }

    fn measure_text_fit(&self, text: &str, font: &Font, max_width: f64) -> Result<TextFit> {
        let advance = font.nominal_advance();
        let total = self.measure_text(text, font)?;

        let mut chars_fit = 0;
        let mut fit_width = 0.0;
        for _ in text.chars() {
            if fit_width + advance > max_width {
                break;
            }
            fit_width += advance;
            chars_fit += 1;
        }

        Ok(TextFit {
            size: total,
            chars_fit,
            fit_width,
        })
    }

    fn draw_text(
        &mut self,
        text: &str,
        font: &Font,
        color: Color,
        origin: Point,
        size: Size,
        rtl: bool,
    ) -> Result<()> {
        let op = DrawOp::DrawText {
            text: text.to_string(),
            font: font.clone(),
            color,
            origin,
            size,
            rtl,
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) -> Result<()> {
        pen.validate()?;
        let op = DrawOp::Line {
            pen: pen.clone(),
            from,
            to,
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn stroke_rect(&mut self, pen: &Pen, rect: Rect) -> Result<()> {
        pen.validate()?;
        let op = DrawOp::StrokeRect {
            pen: pen.clone(),
            rect,
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn fill_rect(&mut self, brush: &Brush, rect: Rect) -> Result<()> {
        let op = DrawOp::FillRect {
            brush: brush.clone(),
            rect,
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn stroke_path(&mut self, pen: &Pen, path: &PathGeometry) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        pen.validate()?;
        let op = DrawOp::StrokePath {
            pen: pen.clone(),
            geometry: path.clone(),
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn fill_path(&mut self, brush: &Brush, path: &PathGeometry) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let op = DrawOp::FillPath {
            brush: brush.clone(),
            geometry: path.clone(),
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn fill_polygon(&mut self, brush: &Brush, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let op = DrawOp::FillPolygon {
            brush: brush.clone(),
            points: points.to_vec(),
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) -> Result<()> {
        let op = DrawOp::DrawImage {
            width: image.width(),
            height: image.height(),
            dest,
            src: None,
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn draw_image_region(&mut self, image: &Image, dest: Rect, src: Rect) -> Result<()> {
        let op = DrawOp::DrawImage {
            width: image.width(),
            height: image.height(),
            dest,
            src: Some(src),
            state: self.snapshot(),
        };
        self.record(op);
        Ok(())
    }

    fn clip_bounds(&self) -> Result<Rect> {
        Ok(self.clip.unwrap_or(Rect::UNBOUNDED))
    }

    fn set_clip_replace(&mut self, rect: Rect) -> Result<()> {
        self.clip = Some(rect);
        self.record(DrawOp::ClipReplace { rect });
        Ok(())
    }

    fn set_clip_exclude(&mut self, rect: Rect) -> Result<()> {
        // A rectangle minus a rectangle is not a rectangle; the tracked clip
        // bounds stay unchanged while the exclusion itself is recorded for
        // replay.
        self.record(DrawOp::ClipExclude { rect });
        Ok(())
    }

    fn set_anti_alias(&mut self) -> Result<SmoothingState> {
        let previous = self.smoothing;
        self.smoothing = Smoothing::AntiAlias;
        self.record(DrawOp::SetAntiAlias);
        Ok(SmoothingState::previous(previous))
    }

    fn restore_smoothing(&mut self, previous: SmoothingState) -> Result<()> {
        if let Some(mode) = previous.0 {
            self.smoothing = mode;
            self.record(DrawOp::RestoreSmoothing { mode });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::with_anti_alias;
    use crate::error::FoliumError;
    use crate::resource::{FontStyle, Path};

    fn font() -> Font {
        Font::new("Serif", 10.0, FontStyle::REGULAR).unwrap()
    }

    #[test]
    fn measure_text_is_idempotent() {
        let surface = RecordingSurface::new();
        let f = font();
        let first = surface.measure_text("hello world", &f).unwrap();
        let second = surface.measure_text("hello world", &f).unwrap();
        assert!((first.width - second.width).abs() < 1e-12);
        assert!((first.height - second.height).abs() < 1e-12);
        assert!(first.width > 0.0);
        assert_eq!(first.height, f.line_height());
    }

    #[test]
    fn measure_text_fit_respects_bounds() {
        let surface = RecordingSurface::new();
        let f = font();
        let text = "hello world";
        let fit = surface.measure_text_fit(text, &f, 30.0).unwrap();

        assert!(fit.chars_fit <= text.chars().count());
        if fit.chars_fit < text.chars().count() {
            assert!(fit.fit_width <= 30.0);
        }
        assert!(fit.chars_fit > 0);

        let all = surface.measure_text_fit(text, &f, 10_000.0).unwrap();
        assert_eq!(all.chars_fit, text.chars().count());

        let none = surface.measure_text_fit(text, &f, 0.0).unwrap();
        assert_eq!(none.chars_fit, 0);
        assert_eq!(none.fit_width, 0.0);
    }

    #[test]
    fn solid_red_fill_records_exactly_one_op() {
        let mut surface = RecordingSurface::new();
        let red = Color::from_argb(255, 255, 0, 0);
        let brush = surface.create_solid_brush(red).unwrap();
        surface
            .fill_rect(&brush, Rect::new(0.0, 0.0, 100.0, 50.0))
            .unwrap();

        let ops = surface.into_ops();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            DrawOp::FillRect { brush, rect, .. } => {
                assert_eq!(*brush, Brush::Solid(red));
                assert_eq!(*rect, Rect::new(0.0, 0.0, 100.0, 50.0));
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn empty_polygon_and_path_are_no_ops() {
        let mut surface = RecordingSurface::new();
        let brush = Brush::Solid(Color::BLACK);
        let pen = Pen::new(Color::BLACK);

        surface.fill_polygon(&brush, &[]).unwrap();
        surface.fill_path(&brush, &Path::new().geometry()).unwrap();
        surface.stroke_path(&pen, &Path::new().geometry()).unwrap();

        assert!(surface.ops().is_empty());
    }

    #[test]
    fn smoothing_pair_round_trips_state() {
        let mut surface = RecordingSurface::new();
        assert_eq!(surface.smoothing(), Smoothing::Default);

        let prev = surface.set_anti_alias().unwrap();
        assert_eq!(surface.smoothing(), Smoothing::AntiAlias);
        surface.restore_smoothing(prev).unwrap();
        assert_eq!(surface.smoothing(), Smoothing::Default);

        // A no-op token is safe too.
        surface.restore_smoothing(SmoothingState::NOOP).unwrap();
        assert_eq!(surface.smoothing(), Smoothing::Default);
    }

    #[test]
    fn with_anti_alias_restores_on_error() {
        let mut surface = RecordingSurface::new();
        let bad_pen = Pen::new(Color::BLACK).with_width(-1.0);

        let result = with_anti_alias(&mut surface, |s| {
            s.draw_line(&bad_pen, Point::new(0.0, 0.0), Point::new(1.0, 1.0))
        });

        assert!(matches!(result, Err(FoliumError::Resource(_))));
        assert_eq!(surface.smoothing(), Smoothing::Default);
    }

    #[test]
    fn clip_starts_unbounded_and_tracks_replace() {
        let mut surface = RecordingSurface::new();
        let initial = surface.clip_bounds().unwrap();
        assert_eq!(initial, Rect::UNBOUNDED);
        assert!(!initial.is_empty());

        let clip = Rect::new(10.0, 10.0, 200.0, 100.0);
        surface.set_clip_replace(clip).unwrap();
        assert_eq!(surface.clip_bounds().unwrap(), clip);

        // Exclusion is accepted but leaves the tracked bounds alone.
        surface
            .set_clip_exclude(Rect::new(20.0, 20.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(surface.clip_bounds().unwrap(), clip);
    }

    #[test]
    fn draw_ops_carry_the_active_state() {
        let mut surface = RecordingSurface::new();
        let clip = Rect::new(0.0, 0.0, 50.0, 50.0);
        surface.set_clip_replace(clip).unwrap();
        let token = surface.set_anti_alias().unwrap();
        surface
            .fill_rect(&Brush::Solid(Color::BLACK), Rect::new(1.0, 1.0, 2.0, 2.0))
            .unwrap();
        surface.restore_smoothing(token).unwrap();

        let fill = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::FillRect { state, .. } => Some(*state),
                _ => None,
            })
            .expect("fill op recorded");
        assert_eq!(fill.clip, clip);
        assert_eq!(fill.smoothing, Smoothing::AntiAlias);
    }

    #[test]
    fn rtl_text_records_direction_and_box() {
        let mut surface = RecordingSurface::new();
        let f = font();
        let size = surface.measure_text("abc", &f).unwrap();
        surface
            .draw_text("abc", &f, Color::BLACK, Point::new(5.0, 7.0), size, true)
            .unwrap();

        match &surface.ops()[0] {
            DrawOp::DrawText {
                text,
                rtl,
                origin,
                size: box_size,
                ..
            } => {
                assert_eq!(text, "abc");
                assert!(*rtl);
                assert_eq!(*origin, Point::new(5.0, 7.0));
                assert_eq!(*box_size, size);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn image_draws_record_natural_and_source_rects() {
        let mut surface = RecordingSurface::new();
        let img = Image::from_rgba(2, 2, vec![0; 16]).unwrap();
        surface
            .draw_image(&img, Rect::new(0.0, 0.0, 4.0, 4.0))
            .unwrap();
        surface
            .draw_image_region(
                &img,
                Rect::new(0.0, 0.0, 2.0, 2.0),
                Rect::new(0.0, 0.0, 1.0, 1.0),
            )
            .unwrap();

        assert_eq!(surface.ops().len(), 2);
        match &surface.ops()[1] {
            DrawOp::DrawImage { src, .. } => assert_eq!(*src, Some(Rect::new(0.0, 0.0, 1.0, 1.0))),
            other => panic!("unexpected op {:?}", other),
        }
    }
}
