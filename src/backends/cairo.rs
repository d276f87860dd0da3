//! Cairo backend behind the optional `cairo` crate feature: an
//! immediate-mode adapter translating surface calls into `cairo::Context`
//! operations. Text uses the toy API, so measurement and drawing share the
//! same metrics. Clip exclusion and inset pen alignment are capability gaps
//! and degrade rather than fail.

use cairo::{
    Antialias, Context, Extend, Filter, FontSlant, FontWeight, Format, ImageSurface, LineCap as CairoLineCap,
    LineJoin as CairoLineJoin, Matrix, SurfacePattern,
};

use crate::api::{GraphicsSurface, Smoothing, SmoothingState, TextFit};
use crate::error::Result;
use crate::geometry::{Color, Point, Rect, Size};
use crate::resource::{
    Brush, Corner, Font, Image, LineCap, LineJoin, PathGeometry, Pen, PenAlignment, Segment,
    linear_gradient_line,
};

/// One paint pass onto a `cairo::Context`. The context is reference counted
/// by cairo itself; the surface takes its handle at construction and
/// releases it on drop, so there is no separate dispose step and no release
/// flag to get wrong. Callers that need the context after the pass keep
/// their own clone.
pub struct CairoSurface {
    ctx: Context,
}

impl CairoSurface {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Ends the pass, handing the context back.
    pub fn into_context(self) -> Context {
        self.ctx
    }

    fn apply_brush(&self, brush: &Brush) -> Result<()> {
        match brush {
            Brush::Solid(color) => {
                let (r, g, b, a) = color.to_rgba_f64();
                self.ctx.set_source_rgba(r, g, b, a);
            }
            Brush::LinearGradient {
                rect,
                start,
                end,
                angle,
            } => {
                let (from, to) = linear_gradient_line(rect, *angle);
                let pattern = cairo::LinearGradient::new(from.x, from.y, to.x, to.y);
                let (r, g, b, a) = start.to_rgba_f64();
                pattern.add_color_stop_rgba(0.0, r, g, b, a);
                let (r, g, b, a) = end.to_rgba_f64();
                pattern.add_color_stop_rgba(1.0, r, g, b, a);
                self.ctx.set_source(&pattern)?;
            }
            Brush::Texture {
                image,
                viewport,
                offset,
            } => {
                let surface = self.image_surface(image)?;
                let pattern = SurfacePattern::create(&surface);
                pattern.set_extend(Extend::Repeat);
                pattern.set_filter(Filter::Good);
                let mut matrix = Matrix::identity();
                matrix.translate(-(viewport.x + offset.x), -(viewport.y + offset.y));
                pattern.set_matrix(matrix);
                self.ctx.set_source(&pattern)?;
            }
        }
        Ok(())
    }

    /// Realizes the stroke descriptor onto the context. Rebuilt on every
    /// draw call since pen parameters may change between uses; the result
    /// depends only on the descriptor.
    fn apply_pen(&self, pen: &Pen) -> Result<()> {
        pen.validate()?;
        let (r, g, b, a) = pen.color.to_rgba_f64();
        self.ctx.set_source_rgba(r, g, b, a);
        self.ctx.set_line_width(pen.width);
        self.ctx.set_line_cap(map_line_cap(pen.cap));
        self.ctx.set_line_join(map_line_join(pen.join));
        self.ctx.set_dash(&pen.dash_pattern(), 0.0);
        if pen.alignment == PenAlignment::Inset {
            log::debug!("inset pen alignment unsupported by cairo; stroking centered");
        }
        Ok(())
    }

    fn apply_font(&self, font: &Font) {
        let slant = if font.style().italic {
            FontSlant::Italic
        } else {
            FontSlant::Normal
        };
        let weight = if font.style().bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        };
        self.ctx.select_font_face(font.family(), slant, weight);
        self.ctx.set_font_size(font.size());
    }

    fn trace_geometry(&self, geometry: &PathGeometry) {
        self.ctx.new_path();
        for figure in geometry.figures() {
            self.ctx.move_to(figure.start.x, figure.start.y);
            let mut last = figure.start;
            for segment in &figure.segments {
                match segment {
                    Segment::Line { to } => {
                        self.ctx.line_to(to.x, to.y);
                        last = *to;
                    }
                    Segment::Arc { to, radius, corner } => {
                        self.trace_corner_arc(last, *to, *radius, *corner);
                        last = *to;
                    }
                }
            }
            if figure.closed {
                self.ctx.close_path();
            }
        }
    }

    /// Quarter arc from the current point to `to`, turning through `corner`.
    /// The arc's bounding square is anchored at the near edges of the two
    /// points, matching how rounded borders are emitted by the paint core.
    fn trace_corner_arc(&self, last: Point, to: Point, radius: f64, corner: Corner) {
        use std::f64::consts::{FRAC_PI_2, PI};

        let r = radius.max(0.0);
        if r == 0.0 {
            self.ctx.line_to(to.x, to.y);
            return;
        }
        let left = to.x.min(last.x)
            - if matches!(corner, Corner::TopRight | Corner::BottomRight) {
                r
            } else {
                0.0
            };
        let top = to.y.min(last.y)
            - if matches!(corner, Corner::BottomLeft | Corner::BottomRight) {
                r
            } else {
                0.0
            };
        let cx = left + r;
        let cy = top + r;
        let start = match corner {
            Corner::TopLeft => PI,
            Corner::TopRight => 1.5 * PI,
            Corner::BottomRight => 0.0,
            Corner::BottomLeft => FRAC_PI_2,
        };
        self.ctx.arc(cx, cy, r, start, start + FRAC_PI_2);
    }

    fn image_surface(&self, image: &Image) -> Result<ImageSurface> {
        let width = image.width();
        let height = image.height();
        let data = image.data_rgba();

        let mut buf = vec![0u8; data.len()];
        for (i, chunk) in data.chunks_exact(4).enumerate() {
            let r = chunk[0] as u16;
            let g = chunk[1] as u16;
            let b = chunk[2] as u16;
            let a = chunk[3] as u16;
            let pr = (r * a + 127) / 255;
            let pg = (g * a + 127) / 255;
            let pb = (b * a + 127) / 255;
            let idx = i * 4;
            // Cairo ARgb32 expects premultiplied alpha, native-endian (BGRA
            // on little-endian).
            buf[idx] = pb as u8;
            buf[idx + 1] = pg as u8;
            buf[idx + 2] = pr as u8;
            buf[idx + 3] = a as u8;
        }

        let stride = (width * 4) as i32;
        let surface =
            ImageSurface::create_for_data(buf, Format::ARgb32, width as i32, height as i32, stride)?;
        Ok(surface)
    }

    fn paint_image(&self, image: &Image, dest: Rect, src: Option<Rect>) -> Result<()> {
        if dest.is_empty() {
            return Ok(());
        }
        let src = src.unwrap_or_else(|| Rect::new(0.0, 0.0, image.width() as f64, image.height() as f64));
        if src.is_empty() {
            return Ok(());
        }
        let surface = self.image_surface(image)?;
        let pattern = SurfacePattern::create(&surface);
        pattern.set_filter(Filter::Good);
        pattern.set_extend(Extend::None);

        let scale_x = dest.width / src.width;
        let scale_y = dest.height / src.height;

        self.ctx.save()?;
        self.ctx.rectangle(dest.x, dest.y, dest.width, dest.height);
        self.ctx.clip();
        self.ctx.translate(dest.x, dest.y);
        self.ctx.scale(scale_x, scale_y);
        self.ctx.translate(-src.x, -src.y);
        self.ctx.set_source(&pattern)?;
        self.ctx.paint()?;
        self.ctx.restore()?;
        Ok(())
    }
}

impl GraphicsSurface for CairoSurface {
    fn measure_text(&self, text: &str, font: &Font) -> Result<Size> {
        self.apply_font(font);
        let extents = self.ctx.text_extents(text)?;
        let font_extents = self.ctx.font_extents()?;
        Ok(Size::new(extents.x_advance(), font_extents.height()))
    }

    fn measure_text_fit(&self, text: &str, font: &Font, max_width: f64) -> Result<TextFit> {
        self.apply_font(font);
        let size = self.measure_text(text, font)?;

        let mut chars_fit = 0;
        let mut fit_width = 0.0;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let advance = self.ctx.text_extents(ch.encode_utf8(&mut buf))?.x_advance();
            if fit_width + advance > max_width {
                break;
            }
            fit_width += advance;
            chars_fit += 1;
        }

        Ok(TextFit {
            size,
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
        if text.is_empty() {
            return Ok(());
        }
        self.apply_font(font);
        let (r, g, b, a) = color.to_rgba_f64();
        self.ctx.set_source_rgba(r, g, b, a);

        let font_extents = self.ctx.font_extents()?;
        let advance = self.ctx.text_extents(text)?.x_advance();
        // The toy API shapes left-to-right only; an rtl run anchors to the
        // right edge of the advisory layout box instead.
        let x = if rtl {
            origin.x + size.width - advance
        } else {
            origin.x
        };
        let baseline = origin.y + font_extents.ascent();
        self.ctx.move_to(x, baseline);
        self.ctx.show_text(text)?;

        if font.style().underline {
            let thickness = (font.size() / 16.0).max(1.0);
            self.ctx.rectangle(x, baseline + 1.0, advance, thickness);
            self.ctx.fill()?;
        }
        Ok(())
    }

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) -> Result<()> {
        self.apply_pen(pen)?;
        self.ctx.new_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke()?;
        Ok(())
    }

    fn stroke_rect(&mut self, pen: &Pen, rect: Rect) -> Result<()> {
        self.apply_pen(pen)?;
        self.ctx.new_path();
        self.ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.ctx.stroke()?;
        Ok(())
    }

    fn fill_rect(&mut self, brush: &Brush, rect: Rect) -> Result<()> {
        self.apply_brush(brush)?;
        self.ctx.new_path();
        self.ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.ctx.fill()?;
        Ok(())
    }

    fn stroke_path(&mut self, pen: &Pen, path: &PathGeometry) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        self.apply_pen(pen)?;
        self.trace_geometry(path);
        self.ctx.stroke()?;
        Ok(())
    }

    fn fill_path(&mut self, brush: &Brush, path: &PathGeometry) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        self.apply_brush(brush)?;
        self.trace_geometry(path);
        self.ctx.fill()?;
        Ok(())
    }

    fn fill_polygon(&mut self, brush: &Brush, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        self.apply_brush(brush)?;
        self.ctx.new_path();
        self.ctx.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.fill()?;
        Ok(())
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) -> Result<()> {
        self.paint_image(image, dest, None)
    }

    fn draw_image_region(&mut self, image: &Image, dest: Rect, src: Rect) -> Result<()> {
        self.paint_image(image, dest, Some(src))
    }

    fn clip_bounds(&self) -> Result<Rect> {
        let (x1, y1, x2, y2) = self.ctx.clip_extents()?;
        Ok(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    fn set_clip_replace(&mut self, rect: Rect) -> Result<()> {
        self.ctx.reset_clip();
        self.ctx.new_path();
        self.ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.ctx.clip();
        Ok(())
    }

    fn set_clip_exclude(&mut self, _rect: Rect) -> Result<()> {
        // Cairo clips are intersect-only; subtracting a rectangle would need
        // a region abstraction the context does not expose. Accepted and
        // left unchanged per the capability-gap policy.
        log::debug!("clip exclusion unsupported by the cairo backend; clip left unchanged");
        Ok(())
    }

    fn set_anti_alias(&mut self) -> Result<SmoothingState> {
        let previous = map_antialias(self.ctx.antialias());
        self.ctx.set_antialias(Antialias::Good);
        Ok(SmoothingState::previous(previous))
    }

    fn restore_smoothing(&mut self, previous: SmoothingState) -> Result<()> {
        if let Some(mode) = previous.0 {
            self.ctx.set_antialias(map_smoothing(mode));
        }
        Ok(())
    }
}

fn map_line_cap(cap: LineCap) -> CairoLineCap {
    match cap {
        LineCap::Butt => CairoLineCap::Butt,
        LineCap::Round => CairoLineCap::Round,
        LineCap::Square => CairoLineCap::Square,
    }
}

fn map_line_join(join: LineJoin) -> CairoLineJoin {
    match join {
        LineJoin::Miter => CairoLineJoin::Miter,
        LineJoin::Round => CairoLineJoin::Round,
        LineJoin::Bevel => CairoLineJoin::Bevel,
    }
}

fn map_antialias(mode: Antialias) -> Smoothing {
    match mode {
        Antialias::None => Smoothing::Aliased,
        Antialias::Default => Smoothing::Default,
        _ => Smoothing::AntiAlias,
    }
}

fn map_smoothing(mode: Smoothing) -> Antialias {
    match mode {
        Smoothing::Default => Antialias::Default,
        Smoothing::AntiAlias => Antialias::Good,
        Smoothing::Aliased => Antialias::None,
    }
}
