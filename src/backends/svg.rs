//! SVG backend using a streaming XML writer, behind the optional `svg`
//! feature. Each draw call is emitted immediately as one element; gradient,
//! pattern and clip definitions are written inline as `<defs>` right before
//! first use. Text metrics use the portable fallback metric since no shaping
//! engine is available here — a documented capability gap, not an error.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use png::{ColorType, Encoder as PngEncoder};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::api::{GraphicsSurface, Smoothing, SmoothingState, TextFit};
use crate::error::Result;
use crate::geometry::{Color, Point, Rect, Size};
use crate::resource::{
    Brush, DashStyle, Font, Image, LineCap, LineJoin, PathGeometry, Pen, Segment,
    linear_gradient_line,
};

/// One paint pass emitting an SVG document into the provided sink.
///
/// Call [`SvgSurface::finish`] to close the root element and recover the
/// sink; because `finish` consumes the surface, a pass cannot be ended
/// twice. Dropping an unfinished surface simply abandons the document.
pub struct SvgSurface<W: Write> {
    writer: Writer<W>,
    open_root: bool,
    clip: Option<Rect>,
    clip_id: Option<String>,
    clip_counter: usize,
    gradient_counter: usize,
    pattern_counter: usize,
    smoothing: Smoothing,
}

impl<W: Write> SvgSurface<W> {
    /// Creates the surface and emits the root `<svg>`. Width and height are
    /// CSS pixels; a matching `viewBox` is set.
    pub fn new(inner: W, width: f64, height: f64) -> Result<Self> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let width_attr = width.to_string();
        let height_attr = height.to_string();
        let view_box_attr = format!("0 0 {} {}", width, height);

        let mut start = BytesStart::new("svg");
        start.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        start.push_attribute(("version", "1.1"));
        start.push_attribute(("width", width_attr.as_str()));
        start.push_attribute(("height", height_attr.as_str()));
        start.push_attribute(("viewBox", view_box_attr.as_str()));
        writer.write_event(Event::Start(start))?;

        Ok(Self {
            writer,
            open_root: true,
            clip: None,
            clip_id: None,
            clip_counter: 0,
            gradient_counter: 0,
            pattern_counter: 0,
            smoothing: Smoothing::Default,
        })
    }

    /// Finishes the document, closing the root element and returning the
    /// inner sink.
    pub fn finish(mut self) -> Result<W> {
        if self.open_root {
            self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
            self.open_root = false;
        }
        Ok(self.writer.into_inner())
    }

    fn write_empty(&mut self, elem: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    /// Clip and smoothing state attributes shared by every painted element.
    fn apply_state_attrs(&self, elem: &mut BytesStart<'_>) {
        if let Some(id) = &self.clip_id {
            let clip_attr = format!("url(#{})", id);
            elem.push_attribute(("clip-path", clip_attr.as_str()));
        }
        match self.smoothing {
            Smoothing::Default => {}
            Smoothing::AntiAlias => {
                elem.push_attribute(("shape-rendering", "geometricPrecision"));
            }
            Smoothing::Aliased => {
                elem.push_attribute(("shape-rendering", "crispEdges"));
            }
        }
    }

    fn fill_attr(&mut self, brush: &Brush) -> Result<String> {
        match brush {
            Brush::Solid(color) => Ok(color.to_rgba_string()),
            Brush::LinearGradient {
                rect,
                start,
                end,
                angle,
            } => {
                let id = format!("grad{}", self.gradient_counter);
                self.gradient_counter += 1;
                self.write_gradient_def(&id, rect, *start, *end, *angle)?;
                Ok(format!("url(#{})", id))
            }
            Brush::Texture {
                image,
                viewport,
                offset,
            } => {
                let id = format!("pat{}", self.pattern_counter);
                self.pattern_counter += 1;
                self.write_pattern_def(&id, image, viewport, offset)?;
                Ok(format!("url(#{})", id))
            }
        }
    }

    fn write_gradient_def(
        &mut self,
        id: &str,
        rect: &Rect,
        start: Color,
        end: Color,
        angle: f64,
    ) -> Result<()> {
        let (from, to) = linear_gradient_line(rect, angle);

        self.writer
            .write_event(Event::Start(BytesStart::new("defs")))?;

        let mut elem = BytesStart::new("linearGradient");
        elem.push_attribute(("id", id));
        elem.push_attribute(("gradientUnits", "userSpaceOnUse"));
        let x1_attr = from.x.to_string();
        let y1_attr = from.y.to_string();
        let x2_attr = to.x.to_string();
        let y2_attr = to.y.to_string();
        elem.push_attribute(("x1", x1_attr.as_str()));
        elem.push_attribute(("y1", y1_attr.as_str()));
        elem.push_attribute(("x2", x2_attr.as_str()));
        elem.push_attribute(("y2", y2_attr.as_str()));
        self.writer.write_event(Event::Start(elem))?;

        for (offset, color) in [(0.0, start), (1.0, end)] {
            let mut stop = BytesStart::new("stop");
            let offset_attr = offset.to_string();
            let color_attr = color.to_rgba_string();
            stop.push_attribute(("offset", offset_attr.as_str()));
            stop.push_attribute(("stop-color", color_attr.as_str()));
            self.writer.write_event(Event::Empty(stop))?;
        }

        self.writer
            .write_event(Event::End(BytesEnd::new("linearGradient")))?;
        self.writer.write_event(Event::End(BytesEnd::new("defs")))?;
        Ok(())
    }

    fn write_pattern_def(
        &mut self,
        id: &str,
        image: &Image,
        viewport: &Rect,
        offset: &Point,
    ) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new("defs")))?;

        let mut elem = BytesStart::new("pattern");
        elem.push_attribute(("id", id));
        elem.push_attribute(("patternUnits", "userSpaceOnUse"));
        let x_attr = (viewport.x + offset.x).to_string();
        let y_attr = (viewport.y + offset.y).to_string();
        let w_attr = viewport.width.to_string();
        let h_attr = viewport.height.to_string();
        elem.push_attribute(("x", x_attr.as_str()));
        elem.push_attribute(("y", y_attr.as_str()));
        elem.push_attribute(("width", w_attr.as_str()));
        elem.push_attribute(("height", h_attr.as_str()));
        self.writer.write_event(Event::Start(elem))?;

        let href = encode_png_data_uri(image)?;
        let mut tile = BytesStart::new("image");
        let iw_attr = image.width().to_string();
        let ih_attr = image.height().to_string();
        tile.push_attribute(("width", iw_attr.as_str()));
        tile.push_attribute(("height", ih_attr.as_str()));
        tile.push_attribute(("href", href.as_str()));
        tile.push_attribute(("preserveAspectRatio", "none"));
        self.writer.write_event(Event::Empty(tile))?;

        self.writer
            .write_event(Event::End(BytesEnd::new("pattern")))?;
        self.writer.write_event(Event::End(BytesEnd::new("defs")))?;
        Ok(())
    }

    fn push_stroke_attrs(elem: &mut BytesStart<'_>, pen: &Pen, attrs: &StrokeAttrs) {
        elem.push_attribute(("stroke", attrs.color.as_str()));
        elem.push_attribute(("stroke-width", attrs.width.as_str()));
        elem.push_attribute((
            "stroke-linecap",
            match pen.cap {
                LineCap::Butt => "butt",
                LineCap::Round => "round",
                LineCap::Square => "square",
            },
        ));
        elem.push_attribute((
            "stroke-linejoin",
            match pen.join {
                LineJoin::Miter => "miter",
                LineJoin::Round => "round",
                LineJoin::Bevel => "bevel",
            },
        ));
        if let Some(dash) = &attrs.dash {
            elem.push_attribute(("stroke-dasharray", dash.as_str()));
        }
    }
}

/// Owned attribute strings for a stroke; `BytesStart` borrows them.
struct StrokeAttrs {
    color: String,
    width: String,
    dash: Option<String>,
}

impl StrokeAttrs {
    fn from_pen(pen: &Pen) -> StrokeAttrs {
        let dash = if matches!(pen.dash, DashStyle::Solid) {
            None
        } else {
            Some(
                pen.dash_pattern()
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        };
        StrokeAttrs {
            color: pen.color.to_rgba_string(),
            width: pen.width.to_string(),
            dash,
        }
    }
}

fn path_data(geometry: &PathGeometry) -> String {
    let mut d = String::new();
    for figure in geometry.figures() {
        if !d.is_empty() {
            d.push(' ');
        }
        d.push_str(&format!("M {} {}", figure.start.x, figure.start.y));
        for segment in &figure.segments {
            match segment {
                Segment::Line { to } => {
                    d.push_str(&format!(" L {} {}", to.x, to.y));
                }
                Segment::Arc { to, radius, .. } => {
                    d.push_str(&format!(" A {} {} 0 0 1 {} {}", radius, radius, to.x, to.y));
                }
            }
        }
        if figure.closed {
            d.push_str(" Z");
        }
    }
    d
}

fn encode_png_data_uri(image: &Image) -> Result<String> {
    let mut png_bytes = Vec::new();
    let mut encoder = PngEncoder::new(&mut png_bytes, image.width(), image.height());
    encoder.set_color(ColorType::Rgba);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.data_rgba())?;
    writer.finish()?;

    let encoded = BASE64_STANDARD.encode(png_bytes);
    Ok(format!("data:image/png;base64,{}", encoded))
}

impl<W: Write> GraphicsSurface for SvgSurface<W> {
    fn measure_text(&self, text: &str, font: &Font) -> Result<Size> {
        let chars = text.chars().count() as f64;
        Ok(Size::new(chars * font.nominal_advance(), font.line_height()))
    }

    fn measure_text_fit(&self, text: &str, font: &Font, max_width: f64) -> Result<TextFit> {
        let advance = font.nominal_advance();
        let size = self.measure_text(text, font)?;

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
        let mut elem = BytesStart::new("text");
        // rtl runs anchor to the right edge of the advisory layout box.
        let x_attr = if rtl {
            (origin.x + size.width).to_string()
        } else {
            origin.x.to_string()
        };
        let y_attr = origin.y.to_string();
        let fill = color.to_rgba_string();
        let size_attr = font.size().to_string();
        elem.push_attribute(("x", x_attr.as_str()));
        elem.push_attribute(("y", y_attr.as_str()));
        elem.push_attribute(("fill", fill.as_str()));
        elem.push_attribute(("font-family", font.family()));
        elem.push_attribute(("font-size", size_attr.as_str()));
        elem.push_attribute(("dominant-baseline", "text-before-edge"));
        if rtl {
            elem.push_attribute(("direction", "rtl"));
            elem.push_attribute(("text-anchor", "end"));
        }
        if font.style().bold {
            elem.push_attribute(("font-weight", "bold"));
        }
        if font.style().italic {
            elem.push_attribute(("font-style", "italic"));
        }
        if font.style().underline {
            elem.push_attribute(("text-decoration", "underline"));
        }
        self.apply_state_attrs(&mut elem);
        self.writer.write_event(Event::Start(elem))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new("text")))?;
        Ok(())
    }

    fn draw_line(&mut self, pen: &Pen, from: Point, to: Point) -> Result<()> {
        pen.validate()?;
        let attrs = StrokeAttrs::from_pen(pen);
        let mut elem = BytesStart::new("line");
        let x1_attr = from.x.to_string();
        let y1_attr = from.y.to_string();
        let x2_attr = to.x.to_string();
        let y2_attr = to.y.to_string();
        elem.push_attribute(("x1", x1_attr.as_str()));
        elem.push_attribute(("y1", y1_attr.as_str()));
        elem.push_attribute(("x2", x2_attr.as_str()));
        elem.push_attribute(("y2", y2_attr.as_str()));
        Self::push_stroke_attrs(&mut elem, pen, &attrs);
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn stroke_rect(&mut self, pen: &Pen, rect: Rect) -> Result<()> {
        pen.validate()?;
        let attrs = StrokeAttrs::from_pen(pen);
        let mut elem = BytesStart::new("rect");
        let x_attr = rect.x.to_string();
        let y_attr = rect.y.to_string();
        let w_attr = rect.width.to_string();
        let h_attr = rect.height.to_string();
        elem.push_attribute(("x", x_attr.as_str()));
        elem.push_attribute(("y", y_attr.as_str()));
        elem.push_attribute(("width", w_attr.as_str()));
        elem.push_attribute(("height", h_attr.as_str()));
        elem.push_attribute(("fill", "none"));
        Self::push_stroke_attrs(&mut elem, pen, &attrs);
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn fill_rect(&mut self, brush: &Brush, rect: Rect) -> Result<()> {
        let fill = self.fill_attr(brush)?;
        let mut elem = BytesStart::new("rect");
        let x_attr = rect.x.to_string();
        let y_attr = rect.y.to_string();
        let w_attr = rect.width.to_string();
        let h_attr = rect.height.to_string();
        elem.push_attribute(("x", x_attr.as_str()));
        elem.push_attribute(("y", y_attr.as_str()));
        elem.push_attribute(("width", w_attr.as_str()));
        elem.push_attribute(("height", h_attr.as_str()));
        elem.push_attribute(("fill", fill.as_str()));
        elem.push_attribute(("stroke", "none"));
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn stroke_path(&mut self, pen: &Pen, path: &PathGeometry) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        pen.validate()?;
        let attrs = StrokeAttrs::from_pen(pen);
        let d = path_data(path);
        let mut elem = BytesStart::new("path");
        elem.push_attribute(("d", d.as_str()));
        elem.push_attribute(("fill", "none"));
        Self::push_stroke_attrs(&mut elem, pen, &attrs);
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn fill_path(&mut self, brush: &Brush, path: &PathGeometry) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let fill = self.fill_attr(brush)?;
        let d = path_data(path);
        let mut elem = BytesStart::new("path");
        elem.push_attribute(("d", d.as_str()));
        elem.push_attribute(("fill", fill.as_str()));
        elem.push_attribute(("stroke", "none"));
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn fill_polygon(&mut self, brush: &Brush, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let fill = self.fill_attr(brush)?;
        let points_attr = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let mut elem = BytesStart::new("polygon");
        elem.push_attribute(("points", points_attr.as_str()));
        elem.push_attribute(("fill", fill.as_str()));
        elem.push_attribute(("stroke", "none"));
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) -> Result<()> {
        if dest.is_empty() {
            return Ok(());
        }
        let href = encode_png_data_uri(image)?;
        let mut elem = BytesStart::new("image");
        let x_attr = dest.x.to_string();
        let y_attr = dest.y.to_string();
        let w_attr = dest.width.to_string();
        let h_attr = dest.height.to_string();
        elem.push_attribute(("x", x_attr.as_str()));
        elem.push_attribute(("y", y_attr.as_str()));
        elem.push_attribute(("width", w_attr.as_str()));
        elem.push_attribute(("height", h_attr.as_str()));
        elem.push_attribute(("href", href.as_str()));
        elem.push_attribute(("preserveAspectRatio", "none"));
        self.apply_state_attrs(&mut elem);
        self.write_empty(elem)
    }

    fn draw_image_region(&mut self, image: &Image, dest: Rect, src: Rect) -> Result<()> {
        if dest.is_empty() || src.is_empty() {
            return Ok(());
        }
        // A nested <svg> with a viewBox crops the source region into the
        // destination rectangle.
        let mut outer = BytesStart::new("svg");
        let x_attr = dest.x.to_string();
        let y_attr = dest.y.to_string();
        let w_attr = dest.width.to_string();
        let h_attr = dest.height.to_string();
        let view_box_attr = format!("{} {} {} {}", src.x, src.y, src.width, src.height);
        outer.push_attribute(("x", x_attr.as_str()));
        outer.push_attribute(("y", y_attr.as_str()));
        outer.push_attribute(("width", w_attr.as_str()));
        outer.push_attribute(("height", h_attr.as_str()));
        outer.push_attribute(("viewBox", view_box_attr.as_str()));
        outer.push_attribute(("preserveAspectRatio", "none"));
        self.apply_state_attrs(&mut outer);
        self.writer.write_event(Event::Start(outer))?;

        let href = encode_png_data_uri(image)?;
        let mut inner = BytesStart::new("image");
        let iw_attr = image.width().to_string();
        let ih_attr = image.height().to_string();
        inner.push_attribute(("width", iw_attr.as_str()));
        inner.push_attribute(("height", ih_attr.as_str()));
        inner.push_attribute(("href", href.as_str()));
        self.writer.write_event(Event::Empty(inner))?;

        self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
        Ok(())
    }

    fn clip_bounds(&self) -> Result<Rect> {
        Ok(self.clip.unwrap_or(Rect::UNBOUNDED))
    }

    fn set_clip_replace(&mut self, rect: Rect) -> Result<()> {
        let id = format!("clip{}", self.clip_counter);
        self.clip_counter += 1;

        self.writer
            .write_event(Event::Start(BytesStart::new("defs")))?;
        let mut clip_path = BytesStart::new("clipPath");
        clip_path.push_attribute(("id", id.as_str()));
        self.writer.write_event(Event::Start(clip_path))?;
        let mut clip_rect = BytesStart::new("rect");
        let x_attr = rect.x.to_string();
        let y_attr = rect.y.to_string();
        let w_attr = rect.width.to_string();
        let h_attr = rect.height.to_string();
        clip_rect.push_attribute(("x", x_attr.as_str()));
        clip_rect.push_attribute(("y", y_attr.as_str()));
        clip_rect.push_attribute(("width", w_attr.as_str()));
        clip_rect.push_attribute(("height", h_attr.as_str()));
        self.writer.write_event(Event::Empty(clip_rect))?;
        self.writer
            .write_event(Event::End(BytesEnd::new("clipPath")))?;
        self.writer.write_event(Event::End(BytesEnd::new("defs")))?;

        self.clip = Some(rect);
        self.clip_id = Some(id);
        Ok(())
    }

    fn set_clip_exclude(&mut self, _rect: Rect) -> Result<()> {
        // SVG clip paths are additive; subtracting a rectangle would need a
        // mask per element. Accepted and left unchanged.
        log::debug!("clip exclusion unsupported by the svg backend; clip left unchanged");
        Ok(())
    }

    fn set_anti_alias(&mut self) -> Result<SmoothingState> {
        let previous = self.smoothing;
        self.smoothing = Smoothing::AntiAlias;
        Ok(SmoothingState::previous(previous))
    }

    fn restore_smoothing(&mut self, previous: SmoothingState) -> Result<()> {
        if let Some(mode) = previous.0 {
            self.smoothing = mode;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{FontStyle, Path};

    fn svg_output<F>(f: F) -> String
    where
        F: FnOnce(&mut SvgSurface<Vec<u8>>) -> Result<()>,
    {
        let buf = Vec::new();
        let mut svg = SvgSurface::new(buf, 200.0, 100.0).expect("create svg");
        f(&mut svg).expect("draw operations");
        let out = svg.finish().expect("finish svg");
        String::from_utf8(out).expect("utf8")
    }

    fn font() -> Font {
        Font::new("Serif", 12.0, FontStyle::REGULAR).unwrap()
    }

    #[test]
    fn writes_solid_rect_fill() {
        let out = svg_output(|svg| {
            let brush = Brush::Solid(Color::from_argb(255, 255, 0, 0));
            svg.fill_rect(&brush, Rect::new(0.0, 0.0, 100.0, 50.0))
        });

        assert!(out.contains(
            "<rect x=\"0\" y=\"0\" width=\"100\" height=\"50\" fill=\"rgba(255,0,0,1)\" stroke=\"none\"/>"
        ));
    }

    #[test]
    fn writes_gradient_defs_and_usage() {
        let out = svg_output(|svg| {
            let brush = svg.create_linear_gradient_brush(
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Color::from_rgb(255, 0, 0),
                Color::from_rgb(0, 0, 255),
                0.0,
            )?;
            svg.fill_rect(&brush, Rect::new(0.0, 0.0, 10.0, 10.0))
        });

        assert!(out.contains("<linearGradient id=\"grad0\""));
        assert!(out.contains("stop-color=\"rgba(255,0,0,1)\""));
        assert!(out.contains("stop-color=\"rgba(0,0,255,1)\""));
        assert!(out.contains("fill=\"url(#grad0)\""));
    }

    #[test]
    fn clip_replace_emits_def_and_marks_elements() {
        let out = svg_output(|svg| {
            svg.set_clip_replace(Rect::new(10.0, 10.0, 50.0, 50.0))?;
            svg.fill_rect(&Brush::Solid(Color::BLACK), Rect::new(0.0, 0.0, 100.0, 100.0))
        });

        assert!(out.contains("<clipPath id=\"clip0\">"));
        assert!(out.contains("clip-path=\"url(#clip0)\""));
    }

    #[test]
    fn clip_bounds_track_replace_and_start_unbounded() {
        let mut svg = SvgSurface::new(Vec::new(), 100.0, 100.0).unwrap();
        assert_eq!(svg.clip_bounds().unwrap(), Rect::UNBOUNDED);

        let clip = Rect::new(1.0, 2.0, 3.0, 4.0);
        svg.set_clip_replace(clip).unwrap();
        assert_eq!(svg.clip_bounds().unwrap(), clip);

        svg.set_clip_exclude(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(svg.clip_bounds().unwrap(), clip);
    }

    #[test]
    fn writes_text_run_with_font_attributes() {
        let styled = Font::new(
            "Serif",
            12.0,
            FontStyle {
                bold: true,
                italic: false,
                underline: true,
            },
        )
        .unwrap();
        let out = svg_output(|svg| {
            let size = svg.measure_text("hi", &styled)?;
            svg.draw_text(
                "hi",
                &styled,
                Color::BLACK,
                Point::new(5.0, 7.0),
                size,
                false,
            )
        });

        assert!(out.contains("<text x=\"5\" y=\"7\""));
        assert!(out.contains("font-family=\"Serif\""));
        assert!(out.contains("font-size=\"12\""));
        assert!(out.contains("font-weight=\"bold\""));
        assert!(out.contains("text-decoration=\"underline\""));
        assert!(out.contains(">hi</text>"));
    }

    #[test]
    fn rtl_text_anchors_to_box_right_edge() {
        let out = svg_output(|svg| {
            let f = font();
            svg.draw_text(
                "abc",
                &f,
                Color::BLACK,
                Point::new(10.0, 0.0),
                Size::new(40.0, 14.4),
                true,
            )
        });

        assert!(out.contains("<text x=\"50\""));
        assert!(out.contains("direction=\"rtl\""));
        assert!(out.contains("text-anchor=\"end\""));
    }

    #[test]
    fn draw_image_inlines_png_data_uri() {
        let img = Image::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap();
        let out = svg_output(|svg| svg.draw_image(&img, Rect::new(2.0, 3.0, 1.0, 1.0)));

        assert!(out.contains("<image"));
        assert!(out.contains("x=\"2\" y=\"3\" width=\"1\" height=\"1\""));
        assert!(out.contains("href=\"data:image/png;base64,"));
    }

    #[test]
    fn image_region_uses_nested_viewbox() {
        let img = Image::from_rgba(2, 2, vec![0; 16]).unwrap();
        let out = svg_output(|svg| {
            svg.draw_image_region(
                &img,
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(1.0, 1.0, 1.0, 1.0),
            )
        });

        assert!(out.contains("viewBox=\"1 1 1 1\""));
    }

    #[test]
    fn texture_brush_emits_pattern_def() {
        let img = Image::from_rgba(1, 1, vec![0, 255, 0, 255]).unwrap();
        let out = svg_output(|svg| {
            let brush = svg.create_texture_brush(
                img,
                Rect::new(0.0, 0.0, 8.0, 8.0),
                Point::new(2.0, 0.0),
            )?;
            svg.fill_rect(&brush, Rect::new(0.0, 0.0, 16.0, 16.0))
        });

        assert!(out.contains("<pattern id=\"pat0\""));
        assert!(out.contains("x=\"2\""));
        assert!(out.contains("fill=\"url(#pat0)\""));
    }

    #[test]
    fn empty_path_and_polygon_emit_nothing() {
        let out = svg_output(|svg| {
            svg.fill_polygon(&Brush::Solid(Color::BLACK), &[])?;
            svg.fill_path(&Brush::Solid(Color::BLACK), &Path::new().geometry())
        });

        assert!(!out.contains("<polygon"));
        assert!(!out.contains("<path"));
    }

    #[test]
    fn smoothing_pair_round_trips_rendering_hint() {
        let out = svg_output(|svg| {
            let token = svg.set_anti_alias()?;
            svg.fill_rect(&Brush::Solid(Color::BLACK), Rect::new(0.0, 0.0, 1.0, 1.0))?;
            svg.restore_smoothing(token)?;
            svg.fill_rect(&Brush::Solid(Color::BLACK), Rect::new(2.0, 0.0, 1.0, 1.0))
        });

        let first = out.find("shape-rendering=\"geometricPrecision\"");
        assert!(first.is_some());
        // Only the rect inside the pair carries the hint.
        assert_eq!(out.matches("shape-rendering").count(), 1);
    }
}
