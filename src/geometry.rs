//! Value types shared by the paint core and every backend: colors, points,
//! sizes and rectangles. Pure data with conversion helpers; nothing here
//! touches a native toolkit.

/// An ARGB color with 8-bit channels. Value type, no identity; backends
/// convert it losslessly to their native representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb(0, 0, 0, 0);
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Color {
        Color { a, r, g, b }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { a: 255, r, g, b }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Channels normalized to `0.0 ..= 1.0` in (r, g, b, a) order, the form
    /// immediate-mode toolkits take.
    pub fn to_rgba_f64(&self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }

    /// CSS `rgba(..)` form used by document backends.
    pub fn to_rgba_string(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

/// A 2D position in device-independent units, top-left origin, Y-down.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Size {
        Size { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle. A nonpositive width or height means empty.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Sentinel returned by `clip_bounds` when the backend has no clip set or
    /// no clip query: "no meaningful restriction", not literal pixel bounds.
    pub const UNBOUNDED: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 9_999_999.0,
        height: 9_999_999.0,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_points(origin: Point, size: Size) -> Rect {
        Rect {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn is_unbounded(&self) -> bool {
        self.width >= Rect::UNBOUNDED.width && self.height >= Rect::UNBOUNDED.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_round_trips_to_normalized_channels() {
        let c = Color::from_argb(255, 255, 0, 0);
        assert_eq!(c.to_rgba_f64(), (1.0, 0.0, 0.0, 1.0));
        assert_eq!(c.to_rgba_string(), "rgba(255,0,0,1)");
        assert!(!c.is_transparent());
        assert!(Color::TRANSPARENT.is_transparent());
    }

    #[test]
    fn rect_intersection_and_emptiness() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Rect::new(5.0, 5.0, 5.0, 5.0));

        let disjoint = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersect(&disjoint).is_empty());
    }

    #[test]
    fn unbounded_sentinel_is_not_degenerate() {
        assert!(!Rect::UNBOUNDED.is_empty());
        assert!(Rect::UNBOUNDED.is_unbounded());
        assert!(Rect::UNBOUNDED.width > 100_000.0);
    }
}
