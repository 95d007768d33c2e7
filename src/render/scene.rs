//! Scene: the per-frame display list a lab hands to the drawing surface
//!
//! Coordinates are logical units on a `width × height` surface with the
//! origin at the top left and y growing downwards, the way every lab lays
//! out its drawing. Angles are radians, measured clockwise from +x (again
//! y-down).

use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// From a 0xRRGGBB literal
    pub const fn hex(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// Linear blend, `t` clamped to 0..=1
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Darken towards black; `factor` 1.0 leaves the color as is
    pub fn dim(self, factor: f64) -> Rgb {
        Rgb::BLACK.lerp(self, factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientAxis {
    /// Color changes left to right
    Horizontal,
    /// Color changes top to bottom
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        color: Rgb,
    },
    Polyline {
        points: Vec<Point>,
        color: Rgb,
    },
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Rgb,
        filled: bool,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Rgb,
        filled: bool,
    },
    Text {
        at: Point,
        text: String,
        color: Rgb,
    },
    Gradient {
        origin: Point,
        width: f64,
        height: f64,
        from: Rgb,
        to: Rgb,
        axis: GradientAxis,
    },
}

impl Shape {
    fn is_finite(&self) -> bool {
        match self {
            Shape::Line { from, to, .. } => from.is_finite() && to.is_finite(),
            Shape::Polyline { points, .. } => points.iter().all(Point::is_finite),
            Shape::Arc {
                center,
                radius,
                start,
                end,
                ..
            } => center.is_finite() && radius.is_finite() && start.is_finite() && end.is_finite(),
            Shape::Rect {
                origin,
                width,
                height,
                ..
            }
            | Shape::Gradient {
                origin,
                width,
                height,
                ..
            } => origin.is_finite() && width.is_finite() && height.is_finite(),
            Shape::Text { at, .. } => at.is_finite(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: f64,
    height: f64,
    background: Rgb,
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Scene {
            width,
            height,
            background: Rgb::hex(0x020617),
            shapes: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Index of the first shape with a NaN or infinite coordinate
    pub fn first_non_finite(&self) -> Option<usize> {
        self.shapes.iter().position(|shape| !shape.is_finite())
    }

    pub fn push(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    pub fn line(&mut self, from: Point, to: Point, color: Rgb) -> &mut Self {
        self.push(Shape::Line { from, to, color })
    }

    pub fn polyline(&mut self, points: Vec<Point>, color: Rgb) -> &mut Self {
        self.push(Shape::Polyline { points, color })
    }

    pub fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Rgb) -> &mut Self {
        self.push(Shape::Arc {
            center,
            radius,
            start,
            end,
            color,
            filled: false,
        })
    }

    pub fn circle(&mut self, center: Point, radius: f64, color: Rgb) -> &mut Self {
        self.arc(center, radius, 0.0, TAU, color)
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) -> &mut Self {
        self.push(Shape::Arc {
            center,
            radius,
            start: 0.0,
            end: TAU,
            color,
            filled: true,
        })
    }

    pub fn rect(&mut self, origin: Point, width: f64, height: f64, color: Rgb) -> &mut Self {
        self.push(Shape::Rect {
            origin,
            width,
            height,
            color,
            filled: false,
        })
    }

    pub fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Rgb) -> &mut Self {
        self.push(Shape::Rect {
            origin,
            width,
            height,
            color,
            filled: true,
        })
    }

    pub fn text(&mut self, at: Point, text: impl Into<String>, color: Rgb) -> &mut Self {
        self.push(Shape::Text {
            at,
            text: text.into(),
            color,
        })
    }

    pub fn gradient(
        &mut self,
        origin: Point,
        width: f64,
        height: f64,
        from: Rgb,
        to: Rgb,
        axis: GradientAxis,
    ) -> &mut Self {
        self.push(Shape::Gradient {
            origin,
            width,
            height,
            from,
            to,
            axis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_lerp() {
        assert_eq!(Rgb::hex(0x3b82f6), Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.5), Rgb(128, 128, 128));
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 4.0), Rgb::WHITE);
        assert_eq!(Rgb(200, 100, 50).dim(0.0), Rgb::BLACK);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut scene = Scene::new(100.0, 50.0);
        scene
            .line(Point::new(0.0, 0.0), Point::new(10.0, 10.0), Rgb::WHITE)
            .fill_circle(Point::new(f64::NAN, 3.0), 2.0, Rgb::WHITE);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.first_non_finite(), Some(1));
    }
}
