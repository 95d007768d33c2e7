//! Lab canvas pane: rasterizes the latest [`Scene`] with braille dots

use crate::render::{GradientAxis, Point, Rgb, Scene, Shape};
use crate::ui::theme::{scene_color, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};
use std::f64::consts::TAU;

/// Braille cells are 2 dots wide and 4 tall
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

/// Scene-space size of one braille dot, used to space fill lines
#[derive(Debug, Clone, Copy)]
struct Resolution {
    x: f64,
    y: f64,
}

/// Render the canvas pane
pub fn render_canvas_pane(frame: &mut Frame, area: Rect, title: &str, scene: Option<&Scene>) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal))
        .title_style(
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        );

    let Some(scene) = scene else {
        let paragraph = Paragraph::new("(no frame yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment).bg(DEFAULT_THEME.bg));
        frame.render_widget(paragraph, area);
        return;
    };

    let inner = block.inner(area);
    let resolution = Resolution {
        x: scene.width() / (inner.width.max(1) as f64 * DOTS_X),
        y: scene.height() / (inner.height.max(1) as f64 * DOTS_Y),
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(scene_color(scene.background()))
        .x_bounds([0.0, scene.width()])
        .y_bounds([0.0, scene.height()])
        .paint(move |ctx| paint_scene(ctx, scene, resolution));
    frame.render_widget(canvas, area);
}

/// Draws scene shapes onto the y-up canvas
#[derive(Debug, Clone, Copy)]
struct Painter {
    height: f64,
    res: Resolution,
}

impl Painter {
    // scenes are y-down, the canvas is y-up
    fn flip(&self, p: Point) -> (f64, f64) {
        (p.x, self.height - p.y)
    }

    fn line(&self, ctx: &mut Context<'_>, a: Point, b: Point, color: Rgb) {
        let (x1, y1) = self.flip(a);
        let (x2, y2) = self.flip(b);
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: scene_color(color),
        });
    }

    fn fill_arc(
        &self,
        ctx: &mut Context<'_>,
        center: Point,
        radius: f64,
        outline: &[Point],
        full: bool,
        color: Rgb,
    ) {
        if full {
            // horizontal chords one dot apart
            let mut dy = -radius;
            while dy <= radius {
                let half = (radius * radius - dy * dy).max(0.0).sqrt();
                self.line(
                    ctx,
                    Point::new(center.x - half, center.y + dy),
                    Point::new(center.x + half, center.y + dy),
                    color,
                );
                dy += self.res.y.max(f64::EPSILON);
            }
        } else {
            for p in outline {
                self.line(ctx, center, *p, color);
            }
        }
    }
}

fn paint_scene(ctx: &mut Context<'_>, scene: &Scene, res: Resolution) {
    let painter = Painter {
        height: scene.height(),
        res,
    };

    for shape in scene.shapes() {
        match shape {
            Shape::Line { from, to, color } => painter.line(ctx, *from, *to, *color),
            Shape::Polyline { points, color } => {
                for pair in points.windows(2) {
                    painter.line(ctx, pair[0], pair[1], *color);
                }
            }
            Shape::Arc {
                center,
                radius,
                start,
                end,
                color,
                filled,
            } => {
                let points = arc_points(*center, *radius, *start, *end, res);
                if *filled {
                    let full = (end - start).abs() >= TAU - 1e-9;
                    painter.fill_arc(ctx, *center, *radius, &points, full, *color);
                } else {
                    for pair in points.windows(2) {
                        painter.line(ctx, pair[0], pair[1], *color);
                    }
                }
            }
            Shape::Rect {
                origin,
                width,
                height,
                color,
                filled,
            } => {
                if *filled {
                    for (a, b) in fill_rows(*origin, *width, *height, res) {
                        painter.line(ctx, a, b, *color);
                    }
                } else {
                    let corners = rect_corners(*origin, *width, *height);
                    for i in 0..4 {
                        painter.line(ctx, corners[i], corners[(i + 1) % 4], *color);
                    }
                }
            }
            Shape::Gradient {
                origin,
                width,
                height,
                from,
                to,
                axis,
            } => {
                for (a, b, t) in gradient_bands(*origin, *width, *height, *axis, res) {
                    painter.line(ctx, a, b, from.lerp(*to, t));
                }
            }
            // text goes on top of every shape
            Shape::Text { .. } => {}
        }
    }

    ctx.layer();
    for shape in scene.shapes() {
        if let Shape::Text { at, text, color } = shape {
            let (x, y) = painter.flip(*at);
            ctx.print(
                x,
                y,
                Span::styled(text.clone(), Style::default().fg(scene_color(*color))),
            );
        }
    }
}

fn rect_corners(origin: Point, width: f64, height: f64) -> [Point; 4] {
    [
        origin,
        Point::new(origin.x + width, origin.y),
        Point::new(origin.x + width, origin.y + height),
        Point::new(origin.x, origin.y + height),
    ]
}

/// Points along an arc, spaced about one dot apart
fn arc_points(center: Point, radius: f64, start: f64, end: f64, res: Resolution) -> Vec<Point> {
    let sweep = (end - start).abs().min(TAU);
    let dot = res.x.min(res.y).max(f64::EPSILON);
    let segments = ((radius * sweep / dot).ceil() as usize).clamp(8, 720);
    let dir = if end >= start { 1.0 } else { -1.0 };
    (0..=segments)
        .map(|i| {
            let angle = start + dir * sweep * i as f64 / segments as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

fn fill_rows(origin: Point, width: f64, height: f64, res: Resolution) -> Vec<(Point, Point)> {
    let rows = ((height.abs() / res.y.max(f64::EPSILON)).ceil() as usize).max(1);
    (0..=rows)
        .map(|i| {
            let y = origin.y + height * i as f64 / rows as f64;
            (Point::new(origin.x, y), Point::new(origin.x + width, y))
        })
        .collect()
}

/// Lines making up a gradient, each with its interpolation factor
fn gradient_bands(
    origin: Point,
    width: f64,
    height: f64,
    axis: GradientAxis,
    res: Resolution,
) -> Vec<(Point, Point, f64)> {
    match axis {
        GradientAxis::Vertical => fill_rows(origin, width, height, res)
            .into_iter()
            .map(|(a, b)| {
                let t = if height == 0.0 { 0.0 } else { (a.y - origin.y) / height };
                (a, b, t)
            })
            .collect(),
        GradientAxis::Horizontal => {
            let cols = ((width.abs() / res.x.max(f64::EPSILON)).ceil() as usize).max(1);
            (0..=cols)
                .map(|i| {
                    let t = i as f64 / cols as f64;
                    let x = origin.x + width * t;
                    (Point::new(x, origin.y), Point::new(x, origin.y + height), t)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: Resolution = Resolution { x: 1.0, y: 1.0 };

    #[test]
    fn test_arc_points_span_sweep() {
        let pts = arc_points(Point::new(0.0, 0.0), 10.0, 0.0, TAU / 4.0, RES);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!((first.x - 10.0).abs() < 1e-9 && first.y.abs() < 1e-9);
        assert!(last.x.abs() < 1e-9 && (last.y - 10.0).abs() < 1e-9);
        assert!(pts.len() >= 16);
    }

    #[test]
    fn test_fill_rows_cover_rect() {
        let rows = fill_rows(Point::new(2.0, 3.0), 5.0, 4.0, RES);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].0, Point::new(2.0, 3.0));
        assert_eq!(rows[4].1, Point::new(7.0, 7.0));
    }

    #[test]
    fn test_gradient_runs_from_zero_to_one() {
        let bands = gradient_bands(
            Point::new(0.0, 0.0),
            8.0,
            2.0,
            GradientAxis::Horizontal,
            RES,
        );
        assert_eq!(bands.first().map(|b| b.2), Some(0.0));
        assert_eq!(bands.last().map(|b| b.2), Some(1.0));
    }
}
