//! Inverse-square attraction between two bodies. Static: repaints only when
//! a control changes.

use super::dashed_line;
use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::SimulationModel;
use crate::render::{Clock, Point, RenderMode, Rgb, Scene};

const W: f64 = 800.0;
const H: f64 = 600.0;
/// Gravitational constant in lab units
pub const G: f64 = 60.0;
/// Force that fills the bar
const FORCE_REF: f64 = 1.0;

const BAR: Point = Point::new(720.0, 160.0);
const BAR_W: f64 = 18.0;
const BAR_H: f64 = 260.0;

const RED: Rgb = Rgb::hex(0xff0000);

pub fn force(m1: f64, m2: f64, distance: f64) -> f64 {
    G * m1 * m2 / (distance * distance)
}

pub struct GravityLab;

impl GravityLab {
    pub fn new() -> Self {
        GravityLab
    }
}

impl Default for GravityLab {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for GravityLab {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn title(&self) -> &'static str {
        "Inverse Square Law"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::new("m1", "Mass m₁")
                .range(1.0, 10.0)
                .step(1.0)
                .default(5.0),
            ControlSpec::new("m2", "Mass m₂")
                .range(1.0, 10.0)
                .step(1.0)
                .default(5.0),
            ControlSpec::new("distance", "Distance r")
                .range(20.0, 500.0)
                .step(10.0)
                .default(300.0)
                .unit("px"),
        ]
    }

    fn mode(&self) -> RenderMode {
        RenderMode::OnChange
    }

    fn frame(&mut self, controls: &ParameterStore, _clock: &Clock) -> Result<Scene, ModelError> {
        let m1 = controls.value("m1");
        let m2 = controls.value("m2");
        let distance = controls.value("distance");
        if distance <= 0.0 {
            return Err(ModelError::new("gravity", "separation must be positive"));
        }
        let f = force(m1, m2, distance);

        let body1 = Point::new(W / 2.0 - distance / 2.0, 300.0);
        let body2 = Point::new(W / 2.0 + distance / 2.0, 300.0);

        let mut scene = Scene::new(W, H);
        dashed_line(&mut scene, body1, body2, 6.0, Rgb(77, 77, 77));
        scene
            .fill_circle(body1, 10.0 + m1, Rgb::hex(0x4ade80))
            .fill_circle(body2, 10.0 + m2, Rgb::hex(0x60a5fa))
            .text(Point::new(260.0, 90.0), "F = G · m₁ · m₂ / r²", RED)
            .text(Point::new(300.0, 120.0), format!("Force = {:.4}", f), RED);

        let fill = BAR_H * (f / FORCE_REF).clamp(0.0, 1.0);
        scene
            .rect(BAR, BAR_W, BAR_H, RED)
            .fill_rect(Point::new(BAR.x, BAR.y + BAR_H - fill), BAR_W, fill, RED)
            .text(Point::new(BAR.x - 10.0, BAR.y - 10.0), "FORCE", RED);
        Ok(scene)
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let f = force(
            controls.value("m1"),
            controls.value("m2"),
            controls.value("distance"),
        );
        vec![
            ("Force".to_string(), format!("{:.4}", f)),
            (
                "Field at m₂".to_string(),
                format!("{:.4}", f / controls.value("m2")),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_defaults() {
        assert!((force(5.0, 5.0, 300.0) - 1500.0 / 90_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_doubling_distance_quarters_force() {
        let near = force(3.0, 7.0, 100.0);
        let far = force(3.0, 7.0, 200.0);
        assert!((near / far - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_renders_on_change_only() {
        assert_eq!(GravityLab::new().mode(), RenderMode::OnChange);
    }
}
