//! Faraday induction: a bar magnet pushed through a coil drives a galvanometer

use super::{W_STD, H_STD};
use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::SimulationModel;
use crate::render::{Clock, Point, Rgb, Scene};
use std::f64::consts::PI;

const COIL: Point = Point::new(W_STD / 2.0, 200.0);
const COIL_TURNS: usize = 8;
const COIL_PITCH: f64 = 14.0;
const COIL_RADIUS: f64 = 55.0;
/// Magnet travel at full deflection, px either side of the coil
const TRAVEL: f64 = 300.0;
const MAGNET_W: f64 = 140.0;
const MAGNET_H: f64 = 40.0;
/// Distance over which the linked flux falls to half
const FLUX_FALLOFF: f64 = 90.0;
/// EMF per unit flux change per second
const EMF_GAIN: f64 = 0.4;
const NEEDLE_LIMIT: f64 = 60.0;
const REST_BAND: f64 = 0.05;

const NORTH: Rgb = Rgb::hex(0xef4444);
const SOUTH: Rgb = Rgb::hex(0x3b82f6);
const COPPER: Rgb = Rgb::hex(0xd97706);

/// Flux linked by the coil with the magnet centre `offset` px from the coil centre
pub fn linked_flux(offset: f64) -> f64 {
    1.0 / (1.0 + (offset / FLUX_FALLOFF).powi(2))
}

/// Where the magnet is headed, as a human label
pub fn motion_label(control: f64) -> &'static str {
    if control < -REST_BAND {
        "A (Left)"
    } else if control > REST_BAND {
        "D (Right)"
    } else {
        "Rest"
    }
}

pub struct FaradayLab {
    last_offset: Option<f64>,
    last_seconds: f64,
    emf: f64,
}

impl FaradayLab {
    pub fn new() -> Self {
        FaradayLab {
            last_offset: None,
            last_seconds: 0.0,
            emf: 0.0,
        }
    }

    pub fn emf(&self) -> f64 {
        self.emf
    }

    fn update(&mut self, offset: f64, clock: &Clock) {
        let dt = clock.seconds() - self.last_seconds;
        if let Some(previous) = self.last_offset {
            if dt > 0.0 {
                // Lenz: the induced EMF opposes the change in flux
                self.emf = -EMF_GAIN * (linked_flux(offset) - linked_flux(previous)) / dt;
            }
        }
        self.last_offset = Some(offset);
        self.last_seconds = clock.seconds();
    }

    fn draw_magnet(&self, scene: &mut Scene, center_x: f64) {
        let top = COIL.y - MAGNET_H / 2.0;
        let left = center_x - MAGNET_W / 2.0;
        scene
            .fill_rect(Point::new(left, top), MAGNET_W / 2.0, MAGNET_H, NORTH)
            .fill_rect(Point::new(center_x, top), MAGNET_W / 2.0, MAGNET_H, SOUTH)
            .text(Point::new(left + 12.0, COIL.y + 4.0), "N", Rgb::WHITE)
            .text(Point::new(center_x + MAGNET_W / 2.0 - 20.0, COIL.y + 4.0), "S", Rgb::WHITE);

        // field loops leave N and wrap round to S
        for i in 1..=3 {
            let radius = MAGNET_H / 2.0 + i as f64 * 18.0;
            let half = MAGNET_W / 2.0;
            let color = Rgb(148, 163, 184).dim(1.0 - i as f64 * 0.2);
            scene
                .arc(Point::new(left, COIL.y), radius, PI / 2.0, 3.0 * PI / 2.0, color)
                .arc(
                    Point::new(center_x + half, COIL.y),
                    radius,
                    -PI / 2.0,
                    PI / 2.0,
                    color,
                )
                .line(
                    Point::new(left, COIL.y - radius),
                    Point::new(center_x + half, COIL.y - radius),
                    color,
                )
                .line(
                    Point::new(left, COIL.y + radius),
                    Point::new(center_x + half, COIL.y + radius),
                    color,
                );
        }
    }

    fn draw_coil(scene: &mut Scene) {
        let start = COIL.x - COIL_PITCH * (COIL_TURNS as f64 - 1.0) / 2.0;
        for turn in 0..COIL_TURNS {
            let x = start + turn as f64 * COIL_PITCH;
            scene.line(
                Point::new(x - COIL_PITCH / 2.0, COIL.y - COIL_RADIUS),
                Point::new(x + COIL_PITCH / 2.0, COIL.y + COIL_RADIUS),
                COPPER,
            );
        }
        let end = start + COIL_PITCH * (COIL_TURNS as f64 - 1.0);
        scene
            .line(
                Point::new(start, COIL.y + COIL_RADIUS),
                Point::new(start, 330.0),
                COPPER,
            )
            .line(Point::new(end, COIL.y + COIL_RADIUS), Point::new(end, 330.0), COPPER)
            .line(Point::new(start, 330.0), Point::new(COIL.x - 40.0, 330.0), COPPER)
            .line(Point::new(end, 330.0), Point::new(COIL.x + 40.0, 330.0), COPPER);
    }

    fn draw_galvanometer(&self, scene: &mut Scene) {
        let center = Point::new(COIL.x, 360.0);
        let deflection = (self.emf.clamp(-1.0, 1.0) * NEEDLE_LIMIT).to_radians();
        // needle hangs upward from the dial centre
        let tip = Point::new(
            center.x + 34.0 * deflection.sin(),
            center.y - 34.0 * deflection.cos(),
        );
        scene
            .arc(center, 40.0, -5.0 * PI / 6.0, -PI / 6.0, Rgb(226, 232, 240))
            .line(center, tip, Rgb::hex(0xfacc15))
            .fill_circle(center, 3.0, Rgb(226, 232, 240))
            .text(Point::new(center.x - 8.0, center.y + 20.0), "G", Rgb(226, 232, 240));
    }
}

impl Default for FaradayLab {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for FaradayLab {
    fn name(&self) -> &'static str {
        "faraday"
    }

    fn title(&self) -> &'static str {
        "Faraday's Law of Induction"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![ControlSpec::new("magnet", "Magnet motion")
            .range(-1.0, 1.0)
            .step(0.04)
            .default(0.0)
            .momentary(0.0, 0.04)]
    }

    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError> {
        let control = controls.value("magnet");
        let offset = control * TRAVEL;
        self.update(offset, clock);

        let mut scene = Scene::new(W_STD, H_STD);
        Self::draw_coil(&mut scene);
        self.draw_magnet(&mut scene, COIL.x + offset);
        self.draw_galvanometer(&mut scene);
        scene.text(
            Point::new(20.0, 30.0),
            format!("MAGNET MOTION  {}", motion_label(control)),
            Rgb(226, 232, 240),
        );
        Ok(scene)
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let control = controls.value("magnet");
        vec![
            ("Motion".to_string(), motion_label(control).to_string()),
            (
                "Linked flux".to_string(),
                format!("{:.3}", linked_flux(control * TRAVEL)),
            ),
            ("EMF".to_string(), format!("{:+.3} V", self.emf)),
        ]
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("hold a/d", "push magnet")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_motion_label() {
        assert_eq!(motion_label(-0.4), "A (Left)");
        assert_eq!(motion_label(0.04), "Rest");
        assert_eq!(motion_label(0.0), "Rest");
        assert_eq!(motion_label(0.08), "D (Right)");
    }

    #[test]
    fn test_flux_peaks_inside_coil() {
        assert_eq!(linked_flux(0.0), 1.0);
        assert_eq!(linked_flux(FLUX_FALLOFF), 0.5);
        assert!(linked_flux(-200.0) < linked_flux(-100.0));
    }

    #[test]
    fn test_emf_opposes_entry_and_exit() {
        let mut lab = FaradayLab::new();
        let mut controls = ParameterStore::new(lab.controls()).unwrap();
        let mut clock = Clock::new();

        controls.set("magnet", -0.6).unwrap();
        lab.frame(&controls, &clock).unwrap();
        assert_eq!(lab.emf(), 0.0);

        // moving towards the coil raises the flux
        clock.advance(Duration::from_millis(100));
        controls.set("magnet", -0.2).unwrap();
        lab.frame(&controls, &clock).unwrap();
        assert!(lab.emf() < 0.0);

        // moving away lowers it
        clock.advance(Duration::from_millis(100));
        controls.set("magnet", -0.6).unwrap();
        lab.frame(&controls, &clock).unwrap();
        assert!(lab.emf() > 0.0);
    }

    #[test]
    fn test_paused_clock_keeps_last_emf() {
        let mut lab = FaradayLab::new();
        let mut controls = ParameterStore::new(lab.controls()).unwrap();
        let mut clock = Clock::new();
        lab.frame(&controls, &clock).unwrap();
        clock.advance(Duration::from_millis(100));
        controls.set("magnet", 0.4).unwrap();
        lab.frame(&controls, &clock).unwrap();
        let emf = lab.emf();
        lab.frame(&controls, &clock).unwrap();
        assert_eq!(lab.emf(), emf);
    }
}
