//! Radiation lab: alpha, beta and gamma rays through gold foil, shielding
//! and a transverse EM field

use super::{dashed_line, W_STD, H_STD};
use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::{LabContext, SimulationModel};
use crate::render::{Clock, GradientAxis, Point, Rgb, Scene};
use crossterm::event::KeyCode;

const SOURCE_X: f64 = 140.0;
const GOLD_X: f64 = 320.0;
const SHIELD_X: f64 = 470.0;
const FIELD_START: f64 = 200.0;
const FIELD_END: f64 = 640.0;
/// Distance a particle marker travels per second of lab time
const MARKER_SPEED: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Particle {
    Alpha,
    Beta,
    Gamma,
}

impl Particle {
    const ALL: [Particle; 3] = [Particle::Alpha, Particle::Beta, Particle::Gamma];

    fn label(self) -> &'static str {
        match self {
            Particle::Alpha => "α",
            Particle::Beta => "β",
            Particle::Gamma => "γ",
        }
    }

    /// Range in air at full energy
    fn base_range(self) -> f64 {
        match self {
            Particle::Alpha => 220.0,
            Particle::Beta => 360.0,
            Particle::Gamma => 720.0,
        }
    }

    /// Signed deflection per unit field: alpha bends up, beta down, gamma not at all
    fn deflect_factor(self) -> f64 {
        match self {
            Particle::Alpha => -0.15,
            Particle::Beta => 0.6,
            Particle::Gamma => 0.0,
        }
    }

    fn color(self) -> Rgb {
        match self {
            Particle::Alpha => Rgb(255, 80, 80),
            Particle::Beta => Rgb(80, 160, 255),
            Particle::Gamma => Rgb(80, 255, 120),
        }
    }

    fn lane(self) -> f64 {
        match self {
            Particle::Alpha => 180.0,
            Particle::Beta => 210.0,
            Particle::Gamma => 240.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Where one ray ends and how it bends
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trajectory {
    end_x: f64,
    deflection: f64,
    stopped_by: Option<&'static str>,
}

pub struct RadiationLab {
    gold: bool,
    shield: bool,
    field: bool,
    laser: bool,
    particles: [bool; 3],
}

impl RadiationLab {
    pub fn new() -> Self {
        RadiationLab {
            gold: true,
            shield: false,
            field: false,
            laser: false,
            particles: [true, false, false],
        }
    }

    fn trajectory(&self, particle: Particle, controls: &ParameterStore) -> Trajectory {
        let energy = controls.value("energy");
        let thickness = controls.value("gold");
        let em = controls.value("em");

        let mut end_x = SOURCE_X + particle.base_range() * energy;
        let mut stopped_by = None;

        if self.gold && end_x > GOLD_X {
            match particle {
                Particle::Alpha => {
                    end_x = GOLD_X;
                    stopped_by = Some("gold foil");
                }
                // thicker foil eats into the remaining beta range
                Particle::Beta => {
                    end_x = GOLD_X + (end_x - GOLD_X) / thickness.powi(2);
                }
                Particle::Gamma => {}
            }
        }
        if self.shield && particle != Particle::Gamma && end_x > SHIELD_X {
            end_x = SHIELD_X;
            stopped_by = Some("shielding");
        }

        let deflection = if self.field {
            particle.deflect_factor() * em * 140.0 / energy.max(0.2)
        } else {
            0.0
        };

        Trajectory {
            end_x,
            deflection,
            stopped_by,
        }
    }

    fn draw_apparatus(&self, scene: &mut Scene, controls: &ParameterStore) {
        scene
            .fill_rect(Point::new(60.0, 160.0), 70.0, 100.0, Rgb(51, 51, 51))
            .text(Point::new(58.0, 150.0), "SOURCE", Rgb(0, 255, 0));

        if self.gold {
            let width = 8.0 * controls.value("gold");
            scene
                .gradient(
                    Point::new(GOLD_X - width / 2.0, 120.0),
                    width,
                    180.0,
                    Rgb(255, 215, 0),
                    Rgb(184, 134, 11),
                    GradientAxis::Vertical,
                )
                .text(Point::new(GOLD_X - 20.0, 110.0), "GOLD", Rgb(255, 215, 0));
        }

        if self.shield {
            scene
                .fill_rect(Point::new(SHIELD_X, 110.0), 20.0, 200.0, Rgb(110, 110, 120))
                .text(Point::new(SHIELD_X - 10.0, 100.0), "LEAD", Rgb(170, 170, 180));
        }

        if self.field {
            let field_color = Rgb(120, 60, 200);
            for row in 0..5 {
                let y = 130.0 + row as f64 * 40.0;
                dashed_line(
                    scene,
                    Point::new(FIELD_START, y),
                    Point::new(FIELD_END, y),
                    8.0,
                    field_color,
                );
            }
            scene.text(
                Point::new(FIELD_START, 330.0),
                format!("E-FIELD {:.2}", controls.value("em")),
                field_color,
            );
        }

        scene.text(Point::new(20.0, 400.0), "AIR", Rgb(120, 120, 120));
    }

    fn draw_ray(&self, scene: &mut Scene, particle: Particle, path: &Trajectory, t: f64) {
        let color = particle.color();
        let y0 = particle.lane();
        let length = path.end_x - SOURCE_X;
        if length < 5.0 {
            return;
        }

        let point_at = |p: f64| {
            Point::new(
                SOURCE_X + length * p,
                y0 + path.deflection * p * p,
            )
        };
        let points: Vec<Point> = (0..=40).map(|i| point_at(i as f64 / 40.0)).collect();

        if self.laser {
            // faint glow either side of a thin core
            for offset in [-2.0, 2.0] {
                let glow = points
                    .iter()
                    .map(|p| Point::new(p.x, p.y + offset))
                    .collect();
                scene.polyline(glow, color.dim(0.3));
            }
            scene.polyline(points, color);
        } else {
            scene.polyline(points, color.dim(0.6));
            let progress = (t * MARKER_SPEED % length) / length;
            scene.fill_circle(point_at(progress), 5.0, color);
        }

        let end = point_at(1.0);
        scene.text(Point::new(end.x + 6.0, end.y), particle.label(), color);
    }
}

impl Default for RadiationLab {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for RadiationLab {
    fn name(&self) -> &'static str {
        "radiation"
    }

    fn title(&self) -> &'static str {
        "☢ Radiation Lab"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        let mut em = ControlSpec::new("em", "EM field")
            .range(4.0, 8.0)
            .step(0.05)
            .default(4.0)
            .unit("kV/m");
        if !self.field {
            em = em.disabled();
        }
        let mut gold = ControlSpec::new("gold", "Gold thickness")
            .range(1.0, 1.5)
            .step(0.05)
            .default(1.0)
            .unit("µm");
        if !self.gold {
            gold = gold.disabled();
        }
        vec![
            ControlSpec::new("energy", "Energy")
                .range(0.2, 1.0)
                .step(0.02)
                .default(1.0)
                .unit("MeV"),
            gold,
            em,
        ]
    }

    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError> {
        let mut scene = Scene::new(W_STD, H_STD);
        self.draw_apparatus(&mut scene, controls);

        let t = clock.seconds();
        for particle in Particle::ALL {
            if !self.particles[particle.index()] {
                continue;
            }
            let path = self.trajectory(particle, controls);
            self.draw_ray(&mut scene, particle, &path, t);
        }
        Ok(scene)
    }

    fn on_key(&mut self, key: KeyCode, ctx: &mut LabContext<'_>) -> bool {
        match key {
            KeyCode::Char('g') => {
                self.gold = !self.gold;
                ctx.controls.set_enabled("gold", self.gold).is_ok()
            }
            KeyCode::Char('s') => {
                self.shield = !self.shield;
                true
            }
            KeyCode::Char('f') => {
                self.field = !self.field;
                ctx.controls.set_enabled("em", self.field).is_ok()
            }
            KeyCode::Char('l') => {
                self.laser = !self.laser;
                true
            }
            KeyCode::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                self.particles[idx] = !self.particles[idx];
                true
            }
            KeyCode::Char(' ') => {
                ctx.clock.toggle();
                true
            }
            _ => false,
        }
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let mut lines = vec![(
            "Experiments".to_string(),
            [
                (self.gold, "gold"),
                (self.shield, "shield"),
                (self.field, "field"),
            ]
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(", "),
        )];

        for particle in Particle::ALL {
            if !self.particles[particle.index()] {
                continue;
            }
            let path = self.trajectory(particle, controls);
            let status = match path.stopped_by {
                Some(barrier) => format!("stopped by {}", barrier),
                None => format!("range {:.0}", path.end_x - SOURCE_X),
            };
            lines.push((format!("{} ray", particle.label()), status));
            if self.field {
                lines.push((
                    format!("{} deflection", particle.label()),
                    format!("{:+.1}", path.deflection),
                ));
            }
        }
        lines
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("1-3", "α β γ"),
            ("g/s/f", "gold shield field"),
            ("l", "laser"),
            ("⎵", "pause"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lab: &RadiationLab) -> ParameterStore {
        ParameterStore::new(lab.controls()).unwrap()
    }

    #[test]
    fn test_gold_foil_stops_alpha() {
        let lab = RadiationLab::new();
        let controls = store(&lab);
        let path = lab.trajectory(Particle::Alpha, &controls);
        assert_eq!(path.end_x, GOLD_X);
        assert_eq!(path.stopped_by, Some("gold foil"));
    }

    #[test]
    fn test_gamma_passes_shield() {
        let mut lab = RadiationLab::new();
        lab.shield = true;
        let controls = store(&lab);
        let gamma = lab.trajectory(Particle::Gamma, &controls);
        assert_eq!(gamma.stopped_by, None);
        assert_eq!(gamma.end_x, SOURCE_X + 720.0);
        let beta = lab.trajectory(Particle::Beta, &controls);
        assert_eq!(beta.end_x, SHIELD_X);
    }

    #[test]
    fn test_field_deflects_beta_more_at_low_energy() {
        let mut lab = RadiationLab::new();
        lab.field = true;
        let mut controls = store(&lab);
        let fast = lab.trajectory(Particle::Beta, &controls).deflection;
        controls.set("energy", 0.4).unwrap();
        let slow = lab.trajectory(Particle::Beta, &controls).deflection;
        assert!(slow > fast);
        assert!(lab.trajectory(Particle::Alpha, &controls).deflection < 0.0);
        assert_eq!(lab.trajectory(Particle::Gamma, &controls).deflection, 0.0);
    }

    #[test]
    fn test_field_toggle_enables_em_control() {
        let mut lab = RadiationLab::new();
        let mut controls = store(&lab);
        let mut clock = Clock::new();
        assert!(!controls.control("em").unwrap().is_enabled());

        let mut ctx = LabContext {
            controls: &mut controls,
            clock: &mut clock,
        };
        assert!(lab.on_key(KeyCode::Char('f'), &mut ctx));
        assert!(controls.control("em").unwrap().is_enabled());
    }
}
