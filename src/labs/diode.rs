//! Carrier diffusion across a p-n junction under forward or reverse bias

use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::{LabContext, SimulationModel};
use crate::render::{Clock, Point, Rgb, Scene};
use crossterm::event::KeyCode;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 500.0;
const MID: f64 = WIDTH / 2.0;
const CARRIERS: usize = 40;
const IONS: usize = 50;
const MIN_DEPLETION: f64 = 40.0;
const MAX_DEPLETION: f64 = 220.0;
/// Carrier speed per unit current, px/s
const FORWARD_SPEED: f64 = 72.0;
const REVERSE_SPEED: f64 = 24.0;
/// Depletion edge drift per unit current, px/s
const DEPLETION_RATE: f64 = 4.8;

const ELECTRON: Rgb = Rgb::hex(0x3b82f6);
const HOLE: Rgb = Rgb::hex(0xef4444);
const DONOR: Rgb = Rgb::hex(0x22c55e);
const ACCEPTOR: Rgb = Rgb::hex(0xfacc15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Forward,
    Reverse,
}

impl Bias {
    fn from_control(value: f64) -> Self {
        if value.round() as i64 == 1 {
            Bias::Reverse
        } else {
            Bias::Forward
        }
    }

    fn initial_depletion(self) -> f64 {
        match self {
            Bias::Forward => 120.0,
            Bias::Reverse => MIN_DEPLETION,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Carrier {
    x: f64,
    y: f64,
}

pub struct DiodeLab {
    rng: SmallRng,
    electrons: Vec<Carrier>,
    holes: Vec<Carrier>,
    ions: Vec<(Point, bool)>,
    depletion: f64,
    seen_revision: Option<u64>,
    last_seconds: f64,
}

impl DiodeLab {
    pub fn new() -> Self {
        Self::with_seed(0x5eed)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ions = Vec::with_capacity(IONS * 2);
        for _ in 0..IONS {
            ions.push((
                Point::new(rng.gen_range(0.0..MID - 60.0), rng.gen_range(0.0..HEIGHT)),
                true,
            ));
        }
        for _ in 0..IONS {
            ions.push((
                Point::new(
                    MID + 60.0 + rng.gen_range(0.0..MID - 60.0),
                    rng.gen_range(0.0..HEIGHT),
                ),
                false,
            ));
        }
        DiodeLab {
            rng,
            electrons: Vec::new(),
            holes: Vec::new(),
            ions,
            depletion: Bias::Forward.initial_depletion(),
            seen_revision: None,
            last_seconds: 0.0,
        }
    }

    /// Depletion half-width in px
    pub fn depletion(&self) -> f64 {
        self.depletion
    }

    fn inject(&mut self) {
        let n_side = (MID - self.depletion - 20.0).max(1.0);
        let electrons = (0..CARRIERS)
            .map(|_| Carrier {
                x: self.rng.gen_range(0.0..n_side),
                y: self.rng.gen_range(0.0..HEIGHT),
            })
            .collect();
        let holes = (0..CARRIERS)
            .map(|_| Carrier {
                x: MID + self.depletion + 20.0 + self.rng.gen_range(0.0..n_side),
                y: self.rng.gen_range(0.0..HEIGHT),
            })
            .collect();
        self.electrons = electrons;
        self.holes = holes;
    }

    fn step(&mut self, bias: Bias, current: f64, dt: f64) {
        let drift = DEPLETION_RATE * current * dt;
        self.depletion = match bias {
            Bias::Forward => (self.depletion - drift).max(MIN_DEPLETION),
            Bias::Reverse => (self.depletion + drift).min(MAX_DEPLETION),
        };

        let speed = match bias {
            Bias::Forward => FORWARD_SPEED,
            Bias::Reverse => REVERSE_SPEED,
        } * current
            * dt;
        let n_side = (MID - self.depletion - 20.0).max(1.0);

        for e in self.electrons.iter_mut() {
            e.x += speed;
            // crossed into the p side: re-inject on the n side
            if e.x > MID + self.depletion + 10.0 {
                e.x = self.rng.gen_range(0.0..n_side);
                e.y = self.rng.gen_range(0.0..HEIGHT);
            }
        }
        for h in self.holes.iter_mut() {
            h.x -= speed;
            if h.x < MID - self.depletion - 10.0 {
                h.x = MID + self.depletion + self.rng.gen_range(0.0..n_side);
                h.y = self.rng.gen_range(0.0..HEIGHT);
            }
        }
    }
}

impl Default for DiodeLab {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for DiodeLab {
    fn name(&self) -> &'static str {
        "diode"
    }

    fn title(&self) -> &'static str {
        "P-N Junction Diffusion"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::choice("bias", "Bias", &["forward", "reverse"]),
            ControlSpec::new("current", "Current")
                .range(0.2, 1.0)
                .step(0.01)
                .default(1.0)
                .unit("×"),
        ]
    }

    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError> {
        let bias = Bias::from_control(controls.value("bias"));
        let current = controls.value("current");

        if self.seen_revision != Some(controls.revision()) {
            self.seen_revision = Some(controls.revision());
            self.depletion = bias.initial_depletion();
            self.inject();
        } else {
            let dt = (clock.seconds() - self.last_seconds).max(0.0);
            self.step(bias, current, dt);
        }
        self.last_seconds = clock.seconds();

        let d = self.depletion;
        let mut scene = Scene::new(WIDTH, HEIGHT);
        scene
            .fill_rect(Point::new(0.0, 0.0), MID - d, HEIGHT, ELECTRON.dim(0.12))
            .fill_rect(Point::new(MID + d, 0.0), MID - d, HEIGHT, HOLE.dim(0.12))
            .fill_rect(Point::new(MID - d, 0.0), d * 2.0, HEIGHT, ACCEPTOR.dim(0.2));

        for (at, donor) in &self.ions {
            let (sign, color) = if *donor { ("+", DONOR) } else { ("-", ACCEPTOR) };
            scene.text(*at, sign, color);
        }
        for e in &self.electrons {
            scene.fill_circle(Point::new(e.x, e.y), 4.0, ELECTRON);
        }
        for h in &self.holes {
            scene.fill_circle(Point::new(h.x, h.y), 4.0, HOLE);
        }

        scene
            .text(Point::new(80.0, 30.0), "N-Type", Rgb::WHITE)
            .text(Point::new(WIDTH - 140.0, 30.0), "P-Type", Rgb::WHITE)
            .text(Point::new(MID - 90.0, 60.0), "Depletion Region", ACCEPTOR);
        Ok(scene)
    }

    fn on_key(&mut self, key: KeyCode, ctx: &mut LabContext<'_>) -> bool {
        match key {
            KeyCode::Char('b') => {
                let flipped = 1.0 - ctx.controls.value("bias");
                ctx.controls.set("bias", flipped).is_ok()
            }
            KeyCode::Char(' ') => {
                ctx.clock.toggle();
                true
            }
            _ => false,
        }
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let bias = Bias::from_control(controls.value("bias"));
        let state = match bias {
            Bias::Forward => "conducting",
            Bias::Reverse => "blocking",
        };
        vec![
            ("Junction".to_string(), state.to_string()),
            (
                "Depletion width".to_string(),
                format!("{:.0} px", self.depletion * 2.0),
            ),
        ]
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("b", "flip bias"), ("⎵", "pause")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn run(lab: &mut DiodeLab, controls: &ParameterStore, seconds: u64) {
        let mut clock = Clock::new();
        lab.frame(controls, &clock).unwrap();
        for _ in 0..seconds * 10 {
            clock.advance(Duration::from_millis(100));
            lab.frame(controls, &clock).unwrap();
        }
    }

    #[test]
    fn test_forward_bias_narrows_depletion() {
        let mut lab = DiodeLab::with_seed(1);
        let controls = ParameterStore::new(lab.controls()).unwrap();
        run(&mut lab, &controls, 10);
        assert!((lab.depletion() - 72.0).abs() < 1e-6);
        run(&mut lab, &controls, 60);
        assert_eq!(lab.depletion(), MIN_DEPLETION);
    }

    #[test]
    fn test_reverse_bias_widens_to_limit() {
        let mut lab = DiodeLab::with_seed(2);
        let mut controls = ParameterStore::new(lab.controls()).unwrap();
        controls.set("bias", 1.0).unwrap();
        run(&mut lab, &controls, 60);
        assert_eq!(lab.depletion(), MAX_DEPLETION);
    }

    #[test]
    fn test_carriers_stay_on_canvas() {
        let mut lab = DiodeLab::with_seed(3);
        let controls = ParameterStore::new(lab.controls()).unwrap();
        run(&mut lab, &controls, 5);
        assert_eq!(lab.electrons.len(), CARRIERS);
        for e in &lab.electrons {
            assert!(e.x >= 0.0 && e.x <= MID + lab.depletion() + 10.0);
        }
    }
}
