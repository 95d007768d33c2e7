//! Two travelling waves and their sum

use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::{LabContext, SimulationModel};
use crate::render::{Clock, Point, Rgb, Scene};
use crossterm::event::KeyCode;
use std::f64::consts::{PI, TAU};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 300.0;
/// Phase advance per second of lab time
const DRIFT: f64 = 3.0;
const PHASE_TOLERANCE: f64 = 0.3;
const AMPLITUDE_TOLERANCE: f64 = 5.0;

const WAVE1: Rgb = Rgb::hex(0x1e90ff);
const WAVE2: Rgb = Rgb::hex(0xff8c00);
const RESULTANT: Rgb = Rgb::hex(0xc4002f);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interference {
    Destructive,
    Constructive,
    Superposition,
}

impl Interference {
    pub fn classify(amp1: f64, amp2: f64, phase: f64) -> Self {
        let phi = phase.rem_euclid(TAU);
        let equal_amps = (amp1 - amp2).abs() < AMPLITUDE_TOLERANCE;
        if (phi - PI).abs() < PHASE_TOLERANCE && equal_amps {
            Interference::Destructive
        } else if phi < PHASE_TOLERANCE || (phi - TAU).abs() < PHASE_TOLERANCE {
            Interference::Constructive
        } else {
            Interference::Superposition
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interference::Destructive => "Destructive Interference",
            Interference::Constructive => "Constructive Interference (Superposition)",
            Interference::Superposition => "Wave Superposition",
        }
    }

    fn color(self) -> Rgb {
        match self {
            Interference::Destructive => Rgb::hex(0xc4002f),
            Interference::Constructive => Rgb::hex(0x1e8f3f),
            Interference::Superposition => Rgb::hex(0x1e90ff),
        }
    }
}

pub struct WaveLab;

impl WaveLab {
    pub fn new() -> Self {
        WaveLab
    }
}

impl Default for WaveLab {
    fn default() -> Self {
        Self::new()
    }
}

fn trace(f: impl Fn(f64) -> f64) -> Vec<Point> {
    let mid = HEIGHT / 2.0;
    (0..WIDTH as usize)
        .step_by(2)
        .map(|x| {
            let x = x as f64;
            Point::new(x, mid + f(x))
        })
        .collect()
}

impl SimulationModel for WaveLab {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn title(&self) -> &'static str {
        "Wave Superposition & Destructive Interference"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::new("amp1", "Amplitude 1")
                .range(0.0, 80.0)
                .step(2.0)
                .default(50.0),
            ControlSpec::new("amp2", "Amplitude 2")
                .range(0.0, 80.0)
                .step(2.0)
                .default(50.0),
            ControlSpec::new("phase", "Phase difference ϕ")
                .range(0.0, 6.2)
                .step(0.1)
                .default(PI)
                .unit("rad"),
            ControlSpec::new("freq", "Frequency")
                .range(0.005, 0.05)
                .step(0.005)
                .default(0.02),
        ]
    }

    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError> {
        let amp1 = controls.value("amp1");
        let amp2 = controls.value("amp2");
        let phase = controls.value("phase");
        let freq = controls.value("freq");
        let t = clock.seconds() * DRIFT;

        let first = move |x: f64| amp1 * (freq * x + t).sin();
        let second = move |x: f64| amp2 * (freq * x + t + phase).sin();

        let kind = Interference::classify(amp1, amp2, phase);
        let mut scene = Scene::new(WIDTH, HEIGHT).with_background(Rgb::hex(0x0b1120));
        scene
            .line(
                Point::new(0.0, HEIGHT / 2.0),
                Point::new(WIDTH, HEIGHT / 2.0),
                Rgb(30, 41, 59),
            )
            .polyline(trace(first), WAVE1)
            .polyline(trace(second), WAVE2)
            .polyline(trace(|x| first(x) + second(x)), RESULTANT)
            .text(Point::new(12.0, 18.0), kind.label(), kind.color());
        Ok(scene)
    }

    fn on_key(&mut self, key: KeyCode, ctx: &mut LabContext<'_>) -> bool {
        if key == KeyCode::Char(' ') {
            ctx.clock.toggle();
            return true;
        }
        false
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let kind = Interference::classify(
            controls.value("amp1"),
            controls.value("amp2"),
            controls.value("phase"),
        );
        // peak of the sum of two equal-frequency sinusoids
        let (a, b, phi) = (
            controls.value("amp1"),
            controls.value("amp2"),
            controls.value("phase"),
        );
        let peak = (a * a + b * b + 2.0 * a * b * phi.cos()).max(0.0).sqrt();
        vec![
            ("Pattern".to_string(), kind.label().to_string()),
            ("Resultant amplitude".to_string(), format!("{:.1}", peak)),
            (
                "Wavelength".to_string(),
                format!("{:.0} px", TAU / controls.value("freq")),
            ),
        ]
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("⎵", "pause")]
    }
}
