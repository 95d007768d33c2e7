//! Damped pendulum with a kinetic/potential energy trace

use super::{W_STD, H_STD};
use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::{LabContext, SimulationModel};
use crate::render::{Clock, Point, Rgb, Scene};
use crossterm::event::KeyCode;
use std::collections::VecDeque;
use std::f64::consts::PI;

const G: f64 = 9.81;
/// Pixels per metre of string
const PX_PER_M: f64 = 100.0;
const PIVOT: Point = Point::new(220.0, 30.0);
const BOB_RADIUS: f64 = 12.0;
const HISTORY: usize = 260;
/// Exponential smoothing applied to the plotted energies
const SMOOTHING: f64 = 0.15;

const GRAPH_X: f64 = 460.0;
const GRAPH_BASE: f64 = 250.0;
const GRAPH_HEIGHT: f64 = 200.0;

const KE_COLOR: Rgb = Rgb::hex(0xef4444);
const PE_COLOR: Rgb = Rgb::hex(0x3b82f6);

/// Instantaneous state of the swing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    pub theta: f64,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EnergySample {
    kinetic: f64,
    potential: f64,
}

/// Closed-form damped swing at time `t` seconds after release
pub fn swing(length_px: f64, mass: f64, angle_deg: f64, damping: f64, t: f64) -> Swing {
    let length = length_px / PX_PER_M;
    let omega = (G / length).sqrt();
    let theta0 = angle_deg.to_radians();
    let decay = (-damping * t).exp();
    let theta = theta0 * (omega * t).cos() * decay;

    let potential = mass * G * length * (1.0 - theta.cos());
    let total = mass * G * length * (1.0 - theta0.cos()) * decay * decay;
    Swing {
        theta,
        kinetic: (total - potential).max(0.0),
        potential,
        total,
    }
}

pub struct PendulumLab {
    history: VecDeque<EnergySample>,
    /// Clock time at which the current release started
    epoch: f64,
    seen_revision: Option<u64>,
    seen_frame: Option<u64>,
}

impl PendulumLab {
    pub fn new() -> Self {
        PendulumLab {
            history: VecDeque::with_capacity(HISTORY),
            epoch: 0.0,
            seen_revision: None,
            seen_frame: None,
        }
    }

    fn current(&self, controls: &ParameterStore, clock: &Clock) -> Swing {
        swing(
            controls.value("length"),
            controls.value("mass"),
            controls.value("angle"),
            controls.value("damping"),
            (clock.seconds() - self.epoch).max(0.0),
        )
    }

    /// Any control change releases the bob again from its start angle
    fn sync(&mut self, controls: &ParameterStore, clock: &Clock) {
        if self.seen_revision != Some(controls.revision()) {
            self.seen_revision = Some(controls.revision());
            self.epoch = clock.seconds();
            self.history.clear();
            self.seen_frame = None;
        }
    }

    fn record(&mut self, sample: Swing, clock: &Clock) {
        if self.seen_frame == Some(clock.frames()) {
            return;
        }
        self.seen_frame = Some(clock.frames());

        let next = match self.history.back() {
            Some(last) => EnergySample {
                kinetic: last.kinetic + SMOOTHING * (sample.kinetic - last.kinetic),
                potential: last.potential + SMOOTHING * (sample.potential - last.potential),
            },
            None => EnergySample {
                kinetic: sample.kinetic,
                potential: sample.potential,
            },
        };
        if self.history.len() == HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(next);
    }

    fn history_peak(&self) -> f64 {
        self.history
            .iter()
            .map(|s| s.kinetic + s.potential)
            .fold(0.0, f64::max)
    }

    fn draw_graph(&self, scene: &mut Scene, total: f64) {
        let axis = Rgb(148, 163, 184);
        scene
            .line(
                Point::new(GRAPH_X, GRAPH_BASE - GRAPH_HEIGHT),
                Point::new(GRAPH_X, GRAPH_BASE),
                axis,
            )
            .line(
                Point::new(GRAPH_X, GRAPH_BASE),
                Point::new(GRAPH_X + HISTORY as f64, GRAPH_BASE),
                axis,
            )
            .text(Point::new(GRAPH_X, GRAPH_BASE + 16.0), "time →", axis)
            .text(Point::new(GRAPH_X + 150.0, 40.0), "KE", KE_COLOR)
            .text(Point::new(GRAPH_X + 190.0, 40.0), "PE", PE_COLOR);

        let scale = GRAPH_HEIGHT / total.max(1e-3);
        let trace = |pick: fn(&EnergySample) -> f64| -> Vec<Point> {
            self.history
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let y = (pick(s) * scale).min(GRAPH_HEIGHT);
                    Point::new(GRAPH_X + i as f64, GRAPH_BASE - y)
                })
                .collect()
        };
        if self.history.len() > 1 {
            scene
                .polyline(trace(|s| s.kinetic), KE_COLOR)
                .polyline(trace(|s| s.potential), PE_COLOR);
        }
    }
}

impl Default for PendulumLab {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for PendulumLab {
    fn name(&self) -> &'static str {
        "pendulum"
    }

    fn title(&self) -> &'static str {
        "Damped Pendulum"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::new("length", "Length")
                .range(100.0, 250.0)
                .step(5.0)
                .default(180.0)
                .unit("cm"),
            ControlSpec::new("mass", "Mass")
                .range(1.0, 5.0)
                .step(0.2)
                .default(1.0)
                .unit("kg"),
            ControlSpec::new("angle", "Release angle")
                .range(10.0, 60.0)
                .step(2.0)
                .default(30.0)
                .unit("°"),
            ControlSpec::new("damping", "Damping")
                .range(0.0, 1.0)
                .step(0.02)
                .default(0.0)
                .unit("1/s"),
        ]
    }

    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError> {
        self.sync(controls, clock);
        let now = self.current(controls, clock);
        self.record(now, clock);

        let length = controls.value("length");
        let bob = Point::new(
            PIVOT.x + length * now.theta.sin(),
            PIVOT.y + length * now.theta.cos(),
        );

        let mut scene = Scene::new(W_STD, H_STD);
        scene
            .line(
                Point::new(PIVOT.x - 60.0, PIVOT.y),
                Point::new(PIVOT.x + 60.0, PIVOT.y),
                Rgb(100, 116, 139),
            )
            .arc(
                PIVOT,
                length,
                PI / 2.0 - controls.value("angle").to_radians(),
                PI / 2.0 + controls.value("angle").to_radians(),
                Rgb(51, 65, 85),
            )
            .line(PIVOT, bob, Rgb(226, 232, 240))
            .fill_circle(bob, BOB_RADIUS + controls.value("mass"), Rgb::hex(0xf59e0b))
            .text(
                Point::new(20.0, H_STD - 20.0),
                format!("θ = {:+.1}°", now.theta.to_degrees()),
                Rgb(226, 232, 240),
            );

        self.draw_graph(&mut scene, now.total.max(self.history_peak()));
        Ok(scene)
    }

    fn on_key(&mut self, key: KeyCode, ctx: &mut LabContext<'_>) -> bool {
        match key {
            KeyCode::Char(' ') => {
                ctx.clock.toggle();
                true
            }
            KeyCode::Char('r') => {
                // force a fresh release on the next frame
                self.seen_revision = None;
                ctx.clock.resume();
                true
            }
            _ => false,
        }
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let length = controls.value("length") / PX_PER_M;
        let period = 2.0 * PI * (length / G).sqrt();
        let mut lines = vec![("Period".to_string(), format!("{:.2} s", period))];
        if let Some(last) = self.history.back() {
            lines.push(("Kinetic".to_string(), format!("{:.2} J", last.kinetic)));
            lines.push(("Potential".to_string(), format!("{:.2} J", last.potential)));
        }
        lines
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("r", "release"), ("⎵", "pause")]
    }
}
