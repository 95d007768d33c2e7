//! CHSH Bell test: entangled photon pairs measured at two analyzer settings
//! per side, with running correlation estimates

use crate::controls::{ControlSpec, ParameterStore};
use crate::errors::ModelError;
use crate::lab::{LabContext, SimulationModel};
use crate::render::{Clock, Point, Rgb, Scene};
use crossterm::event::KeyCode;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const W: f64 = 1200.0;
const H: f64 = 600.0;
/// Trials per second of lab time
const TRIAL_RATE: u64 = 25;
/// Classical (local hidden variable) bound on S
pub const CLASSICAL_BOUND: f64 = 2.0;
const ANALYZER_RADIUS: f64 = 35.0;
const SOURCE: Point = Point::new(W / 2.0, H / 2.0 - 100.0);

const ACTIVE_ANALYZER: Rgb = Rgb::hex(0x22c55e);

/// The four analyzer pairings, in the order they enter S
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    AB,
    ABp,
    ApB,
    ApBp,
}

impl Setting {
    const ALL: [Setting; 4] = [Setting::AB, Setting::ABp, Setting::ApB, Setting::ApBp];

    fn angle_ids(self) -> (&'static str, &'static str) {
        match self {
            Setting::AB => ("a", "b"),
            Setting::ABp => ("a", "b_prime"),
            Setting::ApB => ("a_prime", "b"),
            Setting::ApBp => ("a_prime", "b_prime"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Setting::AB => "E(A,B)",
            Setting::ABp => "E(A,B′)",
            Setting::ApB => "E(A′,B)",
            Setting::ApBp => "E(A′,B′)",
        }
    }

    /// Sign of this term in S
    fn sign(self) -> f64 {
        match self {
            Setting::ABp => -1.0,
            _ => 1.0,
        }
    }
}

/// Running sums of outcome products for each setting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    sums: [i64; 4],
    counts: [u64; 4],
}

impl Tally {
    fn record(&mut self, setting: Setting, product: i64) {
        self.sums[setting as usize] += product;
        self.counts[setting as usize] += 1;
    }

    pub fn trials(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Mean outcome product, zero before any trial
    pub fn correlation(&self, setting: Setting) -> f64 {
        let idx = setting as usize;
        if self.counts[idx] == 0 {
            return 0.0;
        }
        self.sums[idx] as f64 / self.counts[idx] as f64
    }

    /// |E(A,B) − E(A,B′) + E(A′,B) + E(A′,B′)|
    pub fn s_value(&self) -> f64 {
        Setting::ALL
            .iter()
            .map(|&s| s.sign() * self.correlation(s))
            .sum::<f64>()
            .abs()
    }
}

/// Quantum prediction for the correlation at analyzer angles in degrees
pub fn predicted_correlation(a: f64, b: f64) -> f64 {
    (2.0 * (a - b).to_radians()).cos()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flash {
    setting: Setting,
    a: i64,
    b: i64,
}

pub struct ChshLab {
    rng: SmallRng,
    tally: Tally,
    trials_running: bool,
    /// Lab time spent with trials running since the last reset
    running_for: Duration,
    /// Trials run since the last reset
    scheduled: u64,
    last_elapsed: Duration,
    flash: Option<Flash>,
    /// Angle control a/d currently moves
    active: Option<String>,
}

impl ChshLab {
    pub fn new() -> Self {
        Self::with_seed(0xbe11)
    }

    pub fn with_seed(seed: u64) -> Self {
        ChshLab {
            rng: SmallRng::seed_from_u64(seed),
            tally: Tally::default(),
            trials_running: true,
            running_for: Duration::ZERO,
            scheduled: 0,
            last_elapsed: Duration::ZERO,
            flash: None,
            active: None,
        }
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    fn run_trial(&mut self, controls: &ParameterStore) {
        let setting = Setting::ALL[self.rng.gen_range(0..4)];
        let (a_id, b_id) = setting.angle_ids();
        let theta = (controls.value(a_id) - controls.value(b_id)).to_radians();
        let same = theta.cos().powi(2);

        let a = if self.rng.gen_bool(0.5) { 1 } else { -1 };
        let b = if self.rng.gen::<f64>() < same { a } else { -a };
        self.tally.record(setting, a * b);
        self.flash = Some(Flash { setting, a, b });
    }

    fn reset(&mut self) {
        self.tally = Tally::default();
        self.running_for = Duration::ZERO;
        self.scheduled = 0;
        self.flash = None;
        self.trials_running = true;
    }

    fn draw_analyzer(
        &self,
        scene: &mut Scene,
        at: Point,
        angle: f64,
        label: &str,
        active: bool,
        outcome: Option<i64>,
    ) {
        let rad = angle.to_radians();
        let (dx, dy) = (ANALYZER_RADIUS * rad.cos(), ANALYZER_RADIUS * rad.sin());
        let color = match (active, outcome) {
            (true, _) => ACTIVE_ANALYZER,
            (false, Some(_)) => Rgb::hex(0xfacc15),
            (false, None) => Rgb::WHITE,
        };
        scene
            .circle(at, ANALYZER_RADIUS, color)
            .line(
                Point::new(at.x - dx, at.y + dy),
                Point::new(at.x + dx, at.y - dy),
                color,
            )
            .text(
                Point::new(at.x - 32.0, at.y + 55.0),
                format!("{} = {}°", label, angle),
                color,
            );

        if let Some(value) = outcome {
            let d = if value == 1 { -50.0 } else { 50.0 };
            let dot = if value == 1 {
                Rgb::hex(0x55ff55)
            } else {
                Rgb::hex(0xff5555)
            };
            scene.fill_circle(
                Point::new(at.x + d * rad.cos(), at.y - d * rad.sin()),
                7.0,
                dot,
            );
        }
    }

    fn draw_connections(&self, scene: &mut Scene, targets: &[Point; 4], phase: f64) {
        let strength = (self.tally.s_value() / 2.5).min(1.0);
        let hue = 200.0 - 200.0 * strength;
        for (i, target) in targets.iter().enumerate() {
            let wobble = (phase + i as f64).sin() * 80.0;
            let mid_x = (SOURCE.x + target.x) / 2.0;
            let curve = cubic_bezier(
                SOURCE,
                Point::new(mid_x, SOURCE.y + wobble),
                Point::new(mid_x, target.y - wobble),
                *target,
                32,
            );
            scene.polyline(curve, hsl(hue + i as f64 * 30.0, 1.0, 0.6));
        }
    }
}

impl Default for ChshLab {
    fn default() -> Self {
        Self::new()
    }
}

fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, segments: usize) -> Vec<Point> {
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            Point::new(
                a * p0.x + b * p1.x + c * p2.x + d * p3.x,
                a * p0.y + b * p1.y + c * p2.y + d * p3.y,
            )
        })
        .collect()
}

fn hsl(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(channel(r), channel(g), channel(b))
}

impl SimulationModel for ChshLab {
    fn name(&self) -> &'static str {
        "chsh"
    }

    fn title(&self) -> &'static str {
        "CHSH Inequality"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        let angle = |id: &str, label: &str, default: f64| {
            ControlSpec::new(id, label)
                .range(0.0, 180.0)
                .step(0.5)
                .default(default)
                .unit("°")
        };
        vec![
            angle("a", "A", 0.0),
            angle("a_prime", "A′", 45.0),
            angle("b", "B", 22.5),
            angle("b_prime", "B′", 67.5),
        ]
    }

    fn frame(&mut self, controls: &ParameterStore, clock: &Clock) -> Result<Scene, ModelError> {
        let dt = clock.elapsed().saturating_sub(self.last_elapsed);
        self.last_elapsed = clock.elapsed();
        if self.trials_running {
            self.running_for += dt;
            let due = (self.running_for.as_nanos() * TRIAL_RATE as u128 / 1_000_000_000) as u64;
            while self.scheduled < due {
                self.scheduled += 1;
                self.run_trial(controls);
            }
        }

        let mut scene = Scene::new(W, H).with_background(Rgb::BLACK);
        scene
            .fill_circle(SOURCE, 22.0, Rgb::hex(0x00ffff).dim(0.35))
            .fill_circle(SOURCE, 15.0, Rgb::hex(0x00ffff))
            .text(
                Point::new(SOURCE.x - 70.0, SOURCE.y + 35.0),
                "Entangled Pair Source",
                Rgb::hex(0x00ffff),
            );

        let targets = [
            Point::new(400.0, H / 2.0),
            Point::new(400.0, H / 2.0 + 200.0),
            Point::new(1000.0, H / 2.0),
            Point::new(1000.0, H / 2.0 + 200.0),
        ];
        let flash = self.flash;
        let outcome_a = |primed: bool| {
            flash
                .filter(|f| matches!(f.setting, Setting::ApB | Setting::ApBp) == primed)
                .map(|f| f.a)
        };
        let outcome_b = |primed: bool| {
            flash
                .filter(|f| matches!(f.setting, Setting::ABp | Setting::ApBp) == primed)
                .map(|f| f.b)
        };

        for (i, (id, label)) in [("a", "A"), ("a_prime", "A′"), ("b", "B"), ("b_prime", "B′")]
            .iter()
            .enumerate()
        {
            let primed = i % 2 == 1;
            let outcome = if i < 2 {
                outcome_a(primed)
            } else {
                outcome_b(primed)
            };
            let active = self.active.as_deref() == Some(*id);
            self.draw_analyzer(&mut scene, targets[i], controls.value(id), label, active, outcome);
        }

        if !self.trials_running {
            self.draw_connections(&mut scene, &targets, clock.seconds() * 1.2);
        }

        let s = self.tally.s_value();
        let color = if s > CLASSICAL_BOUND {
            Rgb::hex(0xff4444)
        } else {
            Rgb::hex(0x44ff88)
        };
        scene.text(
            Point::new(40.0, 40.0),
            format!("S = {:.3}   trials {}", s, self.tally.trials()),
            color,
        );
        Ok(scene)
    }

    fn on_key(&mut self, key: KeyCode, _ctx: &mut LabContext<'_>) -> bool {
        match key {
            KeyCode::Char(' ') => {
                self.trials_running = !self.trials_running;
                true
            }
            KeyCode::Char('r') => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    fn on_select(&mut self, active: Option<&str>) {
        self.active = active.map(str::to_string);
    }

    fn is_running(&self, clock: &Clock) -> bool {
        self.trials_running && clock.is_running()
    }

    fn readout(&self, controls: &ParameterStore) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Trials".to_string(), self.tally.trials().to_string()),
            ("S".to_string(), format!("{:.3}", self.tally.s_value())),
        ];
        let mut predicted = 0.0;
        for setting in Setting::ALL {
            let (a_id, b_id) = setting.angle_ids();
            predicted +=
                setting.sign() * predicted_correlation(controls.value(a_id), controls.value(b_id));
            lines.push((
                setting.label().to_string(),
                format!("{:+.3}", self.tally.correlation(setting)),
            ));
        }
        lines.push(("S (quantum)".to_string(), format!("{:.3}", predicted.abs())));
        let verdict = if self.tally.s_value() > CLASSICAL_BOUND {
            "violates the local bound"
        } else {
            "within the local bound"
        };
        lines.push(("Verdict".to_string(), verdict.to_string()));
        lines
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        vec![("r", "reset trials"), ("⎵", "stop trials")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Shape;

    #[test]
    fn test_defaults_keep_half_degrees() {
        let lab = ChshLab::new();
        let controls = ParameterStore::new(lab.controls()).unwrap();
        assert_eq!(controls.get("b").unwrap(), 22.5);
        assert_eq!(controls.get("b_prime").unwrap(), 67.5);
    }

    #[test]
    fn test_predicted_s_at_optimal_angles() {
        let s = predicted_correlation(0.0, 22.5) - predicted_correlation(0.0, 67.5)
            + predicted_correlation(45.0, 22.5)
            + predicted_correlation(45.0, 67.5);
        assert!((s - 2.0 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_trial_rate_follows_clock() {
        let mut lab = ChshLab::with_seed(7);
        let controls = ParameterStore::new(lab.controls()).unwrap();
        let mut clock = Clock::new();
        for _ in 0..40 {
            clock.advance(Duration::from_millis(100));
            lab.frame(&controls, &clock).unwrap();
        }
        assert_eq!(lab.tally().trials(), 100);
    }

    #[test]
    fn test_many_trials_violate_bound() {
        let mut lab = ChshLab::with_seed(11);
        let controls = ParameterStore::new(lab.controls()).unwrap();
        for _ in 0..20_000 {
            lab.run_trial(&controls);
        }
        let s = lab.tally().s_value();
        assert!(s > 2.6 && s < 3.05, "S = {}", s);
    }

    #[test]
    fn test_stop_and_reset() {
        let mut lab = ChshLab::with_seed(3);
        let mut controls = ParameterStore::new(lab.controls()).unwrap();
        let mut clock = Clock::new();
        clock.advance(Duration::from_secs(1));
        lab.frame(&controls, &clock).unwrap();
        assert_eq!(lab.tally().trials(), 25);

        let mut ctx = LabContext {
            controls: &mut controls,
            clock: &mut clock,
        };
        lab.on_key(KeyCode::Char(' '), &mut ctx);
        clock.advance(Duration::from_secs(1));
        lab.frame(&controls, &clock).unwrap();
        assert_eq!(lab.tally().trials(), 25);

        let mut ctx = LabContext {
            controls: &mut controls,
            clock: &mut clock,
        };
        lab.on_key(KeyCode::Char('r'), &mut ctx);
        assert_eq!(lab.tally().trials(), 0);
    }

    fn analyzer_label_color(scene: &Scene, label: &str) -> Option<Rgb> {
        scene.shapes().iter().find_map(|shape| match shape {
            Shape::Text { text, color, .. } if text.starts_with(label) => Some(*color),
            _ => None,
        })
    }

    #[test]
    fn test_active_analyzer_is_highlighted() {
        let mut lab = ChshLab::with_seed(5);
        let controls = ParameterStore::new(lab.controls()).unwrap();
        let clock = Clock::new();

        lab.on_select(Some("b"));
        let scene = lab.frame(&controls, &clock).unwrap();
        assert_eq!(analyzer_label_color(&scene, "B = "), Some(ACTIVE_ANALYZER));
        assert_ne!(analyzer_label_color(&scene, "A = "), Some(ACTIVE_ANALYZER));

        lab.on_select(Some("a_prime"));
        let scene = lab.frame(&controls, &clock).unwrap();
        assert_eq!(analyzer_label_color(&scene, "A′ = "), Some(ACTIVE_ANALYZER));
        assert_ne!(analyzer_label_color(&scene, "B = "), Some(ACTIVE_ANALYZER));
    }

    #[test]
    fn test_stopped_trials_report_not_running() {
        let mut lab = ChshLab::with_seed(5);
        let mut controls = ParameterStore::new(lab.controls()).unwrap();
        let mut clock = Clock::new();
        assert!(lab.is_running(&clock));

        let mut ctx = LabContext {
            controls: &mut controls,
            clock: &mut clock,
        };
        lab.on_key(KeyCode::Char(' '), &mut ctx);
        assert!(clock.is_running());
        assert!(!lab.is_running(&clock));
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(hsl(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(hsl(240.0, 1.0, 0.5), Rgb(0, 0, 255));
    }
}
