//! Control declarations and the bounded numeric value behind each slider

use crate::errors::LabError;

/// Which way an adjustment moves a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Decrease,
    Increase,
}

impl Direction {
    /// -1.0 or +1.0
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Decrease => -1.0,
            Direction::Increase => 1.0,
        }
    }
}

/// Momentary behaviour: the value follows a held key and springs back to
/// `rest` once nothing is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldBehavior {
    pub rest: f64,
    pub return_step: f64,
}

/// Declaration of one control, as written by a lab
///
/// Built with the same chained style as the rest of the lab wiring:
///
/// ```
/// use labbench::controls::ControlSpec;
///
/// let energy = ControlSpec::new("energy", "Energy")
///     .range(0.2, 1.0)
///     .step(0.02)
///     .default(1.0)
///     .unit("MeV");
/// assert_eq!(energy.id, "energy");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpec {
    pub id: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub unit: Option<String>,
    pub choices: Vec<String>,
    pub hold: Option<HoldBehavior>,
    pub enabled: bool,
}

impl ControlSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        ControlSpec {
            id: id.into(),
            label: label.into(),
            min: 0.0,
            max: 1.0,
            step: 0.01,
            default: 0.0,
            unit: None,
            choices: Vec::new(),
            hold: None,
            enabled: true,
        }
    }

    /// An enum control: a numeric control over `0..choices.len()` with step 1
    pub fn choice(id: impl Into<String>, label: impl Into<String>, choices: &[&str]) -> Self {
        let last = choices.len().saturating_sub(1) as f64;
        ControlSpec {
            choices: choices.iter().map(|c| c.to_string()).collect(),
            ..ControlSpec::new(id, label).range(0.0, last).step(1.0)
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn default(mut self, value: f64) -> Self {
        self.default = value;
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn momentary(mut self, rest: f64, return_step: f64) -> Self {
        self.hold = Some(HoldBehavior { rest, return_step });
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A live control with its current value
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    id: String,
    label: String,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    unit: Option<String>,
    choices: Vec<String>,
    hold: Option<HoldBehavior>,
    enabled: bool,
    /// Decimal places implied by `min` and `step`, used for rounding and display
    precision: usize,
}

impl Control {
    /// Validate a declaration and build the control at its (snapped) default
    pub fn from_spec(spec: ControlSpec) -> Result<Self, LabError> {
        if !spec.min.is_finite() || !spec.max.is_finite() || spec.min > spec.max {
            return Err(LabError::InvalidBounds {
                id: spec.id,
                min: spec.min,
                max: spec.max,
            });
        }
        if !spec.step.is_finite() || spec.step <= 0.0 {
            return Err(LabError::InvalidStep {
                id: spec.id,
                step: spec.step,
            });
        }

        if let Some(hold) = spec.hold {
            if !hold.return_step.is_finite() || hold.return_step <= 0.0 {
                return Err(LabError::InvalidStep {
                    id: spec.id,
                    step: hold.return_step,
                });
            }
        }

        let precision = decimal_places(spec.step).max(decimal_places(spec.min));
        let mut control = Control {
            id: spec.id,
            label: spec.label,
            value: spec.min,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            unit: spec.unit,
            choices: spec.choices,
            hold: spec.hold,
            enabled: spec.enabled,
            precision,
        };
        let default = if spec.default.is_finite() {
            spec.default
        } else {
            spec.min
        };
        control.value = control.snap(default);
        Ok(control)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn hold(&self) -> Option<HoldBehavior> {
        self.hold
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_momentary(&self) -> bool {
        self.hold.is_some()
    }

    pub(crate) fn set_enabled_flag(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Clamp into `[min, max]` and round to the nearest step counted from `min`.
    ///
    /// The result is re-rounded to the control's decimal precision so that a
    /// step-aligned input comes back bit-for-bit (0.2 + 13 * 0.02 is 0.46, not
    /// 0.46000000000000002).
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        let scale = 10f64.powi(self.precision as i32);
        ((snapped * scale).round() / scale).clamp(self.min, self.max)
    }

    /// Store a new value, returning what was actually stored.
    /// NaN leaves the control untouched.
    pub(crate) fn assign(&mut self, value: f64) -> f64 {
        if !value.is_nan() {
            self.value = self.snap(value);
        }
        self.value
    }

    /// Position of the value within the range, 0.0..=1.0
    pub fn normalized(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 1.0;
        }
        (self.value - self.min) / span
    }

    /// Selected choice label for enum controls
    pub fn choice_label(&self) -> Option<&str> {
        self.choices
            .get(self.value.round() as usize)
            .map(|s| s.as_str())
    }

    /// Format the value for display
    pub fn display(&self) -> String {
        if let Some(choice) = self.choice_label() {
            return choice.to_string();
        }
        let text = format!("{:.prec$}", self.value, prec = self.precision);
        match &self.unit {
            Some(unit) => format!("{} {}", text, unit),
            None => text,
        }
    }
}

/// Smallest number of decimal places that represents `x` exactly enough
fn decimal_places(x: f64) -> usize {
    for places in 0..=9 {
        let scaled = x * 10f64.powi(places);
        if (scaled - scaled.round()).abs() < 1e-6 {
            return places as usize;
        }
    }
    9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy() -> Control {
        Control::from_spec(
            ControlSpec::new("energy", "Energy")
                .range(0.2, 1.0)
                .step(0.02)
                .default(0.5),
        )
        .unwrap()
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places(1.0), 0);
        assert_eq!(decimal_places(0.5), 1);
        assert_eq!(decimal_places(0.02), 2);
        assert_eq!(decimal_places(0.005), 3);
        assert_eq!(decimal_places(22.5), 1);
    }

    #[test]
    fn test_snap_rounds_to_step_from_min() {
        let c = energy();
        assert_eq!(c.snap(0.515), 0.52);
        assert_eq!(c.snap(0.509), 0.50);
        assert_eq!(c.snap(0.46), 0.46);
        assert_eq!(c.snap(-3.0), 0.2);
        assert_eq!(c.snap(7.0), 1.0);
    }

    #[test]
    fn test_nan_is_ignored() {
        let mut c = energy();
        assert_eq!(c.assign(f64::NAN), 0.5);
        assert_eq!(c.assign(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_invalid_declarations_rejected() {
        let err = Control::from_spec(ControlSpec::new("x", "X").range(2.0, 1.0)).unwrap_err();
        assert!(matches!(err, LabError::InvalidBounds { .. }));

        let err = Control::from_spec(ControlSpec::new("x", "X").step(0.0)).unwrap_err();
        assert!(matches!(err, LabError::InvalidStep { .. }));

        let err = Control::from_spec(ControlSpec::new("x", "X").range(0.0, f64::NAN)).unwrap_err();
        assert!(matches!(err, LabError::InvalidBounds { .. }));
    }

    #[test]
    fn test_default_is_clamped_on_creation() {
        let c = Control::from_spec(
            ControlSpec::new("len", "Length")
                .range(100.0, 250.0)
                .step(5.0)
                .default(400.0),
        )
        .unwrap();
        assert_eq!(c.value(), 250.0);
    }

    #[test]
    fn test_choice_display() {
        let mut c = Control::from_spec(
            ControlSpec::choice("bias", "Bias", &["forward", "reverse"]).default(0.0),
        )
        .unwrap();
        assert_eq!(c.display(), "forward");
        c.assign(1.0);
        assert_eq!(c.display(), "reverse");
        assert_eq!(c.max(), 1.0);
    }

    #[test]
    fn test_display_uses_step_precision() {
        let c = Control::from_spec(
            ControlSpec::new("energy", "Energy")
                .range(0.2, 1.0)
                .step(0.02)
                .default(1.0)
                .unit("MeV"),
        )
        .unwrap();
        assert_eq!(c.display(), "1.00 MeV");
        assert_eq!(c.normalized(), 1.0);
    }
}
