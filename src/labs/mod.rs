//! The bundled labs
//!
//! Each lab is a [`SimulationModel`]; [`LabKind`] names them for the command
//! line and builds a fresh model on demand.

pub mod chsh;
pub mod diode;
pub mod faraday;
pub mod gravity;
pub mod pendulum;
pub mod radiation;
pub mod wave;

use crate::lab::SimulationModel;
use crate::render::{Point, Rgb, Scene};
use clap::ValueEnum;

pub use chsh::ChshLab;
pub use diode::DiodeLab;
pub use faraday::FaradayLab;
pub use gravity::GravityLab;
pub use pendulum::PendulumLab;
pub use radiation::RadiationLab;
pub use wave::WaveLab;

/// Logical canvas size shared by most labs
pub(crate) const W_STD: f64 = 800.0;
pub(crate) const H_STD: f64 = 450.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum LabKind {
    Radiation,
    Pendulum,
    Wave,
    Diode,
    Chsh,
    Faraday,
    Gravity,
}

impl LabKind {
    pub const ALL: [LabKind; 7] = [
        LabKind::Radiation,
        LabKind::Pendulum,
        LabKind::Wave,
        LabKind::Diode,
        LabKind::Chsh,
        LabKind::Faraday,
        LabKind::Gravity,
    ];

    pub fn build(self) -> Box<dyn SimulationModel> {
        match self {
            LabKind::Radiation => Box::new(RadiationLab::new()),
            LabKind::Pendulum => Box::new(PendulumLab::new()),
            LabKind::Wave => Box::new(WaveLab::new()),
            LabKind::Diode => Box::new(DiodeLab::new()),
            LabKind::Chsh => Box::new(ChshLab::new()),
            LabKind::Faraday => Box::new(FaradayLab::new()),
            LabKind::Gravity => Box::new(GravityLab::new()),
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            LabKind::Radiation => "alpha, beta and gamma rays through foil, shielding and fields",
            LabKind::Pendulum => "damped pendulum with live energy graph",
            LabKind::Wave => "superposition of two travelling waves",
            LabKind::Diode => "carrier flow across a biased p-n junction",
            LabKind::Chsh => "Bell test with entangled photon pairs",
            LabKind::Faraday => "induced EMF from a magnet pushed through a coil",
            LabKind::Gravity => "inverse-square attraction between two masses",
        }
    }
}

/// Dashed segment from `from` to `to`, `dash` units on and off
pub(crate) fn dashed_line(scene: &mut Scene, from: Point, to: Point, dash: f64, color: Rgb) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    if length <= 0.0 || dash <= 0.0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let mut at = 0.0;
    while at < length {
        let end = (at + dash).min(length);
        scene.line(
            Point::new(from.x + ux * at, from.y + uy * at),
            Point::new(from.x + ux * end, from.y + uy * end),
            color,
        );
        at += dash * 2.0;
    }
}
