//! High-level runtime engine settings
//!
//! Selects the force algorithm (pairwise or Barnes–Hut), the opening angle and
//! the force law used when building an `Environment`

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::simulation::forces::{BarnesHutGravity, ForceLaw, Gravity, PairwiseGravity};
use crate::simulation::params::Parameters;

/// Default opening angle for Barnes–Hut
pub const DEFAULT_THETA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ForceAlgorithm {
    Pairwise,
    BarnesHut,
}

impl std::fmt::Display for ForceAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForceAlgorithm::Pairwise => write!(f, "pairwise"),
            ForceAlgorithm::BarnesHut => write!(f, "barnes-hut"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub algorithm: ForceAlgorithm, // pairwise or barnes-hut
    pub theta: f64, // parameter to determine if use center of mass
    pub law: ForceLaw, // per-axis or inverse-square
}

impl Engine {
    /// Validated engine settings.
    ///
    /// `theta` must lie in `[0, 1]`: a node containing the evaluated body is
    /// never closer than its own diagonal, so for these values it is always
    /// opened and a body never attracts itself.
    pub fn new(algorithm: ForceAlgorithm, theta: f64, law: ForceLaw) -> ConfigResult<Self> {
        if !(0.0..=1.0).contains(&theta) {
            return Err(ConfigError::InvalidParameter(format!(
                "theta must be within [0, 1], got {theta}"
            )));
        }
        Ok(Self { algorithm, theta, law })
    }

    pub fn pairwise() -> Self {
        Self {
            algorithm: ForceAlgorithm::Pairwise,
            theta: DEFAULT_THETA,
            law: ForceLaw::default(),
        }
    }

    pub fn barnes_hut(theta: f64) -> ConfigResult<Self> {
        Self::new(ForceAlgorithm::BarnesHut, theta, ForceLaw::default())
    }

    /// Build the force evaluator these settings describe
    pub fn gravity(&self, params: &Parameters) -> Gravity {
        match self.algorithm {
            ForceAlgorithm::Pairwise => Gravity::Pairwise(PairwiseGravity {
                g: params.g,
                law: self.law,
            }),
            ForceAlgorithm::BarnesHut => Gravity::BarnesHut(BarnesHutGravity::new(
                params.g,
                self.theta,
                self.law,
                params.max_depth,
            )),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::pairwise()
    }
}
