//! Force evaluators for the n-body engine
//!
//! Defines the [`ForceModel`] trait, the exact pairwise evaluator, the
//! Barnes–Hut evaluator built on the octree, and the [`Gravity`] variant the
//! environment holds to pick one of them for a whole run.
//!
//! Evaluators produce forces (not accelerations), one per body, in body order.

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::SimResult;
use crate::simulation::barnes_hut::{BoundingBox, Octree};
use crate::simulation::engine::ForceAlgorithm;
use crate::simulation::states::{NVec3, PointMass};

/// How the direction/distance factor of a pair force is computed.
///
/// `PerAxis` divides each axis separation by the cube of its own magnitude,
/// `Δk / |Δk|³`. This is not the 3-D inverse-square law except for separations
/// along a coordinate axis. It is the default because it is the behavior the
/// reference runs were produced with. `InverseSquare` uses the Euclidean
/// separation, `Δ / |Δ|³`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ForceLaw {
    #[default]
    PerAxis,
    InverseSquare,
}

impl ForceLaw {
    /// Direction factor for a displacement `delta` pointing from the body
    /// toward its source. Coincident components contribute zero.
    pub fn direction(&self, delta: &NVec3) -> NVec3 {
        match self {
            ForceLaw::PerAxis => delta.map(|d| if d == 0.0 { 0.0 } else { d / d.abs().powi(3) }),
            ForceLaw::InverseSquare => {
                let r = delta.norm();
                if r == 0.0 {
                    NVec3::zeros()
                } else {
                    delta / (r * r * r)
                }
            }
        }
    }

    /// Force on a body (`m_i` at `x_i`) from a source (`m_j` at `x_j`)
    pub fn pair_force(&self, g: f64, m_i: f64, x_i: &NVec3, m_j: f64, x_j: &NVec3) -> NVec3 {
        // m_i * m_j first so swapping the pair negates the result exactly
        let gmm = g * (m_i * m_j);
        gmm * self.direction(&(x_j - x_i))
    }
}

/// A source of forces over a whole body set.
///
/// `accumulate_forces` zeroes `out` and writes the net force on body `i` to
/// `out[i]`. It must only read `bodies`; the environment applies the result
/// after every force is known.
pub trait ForceModel {
    fn accumulate_forces<B: PointMass>(&mut self, bodies: &[B], out: &mut [NVec3]) -> SimResult<()>;
}

/// Exact gravity: direct sum over every unordered pair
#[derive(Debug, Clone)]
pub struct PairwiseGravity {
    pub g: f64,
    pub law: ForceLaw,
}

impl ForceModel for PairwiseGravity {
    fn accumulate_forces<B: PointMass>(&mut self, bodies: &[B], out: &mut [NVec3]) -> SimResult<()> {
        out.iter_mut().for_each(|f| *f = NVec3::zeros());

        let n = bodies.len();
        for i in 0..n {
            let xi = bodies[i].position();
            let mi = bodies[i].mass();

            for j in (i + 1)..n {
                // one evaluation per pair, applied equal and opposite
                let f = self.law.pair_force(self.g, mi, &xi, bodies[j].mass(), &bodies[j].position());
                out[i] += f;
                out[j] -= f;
            }
        }

        Ok(())
    }
}

/// Gravity approximated through an octree rebuilt on every evaluation.
///
/// The tree is owned here and reused between steps, so its node arena is only
/// reallocated when the body distribution needs more nodes than before.
#[derive(Debug, Clone)]
pub struct BarnesHutGravity {
    pub g: f64,
    pub theta: f64,
    pub law: ForceLaw,
    pub tree: Octree,
}

impl BarnesHutGravity {
    pub fn new(g: f64, theta: f64, law: ForceLaw, max_depth: usize) -> Self {
        let bounds = BoundingBox::new(NVec3::zeros(), NVec3::zeros());
        Self {
            g,
            theta,
            law,
            tree: Octree::with_max_depth(bounds, max_depth),
        }
    }
}

impl ForceModel for BarnesHutGravity {
    fn accumulate_forces<B: PointMass>(&mut self, bodies: &[B], out: &mut [NVec3]) -> SimResult<()> {
        self.tree.rebuild(bodies)?;

        for (i, f) in out.iter_mut().enumerate().take(bodies.len()) {
            *f = self.tree.force_on_body(i, bodies, self.g, self.theta, self.law);
        }

        Ok(())
    }
}

/// The force evaluator chosen for a run
#[derive(Debug, Clone)]
pub enum Gravity {
    Pairwise(PairwiseGravity),
    BarnesHut(BarnesHutGravity),
}

impl Gravity {
    pub fn algorithm(&self) -> ForceAlgorithm {
        match self {
            Gravity::Pairwise(_) => ForceAlgorithm::Pairwise,
            Gravity::BarnesHut(_) => ForceAlgorithm::BarnesHut,
        }
    }

    /// The persistent octree, for the Barnes–Hut variant
    pub fn tree(&self) -> Option<&Octree> {
        match self {
            Gravity::Pairwise(_) => None,
            Gravity::BarnesHut(bh) => Some(&bh.tree),
        }
    }
}

impl ForceModel for Gravity {
    fn accumulate_forces<B: PointMass>(&mut self, bodies: &[B], out: &mut [NVec3]) -> SimResult<()> {
        match self {
            Gravity::Pairwise(p) => p.accumulate_forces(bodies, out),
            Gravity::BarnesHut(bh) => bh.accumulate_forces(bodies, out),
        }
    }
}
