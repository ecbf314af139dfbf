//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - step size and run duration,
//! - gravitational constant `g`,
//! - octree depth limit and sampling seed

use crate::simulation::barnes_hut::DEFAULT_MAX_DEPTH;

/// Gravitational constant in SI units (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.6743e-11;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64, // step size
    pub duration: f64, // total simulated time
    pub g: f64, // gravitational constant
    pub max_depth: usize, // octree subdivision limit
    pub seed: Option<u64>, // deterministic seed for sampling
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: 1.0,
            duration: 10.0,
            g: G,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: None,
        }
    }
}
