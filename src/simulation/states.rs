//! Core state types for the N-body simulation.
//!
//! Defines the 3D body struct and the [`PointMass`] capability the octree and
//! force evaluators are written against. Bodies are plain data: a radius is
//! always present, derived from the mass and an assumed density when it is not
//! given.

use nalgebra::Vector3;

use crate::error::{SimError, SimResult};

pub type NVec3 = Vector3<f64>;

/// Assumed bulk density (kg/m³) used to derive a radius from a mass
pub const DENSITY: f64 = 4.0e3;

/// Anything with a position, a velocity and a mass
pub trait PointMass {
    fn position(&self) -> NVec3;
    fn velocity(&self) -> NVec3;
    fn mass(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
    pub radius: f64, // physical radius
}

impl Body {
    /// Body whose radius follows from its mass and [`DENSITY`]
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self::with_radius(x, v, m, None)
    }

    /// Body with an explicit radius; `None` (or zero) falls back to the density formula
    pub fn with_radius(x: NVec3, v: NVec3, m: f64, radius: Option<f64>) -> Self {
        let radius = match radius {
            Some(r) if r != 0.0 => r,
            _ => radius_from_mass(m),
        };
        Self { x, v, m, radius }
    }

    /// Advance this body by `dt` under a constant `force`.
    ///
    /// Per axis: `a = F/m`, `x += v dt + a dt²/2`, `v += a dt`. The position
    /// uses the velocity from before the update.
    pub fn update(&mut self, force: &NVec3, dt: f64) -> SimResult<()> {
        if self.m == 0.0 || !self.m.is_finite() {
            return Err(SimError::InvalidBodyState { index: None, mass: self.m });
        }

        let a = force / self.m;
        self.x += self.v * dt + 0.5 * a * dt * dt;
        self.v += a * dt;
        Ok(())
    }
}

impl PointMass for Body {
    fn position(&self) -> NVec3 {
        self.x
    }

    fn velocity(&self) -> NVec3 {
        self.v
    }

    fn mass(&self) -> f64 {
        self.m
    }
}

/// Radius of a sphere of mass `m` at [`DENSITY`]: `(3m / 4πρ)^(1/3)`
pub fn radius_from_mass(m: f64) -> f64 {
    (3.0 * m / (4.0 * std::f64::consts::PI * DENSITY)).cbrt()
}
