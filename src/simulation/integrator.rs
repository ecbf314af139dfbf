//! Fixed-step kinematic update for the N-body system
//!
//! Applies one force vector per body over a step `dt`. All bodies are checked
//! before the first one moves, so a bad body leaves the whole set untouched.

use super::states::{Body, NVec3};
use crate::error::{SimError, SimResult};

/// Advance every body by `dt` under its force `forces[i]`.
pub fn update_all(bodies: &mut [Body], forces: &[NVec3], dt: f64) -> SimResult<()> {
    if forces.len() != bodies.len() {
        return Err(SimError::ForceCountMismatch {
            expected: bodies.len(),
            got: forces.len(),
        });
    }

    if let Some((index, b)) = bodies
        .iter()
        .enumerate()
        .find(|(_, b)| b.m == 0.0 || !b.m.is_finite())
    {
        return Err(SimError::InvalidBodyState { index: Some(index), mass: b.m });
    }

    for (b, f) in bodies.iter_mut().zip(forces.iter()) {
        b.update(f, dt)?;
    }

    Ok(())
}
