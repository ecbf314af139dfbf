//! Turn [`InitialConditions`] into a body list.
//!
//! Each property is drawn for all particles before the next property, in the
//! fixed order of [`PROPERTIES`], from a single ChaCha stream. The same seed
//! therefore always gives the same bodies.
//!
//! [`PROPERTIES`]: crate::configuration::config::PROPERTIES

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Uniform};
use tracing::info;

use crate::configuration::config::{DistributionConfig, InitialConditions};
use crate::error::{ConfigError, ConfigResult};
use crate::simulation::states::{Body, NVec3};

/// Draw `n` values from `dist`
pub fn sample_values<R: Rng + ?Sized>(dist: &DistributionConfig, n: usize, rng: &mut R) -> ConfigResult<Vec<f64>> {
    let values = match *dist {
        DistributionConfig::Constant { val } => vec![val; n],
        DistributionConfig::Normal { mu, sigma } => {
            let normal = Normal::new(mu, sigma).map_err(|e| ConfigError::InvalidParameter(e.to_string()))?;
            (0..n).map(|_| normal.sample(rng)).collect()
        }
        DistributionConfig::Uniform { min, max } if min == max => vec![min; n],
        DistributionConfig::Uniform { min, max } => {
            if min > max {
                return Err(ConfigError::InvalidParameter(format!("uniform range [{min}, {max}] is empty")));
            }
            let uniform = Uniform::new_inclusive(min, max);
            (0..n).map(|_| uniform.sample(rng)).collect()
        }
    };
    Ok(values)
}

/// Sample every body described by `ic`.
///
/// `seed` overrides `global.seed`; with neither, the generator is seeded from
/// the OS.
pub fn sample_bodies(ic: &InitialConditions, seed: Option<u64>) -> ConfigResult<Vec<Body>> {
    let mut rng = match seed.or(ic.global.seed) {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };

    let n = ic.global.n_particles;
    let x = sample_values(&ic.x, n, &mut rng)?;
    let y = sample_values(&ic.y, n, &mut rng)?;
    let z = sample_values(&ic.z, n, &mut rng)?;
    let vx = sample_values(&ic.vx, n, &mut rng)?;
    let vy = sample_values(&ic.vy, n, &mut rng)?;
    let vz = sample_values(&ic.vz, n, &mut rng)?;
    let mass = sample_values(&ic.mass, n, &mut rng)?;
    let radius = match &ic.radius {
        Some(dist) => Some(sample_values(dist, n, &mut rng)?),
        None => None,
    };

    if let Some((index, &m)) = mass.iter().enumerate().find(|(_, m)| **m <= 0.0) {
        return Err(ConfigError::NonPositiveMass { index, mass: m });
    }

    let bodies = (0..n)
        .map(|i| {
            Body::with_radius(
                NVec3::new(x[i], y[i], z[i]),
                NVec3::new(vx[i], vy[i], vz[i]),
                mass[i],
                radius.as_ref().map(|r| r[i]),
            )
        })
        .collect();

    info!(n, "sampled initial conditions");
    Ok(bodies)
}
