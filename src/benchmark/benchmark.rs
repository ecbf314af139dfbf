//! Timing comparisons between the pairwise and Barnes–Hut evaluators.
//!
//! Output is plain CSV on stdout so it can be pasted into a spreadsheet.

use std::time::Instant;

use crate::error::SimResult;
use crate::simulation::engine::{Engine, ForceAlgorithm};
use crate::simulation::environment::Environment;
use crate::simulation::forces::{BarnesHutGravity, ForceLaw, ForceModel, PairwiseGravity};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Helper to build a deterministic body set of size `n` (no rand needed)
pub fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            Body::with_radius(x, NVec3::zeros(), 1.0e6, Some(0.01))
        })
        .collect()
}

/// Time a single force evaluation for growing `n`
pub fn bench_gravity(theta: f64, law: ForceLaw) -> SimResult<()> {
    let params = Parameters::default();
    let ns = [200, 400, 800, 1600, 3200, 6400];

    println!("N,direct_ms,bh_ms");
    for n in ns {
        let bodies = make_bodies(n);
        let mut out = vec![NVec3::zeros(); n];

        let mut direct = PairwiseGravity { g: params.g, law };
        let mut bh = BarnesHutGravity::new(params.g, theta, law, params.max_depth);

        // Warm up
        direct.accumulate_forces(&bodies, &mut out)?;
        bh.accumulate_forces(&bodies, &mut out)?;

        let t0 = Instant::now();
        direct.accumulate_forces(&bodies, &mut out)?;
        let ms_direct = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        bh.accumulate_forces(&bodies, &mut out)?;
        let ms_bh = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.6},{:.6}", n, ms_direct, ms_bh);
    }

    Ok(())
}

/// Time whole environment steps (force evaluation plus update) for growing `n`
pub fn bench_step(theta: f64, law: ForceLaw) -> SimResult<()> {
    let params = Parameters {
        dt: 1.0e-3,
        ..Parameters::default()
    };
    let ns = [200, 400, 800, 1600, 3200];

    println!("N,direct_step_ms,bh_step_ms");
    for n in ns {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 800 { 5 } else { 1 };
        let template = make_bodies(n);

        let direct = Engine { law, ..Engine::pairwise() };
        let barnes_hut = Engine {
            algorithm: ForceAlgorithm::BarnesHut,
            theta,
            law,
        };

        let ms_direct = time_steps(Environment::new(template.clone(), &direct, &params), steps, params.dt)?;
        let ms_bh = time_steps(Environment::new(template, &barnes_hut, &params), steps, params.dt)?;

        println!("{},{:.6},{:.6}", n, ms_direct, ms_bh);
    }

    Ok(())
}

fn time_steps(mut env: Environment, steps: usize, dt: f64) -> SimResult<f64> {
    let t0 = Instant::now();
    for _ in 0..steps {
        env.step(dt)?;
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0 / steps as f64)
}
