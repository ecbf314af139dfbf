//! The gravitational environment: bodies, the clock and the force evaluator.
//!
//! One step is a strict pipeline: forces for every body are computed from the
//! state at the start of the step, and only then are bodies moved and the
//! clock advanced. An optional [`StepLogger`] receives one CSV row per step.

use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::output::log::StepLogger;
use crate::simulation::barnes_hut::Octree;
use crate::simulation::engine::{Engine, ForceAlgorithm};
use crate::simulation::forces::{ForceModel, Gravity};
use crate::simulation::integrator;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Fields written per body in the step log, in order
pub const LOG_FIELDS: [&str; 7] = ["mass", "x", "y", "z", "vx", "vy", "vz"];

pub struct Environment {
    bodies: Vec<Body>, // canonical order for forces and logs
    time: f64,
    gravity: Gravity,
    logger: Option<StepLogger>,
}

impl Environment {
    pub fn new(bodies: Vec<Body>, engine: &Engine, params: &Parameters) -> Self {
        Self::with_gravity(bodies, engine.gravity(params))
    }

    pub fn with_gravity(bodies: Vec<Body>, gravity: Gravity) -> Self {
        Self {
            bodies,
            time: 0.0,
            gravity,
            logger: None,
        }
    }

    /// Turn on step logging
    pub fn with_logger(mut self, logger: StepLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn algorithm(&self) -> ForceAlgorithm {
        self.gravity.algorithm()
    }

    /// The octree as left by the last Barnes–Hut evaluation
    pub fn tree(&self) -> Option<&Octree> {
        self.gravity.tree()
    }

    pub fn logger(&self) -> Option<&StepLogger> {
        self.logger.as_ref()
    }

    /// Net force on every body for the current state, in body order
    pub fn get_forces(&mut self) -> SimResult<Vec<NVec3>> {
        let mut forces = vec![NVec3::zeros(); self.bodies.len()];
        self.gravity.accumulate_forces(&self.bodies, &mut forces)?;
        Ok(forces)
    }

    /// Apply `forces` to the bodies over `dt` without touching the clock
    pub fn update_all(&mut self, forces: &[NVec3], dt: f64) -> SimResult<()> {
        integrator::update_all(&mut self.bodies, forces, dt)
    }

    /// Advance the whole system by one step of `dt`
    pub fn step(&mut self, dt: f64) -> SimResult<()> {
        check_step(dt)?;

        let forces = self.get_forces()?;
        self.update_all(&forces, dt)?;
        self.time += dt;
        debug!(time = self.time, "step complete");

        if self.logger.is_some() {
            let row = self.get_step_log();
            if let Some(logger) = self.logger.as_mut() {
                logger.write(&row);
            }
        }

        Ok(())
    }

    /// Run `floor(duration / dt)` steps, returning how many were taken.
    ///
    /// When logging, the header is written first and a final snapshot row
    /// stamped `duration` is appended after the last step. That row is not a
    /// physical step: the clock stays where the last step left it.
    pub fn simulate(&mut self, duration: f64, dt: f64) -> SimResult<usize> {
        check_step(dt)?;
        if !(duration >= 0.0 && duration.is_finite()) {
            return Err(SimError::InvalidTimeStep(duration));
        }

        let steps = (duration / dt).floor() as usize;
        info!(
            bodies = self.bodies.len(),
            algorithm = %self.algorithm(),
            steps,
            dt,
            "starting simulation"
        );

        if self.logger.is_some() {
            let header = self.get_log_header();
            if let Some(logger) = self.logger.as_mut() {
                logger.write(&header);
            }
        }

        for _ in 0..steps {
            self.step(dt)?;
        }

        if self.logger.is_some() {
            let row = self.snapshot_row(duration);
            if let Some(logger) = self.logger.as_mut() {
                logger.write(&row);
                logger.flush();
            }
        }

        info!(time = self.time, "simulation finished");
        Ok(steps)
    }

    /// Set the clock back to zero; bodies and tree are left as they are
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// `Time,mass0,x0,...,vz0,mass1,...` terminated by a newline
    pub fn get_log_header(&self) -> String {
        let mut columns = vec!["Time".to_string()];
        for i in 0..self.bodies.len() {
            columns.extend(LOG_FIELDS.iter().map(|field| format!("{field}{i}")));
        }
        columns.join(",") + "\n"
    }

    /// Current time followed by mass, position and velocity of each body
    pub fn get_step_log(&self) -> String {
        self.snapshot_row(self.time)
    }

    fn snapshot_row(&self, time: f64) -> String {
        let mut fields = vec![time.to_string()];
        for b in &self.bodies {
            fields.push(b.m.to_string());
            fields.extend(b.x.iter().map(|c| c.to_string()));
            fields.extend(b.v.iter().map(|c| c.to_string()));
        }
        fields.join(",") + "\n"
    }
}

fn check_step(dt: f64) -> SimResult<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidTimeStep(dt))
    }
}
