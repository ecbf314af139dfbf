//! Error types for the simulation core and its configuration layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::simulation::states::NVec3;

/// Errors raised while stepping a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A body whose mass cannot produce an acceleration (zero or not finite).
    #[error("invalid body state: body {index:?} has mass {mass}")]
    InvalidBodyState {
        /// Index of the body in the environment, when known.
        index: Option<usize>,
        /// The offending mass.
        mass: f64,
    },

    /// Octree subdivision went past the configured depth limit.
    #[error(
        "octree depth limit {max_depth} exceeded while inserting body {body} at {position:?} (coincident bodies?)"
    )]
    OctreeDepthExceeded {
        /// Configured maximum depth.
        max_depth: usize,
        /// Index of the body being inserted.
        body: usize,
        /// Its position.
        position: NVec3,
    },

    /// The force buffer does not line up with the body collection.
    #[error("expected {expected} force vectors, got {got}")]
    ForceCountMismatch {
        /// Number of bodies.
        expected: usize,
        /// Number of forces supplied.
        got: usize,
    },

    /// Time step or duration is not usable.
    #[error("invalid time step {0}")]
    InvalidTimeStep(f64),
}

/// Errors raised while loading a scenario or sampling initial conditions.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML or has the wrong shape.
    #[error("malformed configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required property is absent.
    #[error("missing property `{0}`")]
    MissingProperty(String),

    /// A property descriptor has no `dist` key.
    #[error("property `{property}` has no `dist` key")]
    MissingDistribution {
        /// Property name.
        property: String,
    },

    /// A `dist` value that is not one of `constant`, `normal`, `uniform`.
    #[error("property `{property}` uses unknown distribution `{kind}`")]
    UnknownDistribution {
        /// Property name.
        property: String,
        /// The unrecognized kind.
        kind: String,
    },

    /// A distribution or engine parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Sampling produced a mass that cannot be simulated.
    #[error("sampled non-positive mass {mass} for particle {index}")]
    NonPositiveMass {
        /// Particle index.
        index: usize,
        /// Sampled mass.
        mass: f64,
    },
}

/// Result type for the simulation core.
pub type SimResult<T> = Result<T, SimError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
