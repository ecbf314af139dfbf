pub mod error;
pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use error::{ConfigError, ConfigResult, SimError, SimResult};

pub use simulation::states::{Body, NVec3, PointMass, DENSITY};
pub use simulation::params::{Parameters, G};
pub use simulation::engine::{Engine, ForceAlgorithm, DEFAULT_THETA};
pub use simulation::forces::{BarnesHutGravity, ForceLaw, ForceModel, Gravity, PairwiseGravity};
pub use simulation::barnes_hut::{BoundingBox, Octree, OctreeNode};
pub use simulation::environment::Environment;

pub use configuration::config::{DistributionConfig, GlobalConfig, InitialConditions};
pub use configuration::sampling::sample_bodies;

pub use output::log::{next_log_path, StepLogger};

pub use benchmark::benchmark::{bench_gravity, bench_step};
