pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod environment;
pub mod barnes_hut;
