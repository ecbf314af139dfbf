pub mod config;
pub mod sampling;
