//! Configuration types for loading initial conditions from YAML.
//!
//! A configuration file is a two-level mapping from a property name to a
//! distribution descriptor, plus a reserved `global` key:
//!
//! - [`DistributionConfig`] – how one property is sampled (`dist` selects the kind)
//! - [`GlobalConfig`]       – particle count and optional seed
//! - [`InitialConditions`]  – the validated whole, ready for sampling
//!
//! # YAML format
//!
//! ```yaml
//! global:
//!   nParticles: 100
//!   seed: 42              # optional
//! x:    { dist: uniform, min: -1.0e3, max: 1.0e3 }
//! y:    { dist: uniform, min: -1.0e3, max: 1.0e3 }
//! z:    { dist: normal, mu: 0.0, sigma: 50.0 }
//! vx:   { dist: constant, val: 0.0 }
//! vy:   { dist: constant, val: 0.0 }
//! vz:   { dist: constant, val: 0.0 }
//! mass: { dist: uniform, min: 1.0e9, max: 1.0e10 }
//! radius: { dist: constant, val: 1.0 }   # optional, derived from mass otherwise
//! ```
//!
//! Every property descriptor must carry a `dist` key. Files are checked in
//! full before any body is created.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

/// Properties every configuration must describe, in sampling order
pub const PROPERTIES: [&str; 7] = ["x", "y", "z", "vx", "vy", "vz", "mass"];

/// Optional per-body property
pub const RADIUS: &str = "radius";

/// Reserved key holding run-wide settings
pub const GLOBAL: &str = "global";

const DISTRIBUTION_KINDS: [&str; 3] = ["constant", "normal", "uniform"];

/// How a single property is drawn for every particle
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "dist", rename_all = "lowercase")]
pub enum DistributionConfig {
    Constant { val: f64 },
    Normal { mu: f64, sigma: f64 },
    Uniform { min: f64, max: f64 },
}

impl DistributionConfig {
    fn validate(&self, property: &str) -> ConfigResult<()> {
        let ok = match *self {
            DistributionConfig::Constant { val } => val.is_finite(),
            DistributionConfig::Normal { mu, sigma } => mu.is_finite() && sigma.is_finite() && sigma >= 0.0,
            DistributionConfig::Uniform { min, max } => min.is_finite() && max.is_finite() && min <= max,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidParameter(format!(
                "property `{property}` has an unusable distribution {self:?}"
            )))
        }
    }
}

/// Contents of the reserved `global` key
#[derive(Deserialize, Debug, Clone)]
pub struct GlobalConfig {
    #[serde(rename = "nParticles")]
    pub n_particles: usize, // number of bodies to sample
    #[serde(default)]
    pub seed: Option<u64>, // makes sampling reproducible
}

/// Validated initial-condition description
#[derive(Debug, Clone)]
pub struct InitialConditions {
    pub global: GlobalConfig,
    pub x: DistributionConfig,
    pub y: DistributionConfig,
    pub z: DistributionConfig,
    pub vx: DistributionConfig,
    pub vy: DistributionConfig,
    pub vz: DistributionConfig,
    pub mass: DistributionConfig,
    pub radius: Option<DistributionConfig>,
}

impl InitialConditions {
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let raw: BTreeMap<String, Value> = serde_yaml::from_str(text)?;
        Self::from_mapping(&raw)
    }

    /// Check and convert an already parsed property mapping
    pub fn from_mapping(raw: &BTreeMap<String, Value>) -> ConfigResult<Self> {
        for key in raw.keys() {
            if key != GLOBAL && key != RADIUS && !PROPERTIES.contains(&key.as_str()) {
                warn!(property = %key, "ignoring unknown property");
            }
        }

        let global_value = raw
            .get(GLOBAL)
            .ok_or_else(|| ConfigError::MissingProperty(GLOBAL.to_string()))?;
        let global: GlobalConfig = serde_yaml::from_value(global_value.clone())?;
        if global.n_particles == 0 {
            return Err(ConfigError::InvalidParameter("global.nParticles must be at least 1".to_string()));
        }

        let required = |name: &str| -> ConfigResult<DistributionConfig> {
            distribution(raw, name)?.ok_or_else(|| ConfigError::MissingProperty(name.to_string()))
        };

        Ok(Self {
            x: required("x")?,
            y: required("y")?,
            z: required("z")?,
            vx: required("vx")?,
            vy: required("vy")?,
            vz: required("vz")?,
            mass: required("mass")?,
            radius: distribution(raw, RADIUS)?,
            global,
        })
    }
}

/// Descriptor for `property`, or `None` when the key is absent
fn distribution(raw: &BTreeMap<String, Value>, property: &str) -> ConfigResult<Option<DistributionConfig>> {
    let Some(value) = raw.get(property) else {
        return Ok(None);
    };

    let kind = value.get("dist").ok_or_else(|| ConfigError::MissingDistribution {
        property: property.to_string(),
    })?;

    match kind.as_str() {
        Some(k) if DISTRIBUTION_KINDS.contains(&k) => {}
        Some(k) => {
            return Err(ConfigError::UnknownDistribution {
                property: property.to_string(),
                kind: k.to_string(),
            })
        }
        None => {
            return Err(ConfigError::UnknownDistribution {
                property: property.to_string(),
                kind: format!("{kind:?}"),
            })
        }
    }

    let dist: DistributionConfig = serde_yaml::from_value(value.clone())?;
    dist.validate(property)?;
    Ok(Some(dist))
}

/// Use `file_name` as given when it exists, otherwise look in the crate's
/// `scenarios/` directory
pub fn resolve_scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}
