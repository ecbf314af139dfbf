use octsim::configuration::config::resolve_scenario_path;
use octsim::configuration::sampling::sample_values;
use octsim::simulation::states::radius_from_mass;
use octsim::{next_log_path, sample_bodies, ConfigError, DistributionConfig, Engine, ForceAlgorithm, ForceLaw, InitialConditions};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const VALID: &str = r#"
global:
  nParticles: 12
  seed: 7
x:    { dist: uniform, min: -5.0, max: 5.0 }
y:    { dist: normal, mu: 1.0, sigma: 0.5 }
z:    { dist: constant, val: 6.32 }
vx:   { dist: constant, val: 0 }
vy:   { dist: constant, val: 0.0 }
vz:   { dist: constant, val: 0.0 }
mass: { dist: uniform, min: 1.0e9, max: 2.0e9 }
"#;

/// `VALID` with one property line swapped out
fn with_property(name: &str, line: &str) -> String {
    VALID
        .lines()
        .map(|l| if l.starts_with(&format!("{name}:")) { line.to_string() } else { l.to_string() })
        .collect::<Vec<_>>()
        .join("\n")
}

// ==================================================================================
// Parsing tests
// ==================================================================================

#[test]
fn parses_valid_configuration() {
    let ic = InitialConditions::from_yaml_str(VALID).unwrap();
    assert_eq!(ic.global.n_particles, 12);
    assert_eq!(ic.global.seed, Some(7));
    assert_eq!(ic.x, DistributionConfig::Uniform { min: -5.0, max: 5.0 });
    assert_eq!(ic.y, DistributionConfig::Normal { mu: 1.0, sigma: 0.5 });
    assert_eq!(ic.z, DistributionConfig::Constant { val: 6.32 });
    assert_eq!(ic.vx, DistributionConfig::Constant { val: 0.0 });
    assert!(ic.radius.is_none());
}

#[test]
fn missing_dist_key_is_reported() {
    let text = with_property("y", "y:    { mu: 1.0, sigma: 0.5 }");
    let err = InitialConditions::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::MissingDistribution { ref property } if property == "y"), "{err}");
}

#[test]
fn unknown_distribution_is_reported() {
    let text = with_property("mass", "mass: { dist: poisson, lambda: 3.0 }");
    let err = InitialConditions::from_yaml_str(&text).unwrap_err();
    assert!(
        matches!(err, ConfigError::UnknownDistribution { ref property, ref kind } if property == "mass" && kind == "poisson"),
        "{err}"
    );
}

#[test]
fn missing_property_is_reported() {
    let text: String = VALID.lines().filter(|l| !l.starts_with("vz:")).collect::<Vec<_>>().join("\n");
    let err = InitialConditions::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::MissingProperty(ref p) if p == "vz"), "{err}");
}

#[test]
fn missing_global_is_reported() {
    let text = "x: { dist: constant, val: 1.0 }\n";
    let err = InitialConditions::from_yaml_str(text).unwrap_err();
    assert!(matches!(err, ConfigError::MissingProperty(ref p) if p == "global"), "{err}");
}

#[test]
fn negative_sigma_is_rejected() {
    let text = with_property("y", "y:    { dist: normal, mu: 1.0, sigma: -0.5 }");
    let err = InitialConditions::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidParameter(_)), "{err}");
}

#[test]
fn empty_uniform_range_is_rejected() {
    let text = with_property("x", "x:    { dist: uniform, min: 5.0, max: -5.0 }");
    assert!(matches!(
        InitialConditions::from_yaml_str(&text),
        Err(ConfigError::InvalidParameter(_))
    ));
}

#[test]
fn descriptor_missing_parameters_is_a_yaml_error() {
    let text = with_property("z", "z:    { dist: constant }");
    assert!(matches!(InitialConditions::from_yaml_str(&text), Err(ConfigError::Yaml(_))));
}

#[test]
fn bundled_scenarios_load() {
    for name in ["cluster.yaml", "gaussian.yaml"] {
        let ic = InitialConditions::from_path(resolve_scenario_path(name)).unwrap();
        assert!(ic.global.n_particles > 0, "{name}");
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = InitialConditions::from_path("definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

// ==================================================================================
// Sampling tests
// ==================================================================================

#[test]
fn sampling_is_reproducible_with_a_seed() {
    let ic = InitialConditions::from_yaml_str(VALID).unwrap();
    let a = sample_bodies(&ic, None).unwrap();
    let b = sample_bodies(&ic, None).unwrap();
    let c = sample_bodies(&ic, Some(8)).unwrap();

    assert_eq!(a.len(), 12);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn sampled_values_respect_their_distributions() {
    let ic = InitialConditions::from_yaml_str(VALID).unwrap();
    let bodies = sample_bodies(&ic, None).unwrap();

    for b in &bodies {
        assert!((-5.0..=5.0).contains(&b.x.x));
        assert_eq!(b.x.z, 6.32);
        assert_eq!(b.v.x, 0.0);
        assert!((1.0e9..=2.0e9).contains(&b.m));
        assert!((b.radius - radius_from_mass(b.m)).abs() < 1e-9);
    }
}

#[test]
fn normal_samples_have_expected_moments() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let n = 1000;
    let values = sample_values(&DistributionConfig::Normal { mu: 0.0, sigma: 1.0 }, n, &mut rng).unwrap();

    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (values.iter().map(|v| v * v).sum::<f64>() / n as f64).sqrt();
    assert_eq!(values.len(), n);
    assert!(mean.abs() < 0.1);
    assert!((std - 1.0).abs() < 0.1);
}

#[test]
fn uniform_samples_stay_in_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let values = sample_values(&DistributionConfig::Uniform { min: -5.0, max: 5.0 }, 1000, &mut rng).unwrap();

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    assert!(mean.abs() < 0.25);
    assert!(values.iter().all(|v| (-5.0..=5.0).contains(v)));
}

#[test]
fn constant_samples_repeat_the_value() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let values = sample_values(&DistributionConfig::Constant { val: 6.32 }, 12, &mut rng).unwrap();
    assert_eq!(values, vec![6.32; 12]);
}

#[test]
fn radius_distribution_overrides_density() {
    let text = format!("{VALID}\nradius: {{ dist: constant, val: 2.0 }}\n");
    let ic = InitialConditions::from_yaml_str(&text).unwrap();
    let bodies = sample_bodies(&ic, None).unwrap();
    assert!(bodies.iter().all(|b| b.radius == 2.0));
}

#[test]
fn non_positive_mass_is_rejected() {
    let text = with_property("mass", "mass: { dist: constant, val: -1.0 }");
    let ic = InitialConditions::from_yaml_str(&text).unwrap();
    let err = sample_bodies(&ic, None).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveMass { index: 0, .. }), "{err}");
}

// ==================================================================================
// Engine and log naming tests
// ==================================================================================

#[test]
fn theta_out_of_range_is_rejected() {
    assert!(Engine::new(ForceAlgorithm::BarnesHut, 1.5, ForceLaw::PerAxis).is_err());
    assert!(Engine::new(ForceAlgorithm::BarnesHut, -0.1, ForceLaw::PerAxis).is_err());
    assert!(Engine::new(ForceAlgorithm::BarnesHut, 0.0, ForceLaw::PerAxis).is_ok());
}

#[test]
fn log_names_rotate_past_existing_files() {
    let dir = std::env::temp_dir().join(format!("octsim_rotation_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let first = next_log_path(&dir, "run");
    assert_eq!(first, dir.join("run_0.csv"));

    std::fs::write(&first, "").unwrap();
    assert_eq!(next_log_path(&dir, "run"), dir.join("run_1.csv"));

    std::fs::write(dir.join("run_1.csv"), "").unwrap();
    assert_eq!(next_log_path(&dir, "run"), dir.join("run_2.csv"));

    let _ = std::fs::remove_dir_all(&dir);
}
