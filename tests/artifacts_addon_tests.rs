//! Tests for the artifacts addon's emitted block
//!
//! These tests drive the addon through the `Recorder` emitter and verify:
//! - Empty configuration emits nothing
//! - Missing credentials produce one diagnostic each and no upload
//! - System limits always win over job values
//! - `options` reaches the upload command but is never exported
//! - Only `PATHS` is echoed
//! - Guard rendering and determinism

use artifacts_addon::limits::{CONCURRENCY_ENV, MAX_SIZE_ENV};
use artifacts_addon::{
    Addon, AddonOutcome, ArtifactsAddon, Credential, Emission, RawConfig, Recorder, SystemLimits,
};

fn compile(config: RawConfig, limits: SystemLimits) -> (Recorder, AddonOutcome) {
    let addon = ArtifactsAddon::new(config).with_limits(limits);
    let mut recorder = Recorder::new();
    let outcome = addon.after_script(&mut recorder);
    (recorder, outcome)
}

fn credentials() -> RawConfig {
    RawConfig::new()
        .with("key", "k")
        .with("secret", "s")
        .with("bucket", "b")
}

fn env_value<'a>(recorder: &'a Recorder, name: &str) -> Option<&'a str> {
    recorder
        .env_vars()
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

// =============================================================================
// Empty and invalid configuration
// =============================================================================

#[test]
fn test_empty_config_produces_no_emissions() {
    let (recorder, outcome) = compile(RawConfig::new(), SystemLimits::default());
    assert!(recorder.is_empty());
    assert_eq!(outcome, AddonOutcome::Skipped);
}

#[test]
fn test_each_missing_credential_reported_once() {
    let cases: Vec<(RawConfig, Vec<Credential>)> = vec![
        (
            RawConfig::new().with("paths", vec!["a"]),
            vec![Credential::Key, Credential::Secret, Credential::Bucket],
        ),
        (
            RawConfig::new().with("key", "k").with("bucket", "b"),
            vec![Credential::Secret],
        ),
        (
            RawConfig::new().with("key", "k").with("secret", "s"),
            vec![Credential::Bucket],
        ),
    ];

    for (config, expected) in cases {
        let (recorder, outcome) = compile(config, SystemLimits::default());
        assert_eq!(outcome, AddonOutcome::MissingCredentials(expected.clone()));

        let commands = recorder.commands();
        assert_eq!(commands.len(), expected.len());
        for (command, credential) in commands.iter().zip(&expected) {
            assert_eq!(
                *command,
                format!("echo \"Artifacts config missing :{} param\"", credential)
            );
        }
        assert!(recorder.env_vars().is_empty(), "No exports on invalid config");
    }
}

#[test]
fn test_invalid_config_still_emits_guard() {
    let (recorder, _) = compile(RawConfig::new().with("branch", "dev"), SystemLimits::default());
    let [Emission::Conditional { guard, body }] = recorder.emissions() else {
        panic!("Expected the guard block");
    };
    assert!(guard.contains("= dev)"));
    assert!(body.iter().all(|e| matches!(
        e,
        Emission::Command { echo: false, assert: false, .. }
    )));
    assert!(!recorder
        .commands()
        .iter()
        .any(|c| c.contains("Uploading") || c.contains("Done")));
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn test_job_concurrency_is_discarded() {
    let config = credentials().with("concurrency", 999i64);
    let (recorder, outcome) = compile(config, SystemLimits::default());
    assert!(outcome.is_compiled());
    assert_eq!(env_value(&recorder, "ARTIFACTS_CONCURRENCY"), Some("5"));
}

#[test]
fn test_job_max_size_is_discarded() {
    let config = credentials().with("max_size", 12.0);
    let (recorder, _) = compile(config, SystemLimits::default());
    assert_eq!(env_value(&recorder, "ARTIFACTS_MAX_SIZE"), Some("5242880.0"));
}

#[test]
fn test_environment_limits_are_used() {
    let limits = SystemLimits::from_lookup(|name| match name {
        n if n == CONCURRENCY_ENV => Some("3".to_string()),
        n if n == MAX_SIZE_ENV => Some("2048".to_string()),
        _ => None,
    });
    let config = credentials()
        .with("concurrency", 50i64)
        .with("max_size", 1.0);
    let (recorder, _) = compile(config, limits);
    assert_eq!(env_value(&recorder, "ARTIFACTS_CONCURRENCY"), Some("3"));
    assert_eq!(env_value(&recorder, "ARTIFACTS_MAX_SIZE"), Some("2048.0"));
    assert_eq!(
        recorder
            .env_vars()
            .iter()
            .filter(|(n, _)| *n == "ARTIFACTS_CONCURRENCY")
            .count(),
        1
    );
}

// =============================================================================
// Exports and upload command
// =============================================================================

#[test]
fn test_options_only_in_upload_command() {
    let config = credentials().with("options", "--verbose");
    let (recorder, _) = compile(config, SystemLimits::default());
    assert!(recorder.commands().contains(&"artifacts upload --verbose"));
    assert!(env_value(&recorder, "ARTIFACTS_OPTIONS").is_none());
    assert!(recorder
        .env_vars()
        .iter()
        .all(|(_, value)| !value.contains("--verbose")));
}

#[test]
fn test_reserved_keys_withheld_in_any_case() {
    let config = credentials()
        .with("OPTIONS", "--leak")
        .with("Concurrency", 999i64)
        .with("MAX_SIZE", 1.0);
    let (recorder, _) = compile(config, SystemLimits::default());

    assert!(env_value(&recorder, "ARTIFACTS_OPTIONS").is_none());
    let concurrency: Vec<&str> = recorder
        .env_vars()
        .into_iter()
        .filter(|(n, _)| *n == "ARTIFACTS_CONCURRENCY")
        .map(|(_, v)| v)
        .collect();
    assert_eq!(concurrency, vec!["5"]);
    assert_eq!(env_value(&recorder, "ARTIFACTS_MAX_SIZE"), Some("5242880.0"));
    assert!(recorder.commands().contains(&"artifacts upload"));
}

#[test]
fn test_list_values_joined_and_only_paths_echoed() {
    let config = credentials()
        .with("paths", vec!["a", "b"])
        .with("target_paths", vec!["x", "y"]);
    let (recorder, _) = compile(config, SystemLimits::default());
    assert_eq!(env_value(&recorder, "ARTIFACTS_PATHS"), Some("a;b"));
    assert_eq!(env_value(&recorder, "ARTIFACTS_TARGET_PATHS"), Some("x;y"));

    let echoed: Vec<&str> = recorder
        .leaves()
        .into_iter()
        .filter_map(|e| match e {
            Emission::SetEnv { name, echo: true, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(echoed, vec!["ARTIFACTS_PATHS"]);
}

#[test]
fn test_every_export_is_best_effort() {
    let config = credentials().with("paths", vec!["a"]);
    let (recorder, _) = compile(config, SystemLimits::default());
    for emission in recorder.leaves() {
        match emission {
            Emission::SetEnv { assert, .. } | Emission::Command { assert, .. } => {
                assert!(!assert, "{:?} must not fail the build", emission)
            }
            _ => unreachable!("leaves are commands and exports"),
        }
    }
}

#[test]
fn test_export_order_follows_config_then_limits() {
    let config = RawConfig::new()
        .with("bucket", "b")
        .with("key", "k")
        .with("concurrency", 1i64)
        .with("secret", "s")
        .with("paths", vec!["a"]);
    let (recorder, _) = compile(config, SystemLimits::default());
    let names: Vec<&str> = recorder.env_vars().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec![
            "ARTIFACTS_BUCKET",
            "ARTIFACTS_KEY",
            "ARTIFACTS_SECRET",
            "ARTIFACTS_PATHS",
            "ARTIFACTS_CONCURRENCY",
            "ARTIFACTS_MAX_SIZE",
            "PATH",
        ]
    );
}

// =============================================================================
// Guard and determinism
// =============================================================================

#[test]
fn test_guard_uses_configured_branch() {
    let (recorder, _) = compile(credentials().with("branch", "dev"), SystemLimits::default());
    match &recorder.emissions()[0] {
        Emission::Conditional { guard, .. } => assert_eq!(
            guard,
            "($TRAVIS_PULL_REQUEST = false) && ($TRAVIS_BRANCH = dev)"
        ),
        other => panic!("Expected conditional, got {:?}", other),
    }
}

#[test]
fn test_guard_defaults_to_master() {
    let (recorder, _) = compile(credentials(), SystemLimits::default());
    match &recorder.emissions()[0] {
        Emission::Conditional { guard, .. } => assert!(guard.ends_with("($TRAVIS_BRANCH = master)")),
        other => panic!("Expected conditional, got {:?}", other),
    }
}

#[test]
fn test_compiling_twice_is_identical() {
    let config = credentials()
        .with("paths", vec!["a", "b"])
        .with("options", "--debug");
    let addon = ArtifactsAddon::new(config).with_limits(SystemLimits::default());

    let mut first = Recorder::new();
    let mut second = Recorder::new();
    addon.after_script(&mut first);
    addon.after_script(&mut second);
    assert_eq!(first, second);
}

#[test]
fn test_config_from_json_file_contents() {
    let config = RawConfig::from_json_str(
        r#"{"key": "k", "secret": "s", "bucket": "b", "paths": ["dist", "logs"], "options": "--target-paths ci"}"#,
    )
    .unwrap();
    let (recorder, outcome) = compile(config, SystemLimits::default());
    assert!(outcome.is_compiled());
    assert_eq!(env_value(&recorder, "ARTIFACTS_PATHS"), Some("dist;logs"));
    assert!(recorder
        .commands()
        .contains(&"artifacts upload --target-paths ci"));
}
