//! Integration tests for vdp-checks against the workspace fixtures.
//!
//! The sample profile must pass every checker; targeted edits then trip one
//! checker at a time.

use serde_json::{json, Value};
use vdp_checks::{check_temporal, structural, StructuralValidator, VerbosityChecker, VerbosityProfile};
use vdp_core::{CallerOverrides, Profile, ViolationKind};

fn workspace_file(relative: &str) -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    std::fs::read_to_string(workspace_root.join(relative)).unwrap()
}

fn sample() -> Value {
    serde_json::from_str(&workspace_file("fixtures/sample_vdp.json")).unwrap()
}

// =============================================================================
// Profile Loading
// =============================================================================

#[test]
fn test_shipped_profile_matches_builtin() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let path = std::path::Path::new(&manifest_dir).join("../../fixtures/profiles/strict.yaml");
    let profile = VerbosityProfile::load(path).unwrap();
    assert_eq!(profile, VerbosityProfile::strict());
}

// =============================================================================
// Full Check Sequence
// =============================================================================

#[test]
fn test_sample_passes_all_checkers() {
    let candidate = sample();
    assert!(structural::validate(&candidate).ok);

    let profile: Profile = serde_json::from_value(candidate).unwrap();
    assert!(check_temporal(&profile).is_empty());
    assert!(VerbosityChecker::default().check_profile(&profile).is_empty());
}

#[test]
fn test_ultra_wide_is_an_enum_violation() {
    let mut candidate = sample();
    candidate["scenes"][0]["shots"][0]["camera"]["shot"] = json!("ULTRA_WIDE");

    let result = structural::validate(&candidate);
    assert!(!result.ok);
    assert_eq!(result.count(ViolationKind::EnumViolation), 1);
    assert!(result.violations.iter().all(|v| v.is_fatal()));
}

#[test]
fn test_overridden_fields_may_be_missing() {
    let mut candidate = sample();
    let metadata = candidate["metadata"].as_object_mut().unwrap();
    metadata.remove("platform");
    metadata.remove("upload_date");
    metadata.insert("view_count".into(), json!(null));

    let overrides = CallerOverrides {
        platform: Some("TikTok".into()),
        upload_date: Some("2025-02-01T00:00:00Z".into()),
        view_count: Some(10),
        ..CallerOverrides::new("C0002")
    };

    assert_eq!(structural::validate(&candidate).violations.len(), 3);
    let result = StructuralValidator::new().with_exempt(overrides.paths()).validate(&candidate);
    assert!(result.ok, "{:?}", result.violations);

    overrides.apply(&mut candidate);
    assert!(structural::validate(&candidate).ok);
}

#[test]
fn test_fifteen_second_gap_is_fatal() {
    let mut profile: Profile = serde_json::from_value(sample()).unwrap();
    profile.scenes.truncate(2);
    let second = &mut profile.scenes[1];
    second.time_start = 15.2;
    second.time_end = 20.2;
    second.shots[0].start = 15.2;
    second.shots[0].end = 17.7;
    second.shots[1].start = 17.7;
    second.shots[1].end = 20.2;
    let first = &mut profile.scenes[0];
    first.time_end = 15.0;
    first.duration_sec = 15.0;
    first.shots[0].end = 15.0;

    let violations = check_temporal(&profile);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::GapOrOverlapViolation);
    assert!(violations[0].is_fatal());
}

#[test]
fn test_relaxed_profile_changes_floors() {
    let mut profile: Profile = serde_json::from_value(sample()).unwrap();
    profile.scenes[2].shots[1].keyframes.truncate(1);
    assert!(!VerbosityChecker::default().check_profile(&profile).is_empty());

    let relaxed = VerbosityProfile::from_yaml(
        r#"
name: relaxed@1.0
long:
  min_keyframes: 3
  min_notes: 1
  min_summary_chars: 80
critical_roles: []
micro:
  roles: []
  comedic_devices: []
"#,
    )
    .unwrap();
    let violations = VerbosityChecker::new(relaxed).check_profile(&profile);
    assert!(violations.is_empty(), "{:?}", violations);
}
