//! Integration tests for the normalization pass: mention merging and
//! idempotence over the workspace sample.

use serde_json::{json, Value};
use vdp_core::{MentionSource, Profile, PromotionStatus};
use vdp_normalize::{normalize, WarningKind};

fn sample() -> Value {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let text = std::fs::read_to_string(workspace_root.join("fixtures/sample_vdp.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn acme(evidence: &[&str], sources: &[&str], status: &str) -> Value {
    json!({
        "type": "product",
        "name": "Acme",
        "sources": sources,
        "evidence": evidence,
        "promotion": { "status": status, "signals": [] },
        "confidence": "medium"
    })
}

#[test]
fn test_duplicate_acme_is_merged() {
    let mut candidate = sample();
    candidate["product_mentions"] = json!([
        acme(&["Acme mug on the counter"], &["visual"], "organic"),
        candidate["product_mentions"][0].clone(),
        acme(&["Host says \"thanks Acme\""], &["asr"], "paid"),
    ]);
    let profile: Profile = serde_json::from_value(candidate).unwrap();

    let outcome = normalize(&profile).unwrap();
    let mentions = &outcome.profile.product_mentions;
    assert_eq!(mentions.len(), 2);

    let acme = mentions.iter().find(|m| m.name == "Acme").unwrap();
    assert_eq!(acme.evidence, vec!["Acme mug on the counter", "Host says \"thanks Acme\""]);
    assert_eq!(acme.sources, vec![MentionSource::Visual, MentionSource::Asr]);
    assert_eq!(acme.promotion.status, PromotionStatus::Paid);
    assert_eq!(mentions[0].name, "Acme");
    assert_eq!(mentions[1].name, "Jinro Soju");

    assert!(outcome.warnings.iter().any(|w| w.kind == WarningKind::DuplicateMentionMerged));
}

#[test]
fn test_product_filed_under_services_merges_with_its_twin() {
    let mut candidate = sample();
    candidate["product_mentions"] = json!([acme(&["Acme mug on the counter"], &["visual"], "organic")]);
    candidate["service_mentions"] = json!([acme(&["Acme logo on the apron"], &["ocr"], "unknown")]);
    let profile: Profile = serde_json::from_value(candidate).unwrap();

    let outcome = normalize(&profile).unwrap();
    let products = &outcome.profile.product_mentions;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].evidence, vec!["Acme mug on the counter", "Acme logo on the apron"]);
    assert!(outcome.profile.service_mentions.is_empty());

    let kinds: Vec<_> = outcome.warnings.iter().map(|w| w.kind).collect();
    assert!(kinds.contains(&WarningKind::MentionTypeMismatch));
    assert!(kinds.contains(&WarningKind::DuplicateMentionMerged));

    let again = normalize(&outcome.profile).unwrap();
    assert_eq!(again.profile, outcome.profile);
    assert!(again.warnings.is_empty(), "{:?}", again.warnings);
}

#[test]
fn test_status_precedence_across_group() {
    let statuses = ["unknown", "organic", "affiliate", "gifted", "paid"];
    for (i, strongest) in statuses.iter().enumerate() {
        let mut candidate = sample();
        let group: Vec<Value> = statuses[..=i].iter().rev().map(|s| acme(&["seen"], &["ocr"], s)).collect();
        candidate["product_mentions"] = Value::Array(group);
        let profile: Profile = serde_json::from_value(candidate).unwrap();

        let merged = normalize(&profile).unwrap().profile.product_mentions;
        assert_eq!(merged.len(), 1);
        assert_eq!(
            serde_json::to_value(merged[0].promotion.status).unwrap(),
            json!(strongest),
            "group of {} statuses",
            i + 1
        );
    }
}

#[test]
fn test_normalization_is_idempotent() {
    let mut candidate = sample();
    candidate["product_mentions"] = json!([
        acme(&["a"], &["asr"], "gifted"),
        acme(&["b"], &["ocr"], "organic"),
    ]);
    candidate["scenes"][0]["narrative_unit"]
        .as_object_mut()
        .unwrap()
        .remove("dialogue_lang");
    candidate["overall_analysis"]["ocr_text"][0]["lang"] = Value::Null;
    candidate["scenes"][2]["narrative_unit"]["summary"] = json!("사장님이 국밥을 먹는다");
    let profile: Profile = serde_json::from_value(candidate).unwrap();

    let once = normalize(&profile).unwrap();
    let twice = normalize(&once.profile).unwrap();
    assert_eq!(once.profile, twice.profile);
    assert!(!once.warnings.is_empty());

    // Only the non-English summary is still worth reporting
    let kinds: Vec<_> = twice.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::NonEnglishText]);
}

#[test]
fn test_comments_are_never_altered() {
    let profile: Profile = serde_json::from_value(sample()).unwrap();
    let outcome = normalize(&profile).unwrap();
    assert_eq!(
        outcome.profile.overall_analysis.audience_reaction.notable_comments,
        profile.overall_analysis.audience_reaction.notable_comments
    );
}
