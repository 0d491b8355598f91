//! VDP Normalize: language policy and mention deduplication
//!
//! Last step before a profile is accepted. Nothing here blocks acceptance:
//! problems become [`NormalizationWarning`]s. The pass is idempotent, so
//! normalizing an accepted profile again returns it unchanged.
//!
//! - English-normalized fields are scanned for non-Latin script (reported,
//!   never translated)
//! - Preserve-original text keeps its wording and gets a BCP-47 tag, `und`
//!   when unknown
//! - Mentions are merged by `(type, name)` across both lists and filed
//!   under the list matching their type

pub mod language;
pub mod mentions;
pub mod warning;

pub use language::{has_non_latin_script, UNDETERMINED};
pub use mentions::merge_mentions;
pub use warning::{NormalizationWarning, WarningKind};

use chrono::DateTime;
use tracing::debug;
use vdp_core::schema::is_snake_case;
use vdp_core::{Profile, VdpError};

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationOutcome {
    pub profile: Profile,
    pub warnings: Vec<NormalizationWarning>,
}

/// Normalize a structurally valid profile.
pub fn normalize(profile: &Profile) -> Result<NormalizationOutcome, VdpError> {
    let mut warnings = Vec::new();

    if DateTime::parse_from_rfc3339(&profile.metadata.upload_date).is_err() {
        warnings.push(NormalizationWarning::new(
            WarningKind::InvalidUploadDate,
            "metadata.upload_date",
            format!("{:?} is not an RFC 3339 timestamp", profile.metadata.upload_date),
        ));
    }

    let mut root = serde_json::to_value(profile)?;
    language::enforce(&mut root, &mut warnings);
    let mut normalized: Profile = serde_json::from_value(root)?;

    check_tokens(&normalized, &mut warnings);

    let (products, services) =
        mentions::normalize_lists(&normalized.product_mentions, &normalized.service_mentions, &mut warnings);
    normalized.product_mentions = products;
    normalized.service_mentions = services;

    debug!(warnings = warnings.len(), "normalization finished");
    Ok(NormalizationOutcome { profile: normalized, warnings })
}

fn check_tokens(profile: &Profile, warnings: &mut Vec<NormalizationWarning>) {
    for (i, scene) in profile.scenes.iter().enumerate() {
        let unit = &scene.narrative_unit;
        let lists = [("rhetoric", &unit.rhetoric), ("comedic_device", &unit.comedic_device)];
        for (name, tokens) in lists {
            for (j, token) in tokens.iter().enumerate() {
                if !is_snake_case(token) {
                    warnings.push(NormalizationWarning::new(
                        WarningKind::NonSnakeCaseToken,
                        format!("scenes[{}].narrative_unit.{}[{}]", i, name, j),
                        format!("{:?} is not snake_case", token),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        serde_json::from_str(include_str!("../../../fixtures/sample_vdp.json")).unwrap()
    }

    #[test]
    fn test_sample_is_already_normal() {
        let profile = sample();
        let outcome = normalize(&profile).unwrap();
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
        assert_eq!(outcome.profile, profile);
    }

    #[test]
    fn test_token_and_date_warnings() {
        let mut profile = sample();
        profile.metadata.upload_date = "last Tuesday".into();
        profile.scenes[0].narrative_unit.rhetoric.push("Rule of Three".into());

        let outcome = normalize(&profile).unwrap();
        let kinds: Vec<_> = outcome.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::InvalidUploadDate, WarningKind::NonSnakeCaseToken]);
        assert_eq!(outcome.warnings[1].path, "scenes[0].narrative_unit.rhetoric[1]");
        assert_eq!(outcome.profile.scenes[0].narrative_unit.rhetoric[1], "Rule of Three");
    }

    #[test]
    fn test_missing_tags_filled_once() {
        let mut profile = sample();
        profile.scenes[1].narrative_unit.dialogue_lang = None;

        let first = normalize(&profile).unwrap();
        assert_eq!(first.profile.scenes[1].narrative_unit.dialogue_lang.as_deref(), Some("und"));
        assert_eq!(first.warnings.len(), 1);

        let second = normalize(&first.profile).unwrap();
        assert!(second.warnings.is_empty());
        assert_eq!(second.profile, first.profile);
    }
}
