//! Language policy enforcement
//!
//! Driven entirely by the language tags of the schema: English-normalized
//! fields are scanned for non-Latin script, preserve-original fields get
//! their sibling tag checked (and `und` filled when absent). Text is never
//! rewritten.
//!
//! Detection is by script only. Non-English text written in Latin script
//! (Spanish, Vietnamese, romanized Korean) passes unreported; catching it
//! would need a language identifier, which this crate does not carry.

use crate::warning::{NormalizationWarning, WarningKind};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use vdp_core::schema::{is_bcp47, FieldSpec, FieldType, LangPolicy, PROFILE_FIELDS};

/// Tag used when the source language is genuinely unknown
pub const UNDETERMINED: &str = "und";

lazy_static! {
    /// Scripts that cannot be English text
    static ref NON_LATIN: Regex = Regex::new(
        r"[\p{Hangul}\p{Han}\p{Hiragana}\p{Katakana}\p{Cyrillic}\p{Arabic}\p{Hebrew}\p{Thai}\p{Devanagari}\p{Greek}]"
    )
    .unwrap();
}

/// Whether `text` contains characters from a non-Latin script.
pub fn has_non_latin_script(text: &str) -> bool {
    NON_LATIN.is_match(text)
}

/// Apply the language policy to a serialized profile in place.
pub fn enforce(root: &mut Value, warnings: &mut Vec<NormalizationWarning>) {
    if let Some(object) = root.as_object_mut() {
        walk(PROFILE_FIELDS, object, "", warnings);
    }
    if let Some(tag) = root.get("default_lang").and_then(Value::as_str) {
        if !is_bcp47(tag) {
            warnings.push(malformed("default_lang", tag));
        }
    }
}

fn walk(fields: &'static [FieldSpec], object: &mut Map<String, Value>, prefix: &str, warnings: &mut Vec<NormalizationWarning>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        match field.lang {
            LangPolicy::EnglishNormalized => {
                if let Some(value) = object.get(field.name) {
                    check_english(value, &path, warnings);
                }
            }
            LangPolicy::PreserveOriginal { tag } => {
                let present = object.get(field.name).is_some_and(|v| !v.is_null());
                if present {
                    check_tag(object, tag, &path, prefix, warnings);
                }
            }
            LangPolicy::Unspecified => {}
        }

        let Some(value) = object.get_mut(field.name) else {
            continue;
        };
        descend(&field.ty, value, &path, warnings);
    }
}

fn descend(ty: &FieldType, value: &mut Value, path: &str, warnings: &mut Vec<NormalizationWarning>) {
    match ty {
        FieldType::Object(fields) => {
            if let Some(object) = value.as_object_mut() {
                walk(fields, object, path, warnings);
            }
        }
        FieldType::Array(spec) => {
            if let Some(items) = value.as_array_mut() {
                for (i, item) in items.iter_mut().enumerate() {
                    descend(&spec.items, item, &format!("{}[{}]", path, i), warnings);
                }
            }
        }
        _ => {}
    }
}

fn check_english(value: &Value, path: &str, warnings: &mut Vec<NormalizationWarning>) {
    match value {
        Value::String(text) if has_non_latin_script(text) => warnings.push(NormalizationWarning::new(
            WarningKind::NonEnglishText,
            path,
            format!("expected English, found non-Latin script in {:?}", text),
        )),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_english(item, &format!("{}[{}]", path, i), warnings);
            }
        }
        _ => {}
    }
}

fn check_tag(
    object: &mut Map<String, Value>,
    tag: &str,
    text_path: &str,
    prefix: &str,
    warnings: &mut Vec<NormalizationWarning>,
) {
    let tag_path = if prefix.is_empty() {
        tag.to_string()
    } else {
        format!("{}.{}", prefix, tag)
    };

    match object.get(tag) {
        Some(Value::String(value)) if is_bcp47(value) => {}
        Some(Value::String(value)) => warnings.push(malformed(&tag_path, value)),
        _ => {
            object.insert(tag.to_string(), Value::String(UNDETERMINED.to_string()));
            warnings.push(NormalizationWarning::new(
                WarningKind::MissingLanguageTag,
                tag_path,
                format!("{} has no language tag; set to \"{}\"", text_path, UNDETERMINED),
            ));
        }
    }
}

fn malformed(path: &str, tag: &str) -> NormalizationWarning {
    NormalizationWarning::new(
        WarningKind::MalformedLanguageTag,
        path,
        format!("{:?} is not a BCP-47 language tag", tag),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        serde_json::from_str(include_str!("../../../fixtures/sample_vdp.json")).unwrap()
    }

    #[test]
    fn test_script_detection() {
        assert!(has_non_latin_script("사장님 표정"));
        assert!(has_non_latin_script("Привет"));
        assert!(has_non_latin_script("ラーメン"));
        assert!(!has_non_latin_script("Café crème, naïve"));
        assert!(!has_non_latin_script("#gukbap 8,000 won"));
    }

    #[test]
    fn test_sample_has_no_language_warnings() {
        let mut root = sample();
        let before = root.clone();
        let mut warnings = Vec::new();
        enforce(&mut root, &mut warnings);
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(root, before);
    }

    #[test]
    fn test_non_english_fields_are_reported_not_rewritten() {
        let mut root = sample();
        root["scenes"][1]["narrative_unit"]["summary"] = json!("손님이 기다린다");
        root["metadata"]["hashtags"][1] = json!("#먹방");
        let mut warnings = Vec::new();
        enforce(&mut root, &mut warnings);

        let paths: Vec<_> = warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["metadata.hashtags[1]", "scenes[1].narrative_unit.summary"]);
        assert!(warnings.iter().all(|w| w.kind == WarningKind::NonEnglishText));
        assert_eq!(root["scenes"][1]["narrative_unit"]["summary"], "손님이 기다린다");
    }

    #[test]
    fn test_latin_script_foreign_text_is_not_detected() {
        assert!(!has_non_latin_script("El cliente espera al dueño"));
        assert!(!has_non_latin_script("Khách hàng đang chờ"));
        assert!(has_non_latin_script("Ждёт хозяина"));
    }

    #[test]
    fn test_preserved_text_is_untouched_and_tagged() {
        let mut root = sample();
        let comment = &mut root["overall_analysis"]["audience_reaction"]["notable_comments"][0];
        comment.as_object_mut().unwrap().remove("lang");
        root["scenes"][1]["narrative_unit"]["dialogue_lang"] = json!("Korean");

        let mut warnings = Vec::new();
        enforce(&mut root, &mut warnings);

        let comment = &root["overall_analysis"]["audience_reaction"]["notable_comments"][0];
        assert_eq!(comment["lang"], "und");
        assert_eq!(comment["text"], "사장님 표정 미쳤다 ㅋㅋㅋ");

        let kinds: Vec<_> = warnings.iter().map(|w| (w.kind, w.path.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (WarningKind::MissingLanguageTag, "overall_analysis.audience_reaction.notable_comments[0].lang"),
                (WarningKind::MalformedLanguageTag, "scenes[1].narrative_unit.dialogue_lang"),
            ]
        );
    }

    #[test]
    fn test_absent_optional_text_needs_no_tag() {
        let mut root = sample();
        let analysis = root["overall_analysis"].as_object_mut().unwrap();
        analysis.remove("asr_transcript");
        analysis.remove("asr_lang");

        let mut warnings = Vec::new();
        enforce(&mut root, &mut warnings);
        assert!(warnings.is_empty());
        assert!(root["overall_analysis"].get("asr_lang").is_none());
    }
}
