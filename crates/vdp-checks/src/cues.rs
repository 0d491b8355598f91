//! Lexical cue detection for scene summaries and keyframe descriptions.
//!
//! Purely keyword based. Single-word keywords match whole tokens with a few
//! inflections (`pan` matches `pans`, `panning`); keywords containing spaces
//! or punctuation match as substrings.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use vdp_core::{Scene, SummaryCue};

lazy_static! {
    /// Explicit timestamps such as `12s`, `3.5 sec`, `15.0 seconds`
    static ref SECONDS: Regex = Regex::new(r"(?i)\b\d+(\.\d+)?\s?(s|sec|secs|seconds)\b").unwrap();
}

const INFLECTIONS: &[&str] = &["s", "es", "ed", "ing", "ning", "ned", "ped", "ping", "d"];

/// Minimum length of a `setting.location` word to count as a location cue.
const LOCATION_WORD_MIN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueLexicon {
    pub camera: Vec<String>,
    pub location_time: Vec<String>,
    pub lighting: Vec<String>,
    pub audio_mood: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for CueLexicon {
    fn default() -> Self {
        Self {
            camera: words(&[
                "camera", "static", "pan", "tilt", "dolly", "truck", "handheld", "crane", "zoom", "tracking",
                "close-up", "close up", "closeup", "wide shot", "medium shot", "push-in", "pull-back", "framing",
                "framed", "angle", "shot",
            ]),
            location_time: words(&[
                "set in", "inside", "outside", "indoors", "outdoors", "at night", "night", "morning", "afternoon",
                "evening", "daytime", "later", "meanwhile", "moments later", "kitchen", "street", "room", "office",
                "restaurant", "car", "home",
            ]),
            lighting: words(&[
                "light", "lighting", "lit", "glow", "shadow", "bright", "dim", "dark", "neon", "sunlight",
                "fluorescent",
            ]),
            audio_mood: words(&[
                "music", "sound", "audio", "silence", "silent", "tone", "voice", "sfx", "laugh", "laughter", "beat",
                "mood",
            ]),
        }
    }
}

impl CueLexicon {
    pub fn keywords(&self, cue: SummaryCue) -> &[String] {
        match cue {
            SummaryCue::CameraMovement => &self.camera,
            SummaryCue::LocationTime => &self.location_time,
            SummaryCue::Lighting => &self.lighting,
            SummaryCue::AudioMood => &self.audio_mood,
        }
    }

    /// Whether `text` mentions `cue`. Location/time also accepts an explicit
    /// timestamp or a word taken from the scene's own location.
    pub fn mentions(&self, cue: SummaryCue, text: &str, scene: &Scene) -> bool {
        if contains_any(text, self.keywords(cue)) {
            return true;
        }
        if cue == SummaryCue::LocationTime {
            if SECONDS.is_match(text) {
                return true;
            }
            let tokens = tokenize(text);
            return tokenize(&scene.setting.location)
                .iter()
                .filter(|w| w.chars().count() >= LOCATION_WORD_MIN)
                .any(|w| tokens.contains(w));
        }
        false
    }

    /// Cues from `wanted` that the scene summary does not mention.
    pub fn missing(&self, wanted: &[SummaryCue], scene: &Scene) -> Vec<SummaryCue> {
        wanted
            .iter()
            .copied()
            .filter(|cue| !self.mentions(*cue, &scene.narrative_unit.summary, scene))
            .collect()
    }
}

/// Lowercase alphanumeric tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn token_matches(token: &str, keyword: &str) -> bool {
    token == keyword
        || token
            .strip_prefix(keyword)
            .is_some_and(|rest| INFLECTIONS.contains(&rest))
}

/// Whether `text` contains any of `keywords` under the matching rules above.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    let tokens = tokenize(text);
    keywords.iter().any(|kw| {
        let kw = kw.to_lowercase();
        if kw.chars().all(char::is_alphanumeric) {
            tokens.iter().any(|t| token_matches(t, &kw))
        } else {
            lower.contains(&kw)
        }
    })
}

/// Whether a free-text role label carries any of the role tokens
/// (`"Setup & Punchline"` carries `punchline`).
pub fn role_matches(role_label: &str, roles: &[String]) -> bool {
    let tokens = tokenize(role_label);
    roles.iter().any(|r| tokens.contains(&r.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflected_tokens() {
        let kws = words(&["pan", "zoom"]);
        assert!(contains_any("The camera pans left", &kws));
        assert!(contains_any("slow zooming in", &kws));
        assert!(!contains_any("a company logo appears", &kws));
        assert!(!contains_any("panic sets in", &kws));
    }

    #[test]
    fn test_phrase_keywords() {
        let kws = words(&["close-up", "at night"]);
        assert!(contains_any("An extreme Close-Up of the hand", &kws));
        assert!(contains_any("Later, at night, he returns", &kws));
        assert!(!contains_any("close the door", &kws));
    }

    #[test]
    fn test_role_matching() {
        let roles = words(&["hook", "punchline", "cta"]);
        assert!(role_matches("Setup & Punchline", &roles));
        assert!(role_matches("CTA", &roles));
        assert!(role_matches("Hook", &roles));
        assert!(!role_matches("Setup", &roles));
        assert!(!role_matches("Hooked audience", &roles));
    }
}
