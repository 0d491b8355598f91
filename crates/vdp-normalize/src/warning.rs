//! Normalization warnings: reported, never blocking.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// Non-Latin script in an English-normalized field
    NonEnglishText,
    /// Preserve-original text without a language tag; `und` was filled in
    MissingLanguageTag,
    MalformedLanguageTag,
    /// Rhetoric or comedic-device token that is not snake_case
    NonSnakeCaseToken,
    /// Mention time range whose start is after its end
    InvalidTimeRange,
    /// Mention whose `type` disagrees with the list holding it
    MentionTypeMismatch,
    /// Duplicate `(type, name)` mentions folded into one item
    DuplicateMentionMerged,
    InvalidUploadDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationWarning {
    pub kind: WarningKind,
    pub path: String,
    pub message: String,
}

impl NormalizationWarning {
    pub fn new(kind: WarningKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, path: path.into(), message: message.into() }
    }
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.kind, self.path, self.message)
    }
}
