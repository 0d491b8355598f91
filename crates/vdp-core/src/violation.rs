//! Violation types for profile validation
//!
//! Every checker reports `Violation`s. The kind decides routing: structural
//! and temporal kinds are fatal, detail-floor kinds go to the repair engine.

use crate::data_model::KeyframeRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every violation the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationKind {
    // === Structural ===
    MissingRequiredField,
    TypeMismatch,
    EnumViolation,
    NullabilityViolation,
    PatternMismatch,
    CardinalityViolation,
    OutOfRange,
    DuplicateIdentifier,

    // === Temporal ===
    SceneOrderViolation,
    GapOrOverlapViolation,
    ShotBoundsViolation,
    DurationMismatchViolation,
    InvalidInterval,

    // === Detail floor ===
    KeyframeFloorViolation,
    NoteFloorViolation,
    SummaryLengthViolation,
    ClosureKeyframeMissing,
    ImportanceMismatch,
}

/// Broad class of a violation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationClass {
    Structural,
    Temporal,
    DetailFloor,
}

impl ViolationKind {
    pub fn class(&self) -> ViolationClass {
        use ViolationKind::*;
        match self {
            MissingRequiredField | TypeMismatch | EnumViolation | NullabilityViolation | PatternMismatch
            | CardinalityViolation | OutOfRange | DuplicateIdentifier => ViolationClass::Structural,
            SceneOrderViolation | GapOrOverlapViolation | ShotBoundsViolation | DurationMismatchViolation
            | InvalidInterval => ViolationClass::Temporal,
            KeyframeFloorViolation | NoteFloorViolation | SummaryLengthViolation | ClosureKeyframeMissing
            | ImportanceMismatch => ViolationClass::DetailFloor,
        }
    }

    /// Fatal kinds abort acceptance; they are never repaired.
    pub fn is_fatal(&self) -> bool {
        self.class() != ViolationClass::DetailFloor
    }

    pub fn is_auto_fixable(&self) -> bool {
        self.class() == ViolationClass::DetailFloor
    }

    pub fn as_str(&self) -> &'static str {
        use ViolationKind::*;
        match self {
            MissingRequiredField => "MissingRequiredField",
            TypeMismatch => "TypeMismatch",
            EnumViolation => "EnumViolation",
            NullabilityViolation => "NullabilityViolation",
            PatternMismatch => "PatternMismatch",
            CardinalityViolation => "CardinalityViolation",
            OutOfRange => "OutOfRange",
            DuplicateIdentifier => "DuplicateIdentifier",
            SceneOrderViolation => "SceneOrderViolation",
            GapOrOverlapViolation => "GapOrOverlapViolation",
            ShotBoundsViolation => "ShotBoundsViolation",
            DurationMismatchViolation => "DurationMismatchViolation",
            InvalidInterval => "InvalidInterval",
            KeyframeFloorViolation => "KeyframeFloorViolation",
            NoteFloorViolation => "NoteFloorViolation",
            SummaryLengthViolation => "SummaryLengthViolation",
            ClosureKeyframeMissing => "ClosureKeyframeMissing",
            ImportanceMismatch => "ImportanceMismatch",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cue a scene summary is expected to mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryCue {
    CameraMovement,
    LocationTime,
    Lighting,
    AudioMood,
}

impl SummaryCue {
    /// Order in which cues are appended when a summary falls short.
    pub const ALL: [SummaryCue; 4] =
        [SummaryCue::CameraMovement, SummaryCue::LocationTime, SummaryCue::Lighting, SummaryCue::AudioMood];
}

impl fmt::Display for SummaryCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SummaryCue::CameraMovement => write!(f, "camera movement"),
            SummaryCue::LocationTime => write!(f, "location/time cue"),
            SummaryCue::Lighting => write!(f, "lighting"),
            SummaryCue::AudioMood => write!(f, "audio/mood"),
        }
    }
}

/// Measured shortfall attached to detail-floor violations so the repair
/// engine does not re-derive the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "floor", rename_all = "snake_case")]
pub enum FloorDetail {
    Keyframes {
        required: usize,
        actual: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        missing_roles: Vec<KeyframeRole>,
    },
    Notes {
        required: usize,
        actual: usize,
    },
    Summary {
        required_chars: usize,
        actual_chars: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        missing_cues: Vec<SummaryCue>,
    },
}

/// A single violation with its field path and expected/actual description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Field path, e.g. `scenes[0].shots[1].camera.shot`
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Scene index, when the violation is scoped to a scene
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<usize>,
    /// Shot index within `scene`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<FloorDetail>,
}

impl Violation {
    pub fn new(kind: ViolationKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
            expected: None,
            actual: None,
            scene: None,
            shot: None,
            detail: None,
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn in_scene(mut self, scene: usize) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn in_shot(mut self, scene: usize, shot: usize) -> Self {
        self.scene = Some(scene);
        self.shot = Some(shot);
        self
    }

    pub fn with_detail(mut self, detail: FloorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.message)?;
        match (&self.expected, &self.actual) {
            (Some(e), Some(a)) => write!(f, " (expected {}, got {})", e, a),
            (Some(e), None) => write!(f, " (expected {})", e),
            (None, Some(a)) => write!(f, " (got {})", a),
            (None, None) => Ok(()),
        }
    }
}

/// Outcome of a validation pass: `ok` is true when no violation was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self { ok: violations.is_empty(), violations }
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.count(kind) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_routing() {
        assert!(ViolationKind::EnumViolation.is_fatal());
        assert!(ViolationKind::GapOrOverlapViolation.is_fatal());
        assert!(ViolationKind::KeyframeFloorViolation.is_auto_fixable());
        assert!(!ViolationKind::ShotBoundsViolation.is_auto_fixable());
        assert_eq!(ViolationKind::ClosureKeyframeMissing.class(), ViolationClass::DetailFloor);
    }

    #[test]
    fn test_violation_builder() {
        let violation = Violation::new(ViolationKind::EnumViolation, "scenes[0].shots[0].camera.shot", "value outside enum")
            .expected("one of ECU|CU")
            .actual("\"ULTRA_WIDE\"")
            .in_shot(0, 0);

        assert_eq!(violation.scene, Some(0));
        assert_eq!(violation.shot, Some(0));
        let text = violation.to_string();
        assert!(text.starts_with("EnumViolation at scenes[0].shots[0].camera.shot"));
        assert!(text.contains("ULTRA_WIDE"));
    }

    #[test]
    fn test_violation_serialization() {
        let violation = Violation::new(ViolationKind::KeyframeFloorViolation, "scenes[0]", "too few keyframes")
            .in_scene(0)
            .with_detail(FloorDetail::Keyframes { required: 4, actual: 2, missing_roles: vec![] });

        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["kind"], "KeyframeFloorViolation");
        assert_eq!(json["detail"]["floor"], "keyframes");
        assert!(json.get("shot").is_none());

        let parsed: Violation = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, violation);
    }

    #[test]
    fn test_result_counts() {
        let result = ValidationResult::from_violations(vec![
            Violation::new(ViolationKind::TypeMismatch, "a", "x"),
            Violation::new(ViolationKind::TypeMismatch, "b", "y"),
        ]);
        assert!(!result.ok);
        assert_eq!(result.count(ViolationKind::TypeMismatch), 2);
        assert!(!result.has(ViolationKind::EnumViolation));
    }
}
