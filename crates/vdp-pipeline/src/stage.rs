//! Stage Trait: one contract for every pipeline step
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use vdp_core::{ExecutionContext, Profile, ValidationError, VdpError, Violation};
use vdp_normalize::NormalizationWarning;
use vdp_repair::{ConfidenceOverride, QaFlag, RepairAction, RepairPasses};

/// A pipeline step over the shared [`PipelineState`].
pub trait Stage: Send + Sync {
    /// Unique stage id (e.g. "temporal.check.v1")
    fn id(&self) -> &'static str;

    /// Whether the same input always yields the same output (default: true)
    fn deterministic(&self) -> bool {
        true
    }

    /// Run the stage. Returning `StageError::Rejected` stops the pipeline.
    fn run(&self, state: &mut PipelineState, ctx: &ExecutionContext) -> Result<StageVerdict, StageError>;
}

/// What a stage did to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageVerdict {
    /// Checked, nothing to change
    Pass,
    /// Record changed
    Modified,
    /// Record changed or kept, with unresolved issues demoted to flags
    Flagged,
}

impl StageVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageVerdict::Pass => "pass",
            StageVerdict::Modified => "modified",
            StageVerdict::Flagged => "flagged",
        }
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    /// Fatal violations; carries the complete list
    #[error("{0}")]
    Rejected(ValidationError),

    /// An earlier stage did not leave what this one needs
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] VdpError),
}

impl StageError {
    pub fn rejected(stage: &str, violations: Vec<Violation>) -> Self {
        StageError::Rejected(ValidationError::new(stage, violations))
    }

    /// Fold into the workspace error, tagging non-validation failures with
    /// the stage id.
    pub fn into_vdp(self, stage: &str) -> VdpError {
        match self {
            StageError::Rejected(e) => VdpError::Validation(e),
            StageError::Core(e) => e,
            other => VdpError::Stage(format!("{}: {}", stage, other)),
        }
    }
}

/// Everything the stages read and write during one run. The untyped
/// candidate becomes a typed profile once the overrides stage has run.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub candidate: Value,
    pub profile: Option<Profile>,
    pub qa_flags: Vec<QaFlag>,
    pub warnings: Vec<NormalizationWarning>,
    pub repairs: Vec<RepairAction>,
    pub confidence_overrides: Vec<ConfidenceOverride>,
    pub passes: RepairPasses,
}

impl PipelineState {
    pub fn new(candidate: Value) -> Self {
        Self { candidate, ..Default::default() }
    }

    pub fn profile(&self) -> Result<&Profile, StageError> {
        self.profile.as_ref().ok_or(StageError::MissingInput("typed profile"))
    }

    /// Canonical bytes of the current record, typed if available.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, StageError> {
        Ok(match &self.profile {
            Some(profile) => serde_json::to_vec(profile)?,
            None => serde_json::to_vec(&self.candidate)?,
        })
    }
}
