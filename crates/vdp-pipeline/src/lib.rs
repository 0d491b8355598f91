//! VDP Pipeline: staged acceptance of candidate profiles
//!
//! Chains the checkers, the repair engine and the normalization pass into
//! one run over a candidate. Every stage leaves a [`StageProof`]; the first
//! fatal stage ends the run with its complete violation list.
//!
//! # Example
//!
//! ```ignore
//! use vdp_core::{CallerOverrides, ExecutionContext};
//! use vdp_pipeline::ProfilePipeline;
//!
//! let pipeline = ProfilePipeline::strict();
//! let ctx = ExecutionContext::new(CallerOverrides::new("000123"));
//! match pipeline.run(candidate, &ctx) {
//!     Ok(accepted) => println!("{} qa flags", accepted.qa_flags.len()),
//!     Err(e) => eprintln!("{} violations", e.violations().len()),
//! }
//! ```

pub mod runner;
pub mod stage;
pub mod stages;

pub use runner::{hash_bytes, PipelineRunner, StageProof};
pub use stage::{PipelineState, Stage, StageError, StageVerdict};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use vdp_checks::VerbosityProfile;
use vdp_core::{ExecutionContext, Profile, VdpError};
use vdp_normalize::NormalizationWarning;
use vdp_repair::{ConfidenceOverride, QaFlag, RepairAction, RepairEngine, RepairPasses};

/// An accepted profile and everything the run found along the way.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedProfile {
    pub profile: Profile,
    pub qa_flags: Vec<QaFlag>,
    pub warnings: Vec<NormalizationWarning>,
    pub repairs: Vec<RepairAction>,
    pub confidence_overrides: Vec<ConfidenceOverride>,
    pub passes: RepairPasses,
    pub proofs: Vec<StageProof>,
    pub trace_id: String,
    /// Verbosity profile the run was checked against
    pub verbosity_profile: String,
    pub accepted_at: DateTime<Utc>,
}

impl AcceptedProfile {
    /// True when the record needed no repair and left no flags
    pub fn is_clean(&self) -> bool {
        self.repairs.is_empty() && self.qa_flags.is_empty()
    }
}

pub struct ProfilePipeline {
    runner: PipelineRunner,
    verbosity_profile: String,
}

impl Default for ProfilePipeline {
    fn default() -> Self {
        Self::strict()
    }
}

impl ProfilePipeline {
    pub fn strict() -> Self {
        Self::new(VerbosityProfile::strict())
    }

    pub fn new(profile: VerbosityProfile) -> Self {
        Self::with_engine(RepairEngine::new(profile))
    }

    /// Build around a configured engine (custom repair policy, for instance).
    pub fn with_engine(engine: RepairEngine) -> Self {
        let verbosity_profile = engine.checker().profile().name.clone();
        let runner = PipelineRunner::new(vec![
            Box::new(stages::StructuralStage),
            Box::new(stages::OverridesStage),
            Box::new(stages::TemporalStage),
            Box::new(stages::DetailFloorStage::new(engine)),
            Box::new(stages::NormalizeStage),
        ]);
        Self { runner, verbosity_profile }
    }

    pub fn pipeline_id(&self) -> &str {
        self.runner.pipeline_id()
    }

    pub fn verbosity_profile(&self) -> &str {
        &self.verbosity_profile
    }

    /// Validate, repair and normalize one candidate. A context that asks for
    /// a different verbosity profile than this pipeline runs is refused
    /// before any stage.
    pub fn run(&self, candidate: Value, ctx: &ExecutionContext) -> Result<AcceptedProfile, VdpError> {
        if let Some(wanted) = ctx.profile.as_deref() {
            if wanted != self.verbosity_profile {
                return Err(VdpError::Config(format!(
                    "requested verbosity profile {} but pipeline runs {}",
                    wanted, self.verbosity_profile
                )));
            }
        }

        let mut state = PipelineState::new(candidate);
        let proofs = self.runner.run(&mut state, ctx)?;

        let profile = state
            .profile
            .ok_or_else(|| VdpError::Stage("pipeline finished without a typed profile".into()))?;

        info!(
            trace_id = %ctx.trace_id,
            content_id = %profile.content_id,
            repairs = state.repairs.len(),
            qa_flags = state.qa_flags.len(),
            warnings = state.warnings.len(),
            "profile accepted"
        );

        Ok(AcceptedProfile {
            profile,
            qa_flags: state.qa_flags,
            warnings: state.warnings,
            repairs: state.repairs,
            confidence_overrides: state.confidence_overrides,
            passes: state.passes,
            proofs,
            trace_id: ctx.trace_id.clone(),
            verbosity_profile: self.verbosity_profile.clone(),
            accepted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdp_core::CallerOverrides;

    fn sample() -> Value {
        serde_json::from_str(include_str!("../../../fixtures/sample_vdp.json")).unwrap()
    }

    #[test]
    fn test_pipeline_id() {
        let pipeline = ProfilePipeline::strict();
        assert_eq!(pipeline.pipeline_id(), "structural→overrides→temporal→detail_floor→normalize");
        assert_eq!(pipeline.verbosity_profile(), "strict@1.0");
    }

    #[test]
    fn test_compliant_sample_is_accepted_untouched() {
        let candidate = sample();
        let ctx = ExecutionContext::new(CallerOverrides::new("C0001"));
        let accepted = ProfilePipeline::strict().run(candidate.clone(), &ctx).unwrap();

        assert!(accepted.is_clean());
        assert_eq!(accepted.passes.total(), 0);
        assert!(accepted.warnings.is_empty());
        let original: Profile = serde_json::from_value(candidate).unwrap();
        assert_eq!(accepted.profile, original);
        assert_eq!(accepted.trace_id, ctx.trace_id);
    }

    #[test]
    fn test_requested_profile_must_match() {
        let pipeline = ProfilePipeline::strict();
        let ctx = ExecutionContext::new(CallerOverrides::new("C0001"));

        let accepted = pipeline.run(sample(), &ctx.clone().with_profile("strict@1.0")).unwrap();
        assert_eq!(accepted.verbosity_profile, "strict@1.0");

        let err = pipeline.run(sample(), &ctx.with_profile("relaxed@1.0")).unwrap_err();
        assert!(matches!(err, VdpError::Config(_)));
        assert!(err.to_string().starts_with("CONFIG/requested verbosity profile relaxed@1.0"));
        assert!(err.violations().is_empty());
    }
}
