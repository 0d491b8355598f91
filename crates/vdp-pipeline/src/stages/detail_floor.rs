use crate::stage::{PipelineState, Stage, StageError, StageVerdict};
use tracing::{debug, warn};
use vdp_core::ExecutionContext;
use vdp_repair::RepairEngine;

/// Checks the detail floors and repairs what it can within the pass
/// budget. Leftovers become qa flags and confidence downgrades.
pub struct DetailFloorStage {
    engine: RepairEngine,
}

impl DetailFloorStage {
    pub fn new(engine: RepairEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RepairEngine {
        &self.engine
    }
}

impl Default for DetailFloorStage {
    fn default() -> Self {
        Self::new(RepairEngine::default())
    }
}

impl Stage for DetailFloorStage {
    fn id(&self) -> &'static str {
        "detail_floor.repair.v1"
    }

    fn run(&self, state: &mut PipelineState, ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
        let profile = state.profile()?;
        let violations = self.engine.checker().check_profile(profile);
        if violations.is_empty() {
            return Ok(StageVerdict::Pass);
        }

        debug!(trace_id = %ctx.trace_id, violations = violations.len(), "detail floor below minimum");
        let outcome = self.engine.repair(profile, &violations);

        state.passes = outcome.passes;
        state.repairs = outcome.actions.clone();
        state.qa_flags = outcome.qa_flags.clone();
        state.confidence_overrides = outcome.confidence_overrides.clone();
        state.profile = Some(outcome.into_profile());

        if state.qa_flags.is_empty() {
            return Ok(StageVerdict::Modified);
        }
        warn!(
            trace_id = %ctx.trace_id,
            qa_flags = state.qa_flags.len(),
            passes = state.passes.total(),
            "detail floor unresolved after repair budget"
        );
        Ok(StageVerdict::Flagged)
    }
}
