use crate::stage::{PipelineState, Stage, StageError, StageVerdict};
use vdp_checks::check_temporal;
use vdp_core::ExecutionContext;

#[derive(Debug, Default)]
pub struct TemporalStage;

impl Stage for TemporalStage {
    fn id(&self) -> &'static str {
        "temporal.consistency.v1"
    }

    fn run(&self, state: &mut PipelineState, _ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
        let violations = check_temporal(state.profile()?);
        if !violations.is_empty() {
            return Err(StageError::rejected("temporal", violations));
        }
        Ok(StageVerdict::Pass)
    }
}
