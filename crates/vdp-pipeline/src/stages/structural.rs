use crate::stage::{PipelineState, Stage, StageError, StageVerdict};
use vdp_checks::StructuralValidator;
use vdp_core::ExecutionContext;

/// Rejects a candidate that does not match the schema. Fields the caller
/// overrides are exempt.
#[derive(Debug, Default)]
pub struct StructuralStage;

impl Stage for StructuralStage {
    fn id(&self) -> &'static str {
        "structural.schema.v1"
    }

    fn run(&self, state: &mut PipelineState, ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
        let result = StructuralValidator::new()
            .with_exempt(ctx.overrides.paths())
            .validate(&state.candidate);

        if !result.ok {
            return Err(StageError::rejected("structural", result.violations));
        }
        Ok(StageVerdict::Pass)
    }
}
