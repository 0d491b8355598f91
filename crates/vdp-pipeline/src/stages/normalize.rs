use crate::stage::{PipelineState, Stage, StageError, StageVerdict};
use vdp_core::ExecutionContext;
use vdp_normalize::normalize;

#[derive(Debug, Default)]
pub struct NormalizeStage;

impl Stage for NormalizeStage {
    fn id(&self) -> &'static str {
        "normalize.lang_mentions.v1"
    }

    fn run(&self, state: &mut PipelineState, _ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
        let profile = state.profile()?;
        let outcome = normalize(profile)?;

        let changed = &outcome.profile != profile;
        state.warnings.extend(outcome.warnings);
        state.profile = Some(outcome.profile);

        Ok(if changed { StageVerdict::Modified } else { StageVerdict::Pass })
    }
}
