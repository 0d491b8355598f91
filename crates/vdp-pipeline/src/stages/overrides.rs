use crate::stage::{PipelineState, Stage, StageError, StageVerdict};
use vdp_core::{ExecutionContext, Profile};

/// Writes the caller's ground truth into the candidate and reads it into
/// the typed profile every later stage works on.
#[derive(Debug, Default)]
pub struct OverridesStage;

impl Stage for OverridesStage {
    fn id(&self) -> &'static str {
        "overrides.caller.v1"
    }

    fn run(&self, state: &mut PipelineState, ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
        let before = state.candidate.clone();
        ctx.overrides.apply(&mut state.candidate);

        let profile: Profile = serde_json::from_value(state.candidate.clone())?;
        state.profile = Some(profile);

        if state.candidate == before {
            Ok(StageVerdict::Pass)
        } else {
            Ok(StageVerdict::Modified)
        }
    }
}
