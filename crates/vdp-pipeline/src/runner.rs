//! Pipeline Runner: chains stages and records a proof per stage
use crate::stage::{PipelineState, Stage};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};
use vdp_core::{ExecutionContext, VdpError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProof {
    pub id: String,
    pub in_hash: String,
    pub out_hash: String,
    pub deterministic: bool,
    pub latency_ms: u64,
    pub verdict: Option<String>,
}

pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
    pipeline_id: String,
}

impl PipelineRunner {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.id().split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→");

        Self { stages, pipeline_id }
    }

    /// Run every stage in order. The first failing stage stops the run.
    pub fn run(&self, state: &mut PipelineState, ctx: &ExecutionContext) -> Result<Vec<StageProof>, VdpError> {
        let mut proofs = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let start = Instant::now();
            let in_hash = self.hash(state).map_err(|e| e.into_vdp(stage.id()))?;

            let verdict = match stage.run(state, ctx) {
                Ok(verdict) => verdict,
                Err(e) => {
                    let err = e.into_vdp(stage.id());
                    warn!(trace_id = %ctx.trace_id, stage = stage.id(), violations = err.violations().len(), "stage rejected profile");
                    return Err(err);
                }
            };

            let out_hash = self.hash(state).map_err(|e| e.into_vdp(stage.id()))?;
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!(trace_id = %ctx.trace_id, stage = stage.id(), verdict = verdict.as_str(), latency_ms, "stage finished");

            proofs.push(StageProof {
                id: stage.id().to_string(),
                in_hash,
                out_hash,
                deterministic: stage.deterministic(),
                latency_ms,
                verdict: Some(verdict.as_str().to_string()),
            });
        }

        Ok(proofs)
    }

    fn hash(&self, state: &PipelineState) -> Result<String, crate::stage::StageError> {
        Ok(hash_bytes(&state.canonical_bytes()?))
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }
}

pub fn hash_bytes(data: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{StageError, StageVerdict};
    use serde_json::json;
    use vdp_core::{CallerOverrides, Violation, ViolationKind};

    struct Touch;

    impl Stage for Touch {
        fn id(&self) -> &'static str {
            "touch.test.v1"
        }

        fn run(&self, state: &mut PipelineState, _ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
            state.candidate["touched"] = json!(true);
            Ok(StageVerdict::Modified)
        }
    }

    struct Reject;

    impl Stage for Reject {
        fn id(&self) -> &'static str {
            "reject.test.v1"
        }

        fn run(&self, _state: &mut PipelineState, _ctx: &ExecutionContext) -> Result<StageVerdict, StageError> {
            Err(StageError::rejected("reject", vec![Violation::new(ViolationKind::TypeMismatch, "$", "no")]))
        }
    }

    #[test]
    fn test_proofs_track_hashes() {
        let runner = PipelineRunner::new(vec![Box::new(Touch)]);
        assert_eq!(runner.pipeline_id(), "touch");

        let mut state = PipelineState::new(json!({}));
        let ctx = ExecutionContext::new(CallerOverrides::new("1"));
        let proofs = runner.run(&mut state, &ctx).unwrap();

        assert_eq!(proofs.len(), 1);
        assert!(proofs[0].in_hash.starts_with("blake3:"));
        assert_ne!(proofs[0].in_hash, proofs[0].out_hash);
        assert_eq!(proofs[0].out_hash, hash_bytes(br#"{"touched":true}"#));
        assert_eq!(proofs[0].verdict.as_deref(), Some("modified"));
    }

    #[test]
    fn test_rejection_stops_the_run() {
        let runner = PipelineRunner::new(vec![Box::new(Reject), Box::new(Touch)]);
        let mut state = PipelineState::new(json!({}));
        let ctx = ExecutionContext::new(CallerOverrides::new("1"));

        let err = runner.run(&mut state, &ctx).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.to_string().starts_with("VALIDATION/"));
        assert!(state.candidate.get("touched").is_none());
    }
}
