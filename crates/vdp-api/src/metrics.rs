//! Prometheus counters for `/metrics`
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use vdp_pipeline::AcceptedProfile;

pub struct ApiMetrics {
    registry: Registry,
    accepted: IntCounter,
    rejected: IntCounterVec,
    repair_passes: IntCounter,
    qa_flags: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let accepted = IntCounter::new("vdp_profiles_accepted_total", "Profiles accepted by the pipeline")?;
        let rejected = IntCounterVec::new(
            Opts::new("vdp_profiles_rejected_total", "Profiles rejected with fatal violations"),
            &["stage"],
        )?;
        let repair_passes = IntCounter::new("vdp_repair_passes_total", "Repair passes spent on accepted profiles")?;
        let qa_flags = IntCounter::new("vdp_qa_flags_total", "Unresolved detail-floor violations demoted to qa flags")?;

        registry.register(Box::new(accepted.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(repair_passes.clone()))?;
        registry.register(Box::new(qa_flags.clone()))?;

        Ok(Self { registry, accepted, rejected, repair_passes, qa_flags })
    }

    pub fn record_accepted(&self, accepted: &AcceptedProfile) {
        self.accepted.inc();
        self.repair_passes.inc_by(u64::from(accepted.passes.total()));
        self.qa_flags.inc_by(accepted.qa_flags.len() as u64);
    }

    pub fn record_rejected(&self, stage: &str) {
        self.rejected.with_label_values(&[stage]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
