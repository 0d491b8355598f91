//! Binary entrypoint for the VDP API server.
use vdp_api::{run, AppState};
use vdp_checks::VerbosityProfile;
use vdp_pipeline::ProfilePipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    // Default listen address can be overridden with VDP_ADDR
    let addr = std::env::var("VDP_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());

    let profile = match std::env::var("VDP_PROFILE") {
        Ok(path) => VerbosityProfile::load(&path)?,
        Err(_) => VerbosityProfile::strict(),
    };
    tracing::info!(profile = %profile.name, "verbosity profile loaded");

    let state = AppState::new(ProfilePipeline::new(profile))?;
    run(&addr, state).await
}
