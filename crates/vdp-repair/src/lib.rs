//! VDP Repair: bounded repair of detail-floor violations
//!
//! Only recoverable violations are touched. Repairs are additive: keyframes
//! and notes are inserted, summaries are extended, timecodes never move.
//!
//! # Example
//!
//! ```ignore
//! use vdp_repair::RepairEngine;
//!
//! let engine = RepairEngine::default();
//! let violations = engine.checker().check_profile(&profile);
//! let outcome = engine.repair(&profile, &violations);
//! for flag in &outcome.qa_flags {
//!     eprintln!("{}: {}", flag.scene_id, flag.message);
//! }
//! let repaired = outcome.into_profile();
//! ```

pub mod engine;
pub mod policy;

pub use engine::{
    apply_confidence_overrides, repair, ConfidenceOverride, QaFlag, RepairAction, RepairEngine, RepairOutcome,
    RepairPasses, RepairPhase,
};
pub use policy::{RepairPolicy, TemplatePolicy};
