//! VDP Checks: Structural, Temporal and Detail-Floor Validation
//!
//! Three independent checkers over a candidate profile, plus the verbosity
//! profile that parameterises the detail floors.
//!
//! # Example
//!
//! ```ignore
//! use vdp_checks::{structural, check_temporal, VerbosityChecker};
//!
//! let result = structural::validate(&candidate);
//! if result.ok {
//!     let profile: vdp_core::Profile = serde_json::from_value(candidate)?;
//!     let fatal = check_temporal(&profile);
//!     let floors = VerbosityChecker::default().check_profile(&profile);
//! }
//! ```

pub mod cues;
pub mod profile;
pub mod structural;
pub mod temporal;
pub mod verbosity;

pub use cues::CueLexicon;
pub use profile::{
    DetailFloor, DurationTier, HookCloseupRule, MicroSceneRule, PassLimits, ProfileError, TierCues,
    VerbosityProfile,
};
pub use structural::StructuralValidator;
pub use temporal::check_temporal;
pub use verbosity::{check_verbosity, SceneRequirements, VerbosityChecker};
