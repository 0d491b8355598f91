//! VDP Core: Schema Model, typed Profile and violation types
//!
//! Shared vocabulary for the validation pipeline. Candidates arrive as
//! untyped `serde_json::Value` trees and are checked against the declarative
//! [`schema`] before being read into the typed [`data_model::Profile`].

pub mod context;
pub mod data_model;
pub mod error;
pub mod schema;
pub mod violation;

pub use context::{CallerOverrides, ExecutionContext};
pub use data_model::*;
pub use error::{ValidationError, VdpError};
pub use schema::{FieldSpec, FieldType, LangPolicy, PROFILE_FIELDS};
pub use violation::{FloorDetail, SummaryCue, ValidationResult, Violation, ViolationClass, ViolationKind};

/// Engine version
pub const VDP_VERSION: &str = "1.0.0";

/// Tolerance in seconds for timecode comparisons.
pub const TIME_EPSILON: f64 = 1e-3;
