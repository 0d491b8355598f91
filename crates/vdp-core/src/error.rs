//! Unified Error Model
use crate::violation::Violation;
use thiserror::Error;

/// Fatal rejection carrying the complete violation list of the failing stage.
#[derive(Error, Debug, Clone)]
#[error("{stage} rejected the profile with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub stage: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(stage: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self { stage: stage.into(), violations }
    }
}

#[derive(Error, Debug)]
pub enum VdpError {
    #[error("VALIDATION/{0}")]
    Validation(#[from] ValidationError),

    /// Verbosity profile unreadable, invalid, or not the one requested
    #[error("CONFIG/{0}")]
    Config(String),

    #[error("STAGE/{0}")]
    Stage(String),

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),
}

impl VdpError {
    /// Violations behind a fatal rejection; empty for other errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            VdpError::Validation(e) => &e.violations,
            _ => &[],
        }
    }
}
