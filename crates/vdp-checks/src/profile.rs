//! Verbosity Profiles
//!
//! Thresholds, lexicons and repair pass limits for the detail-floor checks.
//! `strict@1.0` is the built-in default; any subset of it can be overridden
//! from YAML.

use crate::cues::CueLexicon;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use vdp_core::{KeyframeRole, SummaryCue, VdpError};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid verbosity profile: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid verbosity profile: {0}")]
    Invalid(String),
}

impl From<ProfileError> for VdpError {
    fn from(err: ProfileError) -> Self {
        VdpError::Config(err.to_string())
    }
}

/// Detail floor for one duration tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFloor {
    /// Keyframes summed across the scene's shots
    pub min_keyframes: usize,
    /// Composition notes on the best-annotated shot
    pub min_notes: usize,
    /// Summary length in characters
    pub min_summary_chars: usize,
}

/// Extra requirements for ultra-short or critical beats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroSceneRule {
    /// Scenes at or under this duration are micro scenes
    pub max_duration_sec: f64,
    /// Narrative role tokens that make a scene micro
    pub roles: Vec<String>,
    /// Comedic devices that make a scene micro
    pub comedic_devices: Vec<String>,
    pub min_keyframes: usize,
    pub min_notes: usize,
    pub required_roles: Vec<KeyframeRole>,
}

impl Default for MicroSceneRule {
    fn default() -> Self {
        Self {
            max_duration_sec: 2.0,
            roles: vec!["hook".into(), "reveal".into(), "punchline".into(), "cta".into()],
            comedic_devices: vec!["expectation_subversion".into(), "anticlimax".into()],
            min_keyframes: 3,
            min_notes: 2,
            required_roles: vec![KeyframeRole::Start, KeyframeRole::Peak, KeyframeRole::End],
        }
    }
}

/// Hook scenes shot in extreme close-up must end on a closure beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookCloseupRule {
    pub roles: Vec<String>,
    pub min_keyframes: usize,
    pub required_roles: Vec<KeyframeRole>,
    /// Lowercase phrases; an end keyframe mentioning any of them denotes closure
    pub closure_keywords: Vec<String>,
}

impl Default for HookCloseupRule {
    fn default() -> Self {
        Self {
            roles: vec!["hook".into()],
            min_keyframes: 3,
            required_roles: vec![KeyframeRole::Start, KeyframeRole::Peak, KeyframeRole::End],
            closure_keywords: [
                "pause",
                "freeze",
                "frozen",
                "still",
                "held breath",
                "holds breath",
                "breath held",
                "holding breath",
                "time visible",
                "time clearly visible",
                "clock",
                "silence",
                "settles",
                "comes to rest",
                "lingers",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassLimits {
    /// Full detail-floor repair passes
    pub post_qa: u32,
    /// Narrow follow-up passes after `post_qa` is exhausted
    pub last_mile: u32,
}

impl Default for PassLimits {
    fn default() -> Self {
        Self { post_qa: 2, last_mile: 1 }
    }
}

/// Cues a summary must mention, per duration tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCues {
    pub short: Vec<SummaryCue>,
    pub medium: Vec<SummaryCue>,
    pub long: Vec<SummaryCue>,
}

impl TierCues {
    pub fn for_tier(&self, tier: DurationTier) -> &[SummaryCue] {
        match tier {
            DurationTier::Short => &self.short,
            DurationTier::Medium => &self.medium,
            DurationTier::Long => &self.long,
        }
    }
}

impl Default for TierCues {
    fn default() -> Self {
        Self {
            short: Vec::new(),
            medium: vec![SummaryCue::CameraMovement, SummaryCue::Lighting, SummaryCue::AudioMood],
            long: vec![SummaryCue::CameraMovement, SummaryCue::LocationTime],
        }
    }
}

/// Verbosity profile defining detail floors and repair limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbosityProfile {
    /// Profile name (e.g., "strict@1.0")
    pub name: String,

    // === Duration tiers ===

    /// Scenes shorter than this use the `short` floor
    pub short_below_sec: f64,
    /// Scenes longer than this use the `long` floor
    pub long_above_sec: f64,
    pub short: DetailFloor,
    pub medium: DetailFloor,
    pub long: DetailFloor,

    // === Narrative signals ===

    pub micro: MicroSceneRule,
    pub hook_closeup: HookCloseupRule,
    /// Roles whose scenes must be marked `importance: critical`
    pub critical_roles: Vec<String>,

    // === Summary completeness ===

    pub required_cues: TierCues,
    pub cues: CueLexicon,

    // === Repair ===

    pub passes: PassLimits,
}

impl VerbosityProfile {
    /// The default floors: 2/1/60 under 3s, 3/2/90 up to 7s, 4/2/120 beyond.
    /// Medium summaries name camera, lighting and audio; long ones name
    /// camera and location/time.
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            short_below_sec: 3.0,
            long_above_sec: 7.0,
            short: DetailFloor { min_keyframes: 2, min_notes: 1, min_summary_chars: 60 },
            medium: DetailFloor { min_keyframes: 3, min_notes: 2, min_summary_chars: 90 },
            long: DetailFloor { min_keyframes: 4, min_notes: 2, min_summary_chars: 120 },
            micro: MicroSceneRule::default(),
            hook_closeup: HookCloseupRule::default(),
            critical_roles: vec!["hook".into(), "punchline".into()],
            required_cues: TierCues::default(),
            cues: CueLexicon::default(),
            passes: PassLimits::default(),
        }
    }

    /// Load profile from YAML; omitted keys keep their strict defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read and validate a YAML profile file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VdpError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| VdpError::Config(format!("reading {}: {}", path.display(), e)))?;
        Ok(Self::from_yaml(&yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, ProfileError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.short_below_sec > self.long_above_sec {
            return Err(ProfileError::Invalid(format!(
                "short_below_sec ({}) exceeds long_above_sec ({})",
                self.short_below_sec, self.long_above_sec
            )));
        }
        if self.hook_closeup.closure_keywords.is_empty() {
            return Err(ProfileError::Invalid("hook_closeup.closure_keywords is empty".into()));
        }
        Ok(())
    }

    /// Duration tier of a scene of `duration` seconds
    pub fn tier(&self, duration: f64) -> DurationTier {
        if duration < self.short_below_sec {
            DurationTier::Short
        } else if duration <= self.long_above_sec {
            DurationTier::Medium
        } else {
            DurationTier::Long
        }
    }

    pub fn floor(&self, tier: DurationTier) -> DetailFloor {
        match tier {
            DurationTier::Short => self.short,
            DurationTier::Medium => self.medium,
            DurationTier::Long => self.long,
        }
    }
}

impl Default for VerbosityProfile {
    fn default() -> Self {
        Self::strict()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationTier {
    Short,
    Medium,
    Long,
}
