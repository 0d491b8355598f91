//! Data Model: Profile, Scene, Shot, MentionItem
//!
//! Typed view of a structurally valid candidate. Field names follow the
//! wire format exactly so a validated `serde_json::Value` deserializes
//! without renames beyond the enum spellings.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Caller-assigned identifier, always overwritten by the caller value
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_lang: Option<String>,
    pub metadata: Metadata,
    pub overall_analysis: OverallAnalysis,
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub product_mentions: Vec<MentionItem>,
    #[serde(default)]
    pub service_mentions: Vec<MentionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub platform: String,
    pub source_url: String,
    /// ISO 8601 upload timestamp as supplied by the caller
    pub upload_date: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub hashtags: Vec<String>,
    pub video_origin: VideoOrigin,
    #[serde(default)]
    pub cta_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_sound: Option<OriginalSound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalSound {
    pub id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoOrigin {
    #[serde(rename = "AI-Generated")]
    AiGenerated,
    #[serde(rename = "Real-Footage")]
    RealFootage,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAnalysis {
    pub summary: String,
    pub emotional_arc: String,
    pub audience_reaction: AudienceReaction,
    pub safety_flags: Vec<String>,
    pub confidence: ConfidenceScore,
    pub graph_refs: GraphRefs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asr_transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asr_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asr_translation_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<Vec<LocalizedText>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceReaction {
    pub analysis: String,
    pub common_reactions: Vec<String>,
    pub notable_comments: Vec<LocalizedText>,
    pub overall_sentiment: String,
}

/// Text kept in its source language, with a BCP-47 tag and an optional
/// English translation. Used for comments and on-screen text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub text: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub translation_en: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub overall: f64,
    pub scene_classification: f64,
    pub device_analysis: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRefs {
    pub potential_meme_template: String,
    pub related_hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_id: String,
    pub time_start: f64,
    pub time_end: f64,
    pub duration_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    pub narrative_unit: NarrativeUnit,
    pub setting: SceneSetting,
    pub shots: Vec<Shot>,
}

impl Scene {
    /// Duration derived from the timecodes; `duration_sec` must agree with it.
    pub fn span(&self) -> f64 {
        self.time_end - self.time_start
    }

    pub fn keyframe_count(&self) -> usize {
        self.shots.iter().map(|s| s.keyframes.len()).sum()
    }

    /// Largest composition-note count over the scene's shots.
    pub fn max_note_count(&self) -> usize {
        self.shots.iter().map(Shot::note_count).max().unwrap_or(0)
    }

    pub fn has_keyframe_role(&self, role: KeyframeRole) -> bool {
        self.shots.iter().any(|s| s.has_role(role))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeUnit {
    pub narrative_role: String,
    pub summary: String,
    pub dialogue: String,
    #[serde(default)]
    pub dialogue_lang: Option<String>,
    #[serde(default)]
    pub dialogue_translation_en: Option<String>,
    pub rhetoric: Vec<String>,
    pub comedic_device: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSetting {
    pub location: String,
    pub visual_style: VisualStyle,
    pub audio_style: AudioStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualStyle {
    pub cinematic_properties: String,
    pub lighting: String,
    pub mood_palette: Vec<String>,
    pub edit_grammar: EditGrammar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditGrammar {
    pub cut_speed: String,
    pub camera_style: String,
    pub subtitle_style: SubtitleStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleStyle {
    None,
    BroadcastEntertainment,
    NewsCaption,
    SimpleWhiteText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStyle {
    pub music: String,
    pub ambient_sound: String,
    pub tone: String,
    pub audio_events: Vec<AudioEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioEvent {
    pub timestamp: f64,
    pub event: AudioEventKind,
    pub description: String,
    pub intensity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioEventKind {
    MusicStarts,
    MusicStops,
    MusicChange,
    MusicCrescendo,
    NarrationStarts,
    CriticalSfx,
    Laughter,
    SingingStarts,
    AbruptSoundChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub shot_id: String,
    pub start: f64,
    pub end: f64,
    pub camera: Camera,
    pub composition: Composition,
    pub keyframes: Vec<Keyframe>,
    pub confidence: Confidence,
}

impl Shot {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn note_count(&self) -> usize {
        self.composition.notes.as_ref().map_or(0, Vec::len)
    }

    pub fn has_role(&self, role: KeyframeRole) -> bool {
        self.keyframes.iter().any(|k| k.role == role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub shot: ShotSize,
    pub angle: CameraAngle,
    #[serde(rename = "move")]
    pub movement: CameraMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotSize {
    #[serde(rename = "ECU")]
    ExtremeCloseUp,
    #[serde(rename = "CU")]
    CloseUp,
    #[serde(rename = "MCU")]
    MediumCloseUp,
    #[serde(rename = "MS")]
    Medium,
    #[serde(rename = "MLS")]
    MediumLong,
    #[serde(rename = "WS")]
    Wide,
    #[serde(rename = "EWS")]
    ExtremeWide,
}

impl ShotSize {
    pub fn code(&self) -> &'static str {
        match self {
            ShotSize::ExtremeCloseUp => "ECU",
            ShotSize::CloseUp => "CU",
            ShotSize::MediumCloseUp => "MCU",
            ShotSize::Medium => "MS",
            ShotSize::MediumLong => "MLS",
            ShotSize::Wide => "WS",
            ShotSize::ExtremeWide => "EWS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraAngle {
    Eye,
    High,
    Low,
    Overhead,
    Dutch,
}

impl CameraAngle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraAngle::Eye => "eye",
            CameraAngle::High => "high",
            CameraAngle::Low => "low",
            CameraAngle::Overhead => "overhead",
            CameraAngle::Dutch => "dutch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMove {
    Static,
    Pan,
    Tilt,
    Dolly,
    Truck,
    Handheld,
    Crane,
    Zoom,
}

impl CameraMove {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMove::Static => "static",
            CameraMove::Pan => "pan",
            CameraMove::Tilt => "tilt",
            CameraMove::Dolly => "dolly",
            CameraMove::Truck => "truck",
            CameraMove::Handheld => "handheld",
            CameraMove::Crane => "crane",
            CameraMove::Zoom => "zoom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub grid: CompositionGrid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionGrid {
    LeftThird,
    Center,
    RightThird,
    Symmetry,
}

impl CompositionGrid {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionGrid::LeftThird => "left third",
            CompositionGrid::Center => "centered",
            CompositionGrid::RightThird => "right third",
            CompositionGrid::Symmetry => "symmetrical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub role: KeyframeRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_rel_shot: Option<f64>,
    pub desc: String,
}

/// Keyframe role; the declaration order is the order within a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyframeRole {
    Start,
    Mid,
    Peak,
    End,
}

impl fmt::Display for KeyframeRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyframeRole::Start => write!(f, "start"),
            KeyframeRole::Mid => write!(f, "mid"),
            KeyframeRole::Peak => write!(f, "peak"),
            KeyframeRole::End => write!(f, "end"),
        }
    }
}

/// Qualitative confidence, shared by shots and mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionItem {
    #[serde(rename = "type")]
    pub kind: MentionKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub sources: Vec<MentionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ranges: Option<Vec<[f64; 2]>>,
    pub evidence: Vec<String>,
    pub promotion: Promotion,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    Product,
    Service,
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MentionKind::Product => write!(f, "product"),
            MentionKind::Service => write!(f, "service"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionSource {
    Asr,
    Ocr,
    PlatformCaption,
    PlatformUi,
    Visual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub status: PromotionStatus,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Paid,
    Gifted,
    Affiliate,
    Organic,
    Unknown,
}

impl PromotionStatus {
    /// Precedence when merging: paid > gifted > affiliate > organic > unknown.
    pub fn precedence(&self) -> u8 {
        match self {
            PromotionStatus::Paid => 4,
            PromotionStatus::Gifted => 3,
            PromotionStatus::Affiliate => 2,
            PromotionStatus::Organic => 1,
            PromotionStatus::Unknown => 0,
        }
    }

    /// The stronger of two statuses under the merge precedence.
    pub fn strongest(self, other: PromotionStatus) -> PromotionStatus {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }
}
