//! Schema Model
//!
//! Declarative description of every field of a Viral DNA Profile: its type,
//! allowed values, cardinality, nullability and language policy. The
//! structural validator walks candidates against [`PROFILE_FIELDS`] and the
//! normalization pass looks language policy up here instead of hard-coding
//! per-field rules.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

// ============================================================================
// ENUMERATED VALUE SETS
// ============================================================================

pub const VIDEO_ORIGINS: &[&str] = &["AI-Generated", "Real-Footage", "Unknown"];
pub const IMPORTANCE: &[&str] = &["critical", "normal"];
pub const SUBTITLE_STYLES: &[&str] = &["none", "broadcast_entertainment", "news_caption", "simple_white_text"];
pub const AUDIO_EVENTS: &[&str] = &[
    "music_starts",
    "music_stops",
    "music_change",
    "music_crescendo",
    "narration_starts",
    "critical_sfx",
    "laughter",
    "singing_starts",
    "abrupt_sound_change",
];
pub const SHOT_SIZES: &[&str] = &["ECU", "CU", "MCU", "MS", "MLS", "WS", "EWS"];
pub const CAMERA_ANGLES: &[&str] = &["eye", "high", "low", "overhead", "dutch"];
pub const CAMERA_MOVES: &[&str] = &["static", "pan", "tilt", "dolly", "truck", "handheld", "crane", "zoom"];
pub const COMPOSITION_GRIDS: &[&str] = &["left_third", "center", "right_third", "symmetry"];
pub const KEYFRAME_ROLES: &[&str] = &["start", "mid", "peak", "end"];
pub const CONFIDENCE_LEVELS: &[&str] = &["low", "medium", "high"];
pub const MENTION_TYPES: &[&str] = &["product", "service"];
pub const MENTION_SOURCES: &[&str] = &["asr", "ocr", "platform_caption", "platform_ui", "visual"];
pub const PROMOTION_STATUSES: &[&str] = &["paid", "gifted", "affiliate", "organic", "unknown"];

// ============================================================================
// FIELD TYPES
// ============================================================================

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// Any string
    Text,
    /// String that must match a named pattern
    Pattern(TextPattern),
    /// Any JSON number
    Number,
    /// Non-negative number of seconds
    Seconds,
    /// Number in `[0, 1]`
    Fraction,
    /// Non-negative integer
    Count,
    /// String drawn from a fixed set
    Enum(&'static [&'static str]),
    /// Nested object
    Object(&'static [FieldSpec]),
    /// Array with item type and cardinality bounds
    Array(&'static ArraySpec),
}

impl FieldType {
    /// Short human description used in violation messages.
    pub fn describe(&self) -> String {
        match self {
            FieldType::Text => "string".to_string(),
            FieldType::Pattern(p) => format!("string matching {}", p.describe()),
            FieldType::Number => "number".to_string(),
            FieldType::Seconds => "non-negative number of seconds".to_string(),
            FieldType::Fraction => "number in [0, 1]".to_string(),
            FieldType::Count => "non-negative integer".to_string(),
            FieldType::Enum(values) => format!("one of {}", values.join("|")),
            FieldType::Object(_) => "object".to_string(),
            FieldType::Array(spec) => format!("array of {}", spec.items.describe()),
        }
    }

    /// JSON kind name used in the flattened schema listing.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldType::Text | FieldType::Pattern(_) => "string",
            FieldType::Number | FieldType::Seconds | FieldType::Fraction => "number",
            FieldType::Count => "integer",
            FieldType::Enum(_) => "enum",
            FieldType::Object(_) => "object",
            FieldType::Array(_) => "array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArraySpec {
    pub items: FieldType,
    pub min_items: usize,
    pub max_items: Option<usize>,
}

/// Named string patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPattern {
    /// `S<2-digit index>_<ThemeToken>`, e.g. `S01_GukbapRestaurant`
    SceneId,
}

lazy_static! {
    static ref SCENE_ID: Regex = Regex::new(r"^S\d{2}_[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap();

    /// Loose BCP-47 shape: language subtag plus optional subtags
    static ref BCP47: Regex = Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").unwrap();

    static ref SNAKE_CASE: Regex = Regex::new(r"^[a-z0-9]+(_[a-z0-9]+)*$").unwrap();
}

impl TextPattern {
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            TextPattern::SceneId => SCENE_ID.is_match(text),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TextPattern::SceneId => "S<NN>_<Theme>",
        }
    }
}

/// Whether a tag has the shape of a BCP-47 language tag (`en`, `ko`, `en-US`, `und`).
pub fn is_bcp47(tag: &str) -> bool {
    BCP47.is_match(tag)
}

/// Whether a device/rhetoric token is snake_case.
pub fn is_snake_case(token: &str) -> bool {
    SNAKE_CASE.is_match(token)
}

// ============================================================================
// LANGUAGE POLICY
// ============================================================================

/// Language policy tag consulted by the normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LangPolicy {
    /// No language requirement (identifiers, URLs, verbatim names)
    Unspecified,
    /// Effective language must be English
    EnglishNormalized,
    /// Kept in the source language; the sibling field named `tag` carries its BCP-47 code
    PreserveOriginal { tag: &'static str },
}

// ============================================================================
// FIELD SPEC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub lang: LangPolicy,
}

impl FieldSpec {
    /// Required, non-nullable field
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: true, nullable: false, lang: LangPolicy::Unspecified }
    }

    /// Optional field that may also be null
    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: false, nullable: true, lang: LangPolicy::Unspecified }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Optional but never null when present
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn english(mut self) -> Self {
        self.lang = LangPolicy::EnglishNormalized;
        self
    }

    pub const fn original(mut self, tag: &'static str) -> Self {
        self.lang = LangPolicy::PreserveOriginal { tag };
        self
    }
}

const fn array(spec: &'static ArraySpec) -> FieldType {
    FieldType::Array(spec)
}

const TEXT_LIST: ArraySpec = ArraySpec { items: FieldType::Text, min_items: 0, max_items: None };

// ============================================================================
// PROFILE SCHEMA
// ============================================================================

pub const ORIGINAL_SOUND_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("id", FieldType::Text).nullable(),
    FieldSpec::required("title", FieldType::Text).nullable(),
];

pub const METADATA_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("platform", FieldType::Text),
    FieldSpec::required("source_url", FieldType::Text),
    FieldSpec::required("upload_date", FieldType::Text),
    FieldSpec::required("view_count", FieldType::Count),
    FieldSpec::required("like_count", FieldType::Count),
    FieldSpec::required("comment_count", FieldType::Count),
    FieldSpec::required("share_count", FieldType::Count),
    FieldSpec::required("hashtags", array(&TEXT_LIST)).english(),
    FieldSpec::required("video_origin", FieldType::Enum(VIDEO_ORIGINS)),
    FieldSpec::optional("cta_types", array(&TEXT_LIST)).not_null().english(),
    FieldSpec::optional("original_sound", FieldType::Object(ORIGINAL_SOUND_FIELDS)),
];

/// Comment / OCR item: original text plus BCP-47 tag and optional translation.
pub const LOCALIZED_TEXT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("text", FieldType::Text).original("lang"),
    FieldSpec::optional("lang", FieldType::Text),
    FieldSpec::optional("translation_en", FieldType::Text).english(),
];

pub const AUDIENCE_REACTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("analysis", FieldType::Text).english(),
    FieldSpec::required("common_reactions", array(&TEXT_LIST)).english(),
    FieldSpec::required(
        "notable_comments",
        array(&ArraySpec { items: FieldType::Object(LOCALIZED_TEXT_FIELDS), min_items: 0, max_items: None }),
    ),
    FieldSpec::required("overall_sentiment", FieldType::Text).english(),
];

pub const CONFIDENCE_SCORE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("overall", FieldType::Fraction),
    FieldSpec::required("scene_classification", FieldType::Fraction),
    FieldSpec::required("device_analysis", FieldType::Fraction),
];

pub const GRAPH_REFS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("potential_meme_template", FieldType::Text).english(),
    FieldSpec::required("related_hashtags", array(&TEXT_LIST)).english(),
];

pub const OVERALL_ANALYSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("summary", FieldType::Text).english(),
    FieldSpec::required("emotional_arc", FieldType::Text).english(),
    FieldSpec::required("audience_reaction", FieldType::Object(AUDIENCE_REACTION_FIELDS)),
    FieldSpec::required("safety_flags", array(&TEXT_LIST)),
    FieldSpec::required("confidence", FieldType::Object(CONFIDENCE_SCORE_FIELDS)),
    FieldSpec::required("graph_refs", FieldType::Object(GRAPH_REFS_FIELDS)),
    FieldSpec::optional("asr_transcript", FieldType::Text).original("asr_lang"),
    FieldSpec::optional("asr_lang", FieldType::Text),
    FieldSpec::optional("asr_translation_en", FieldType::Text).english(),
    FieldSpec::optional(
        "ocr_text",
        array(&ArraySpec { items: FieldType::Object(LOCALIZED_TEXT_FIELDS), min_items: 0, max_items: None }),
    ),
];

pub const NARRATIVE_UNIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("narrative_role", FieldType::Text).english(),
    FieldSpec::required("summary", FieldType::Text).english(),
    FieldSpec::required("dialogue", FieldType::Text).original("dialogue_lang"),
    FieldSpec::optional("dialogue_lang", FieldType::Text),
    FieldSpec::optional("dialogue_translation_en", FieldType::Text).english(),
    FieldSpec::required("rhetoric", array(&TEXT_LIST)),
    FieldSpec::required("comedic_device", array(&TEXT_LIST)),
];

pub const EDIT_GRAMMAR_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("cut_speed", FieldType::Text).english(),
    FieldSpec::required("camera_style", FieldType::Text).english(),
    FieldSpec::required("subtitle_style", FieldType::Enum(SUBTITLE_STYLES)),
];

pub const VISUAL_STYLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("cinematic_properties", FieldType::Text).english(),
    FieldSpec::required("lighting", FieldType::Text).english(),
    FieldSpec::required("mood_palette", array(&TEXT_LIST)).english(),
    FieldSpec::required("edit_grammar", FieldType::Object(EDIT_GRAMMAR_FIELDS)),
];

pub const AUDIO_EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("timestamp", FieldType::Seconds),
    FieldSpec::required("event", FieldType::Enum(AUDIO_EVENTS)),
    FieldSpec::required("description", FieldType::Text).english(),
    FieldSpec::required("intensity", FieldType::Text).english(),
];

pub const AUDIO_STYLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("music", FieldType::Text).english(),
    FieldSpec::required("ambient_sound", FieldType::Text).english(),
    FieldSpec::required("tone", FieldType::Text).english(),
    FieldSpec::required(
        "audio_events",
        array(&ArraySpec { items: FieldType::Object(AUDIO_EVENT_FIELDS), min_items: 0, max_items: None }),
    ),
];

pub const SCENE_SETTING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("location", FieldType::Text).english(),
    FieldSpec::required("visual_style", FieldType::Object(VISUAL_STYLE_FIELDS)),
    FieldSpec::required("audio_style", FieldType::Object(AUDIO_STYLE_FIELDS)),
];

pub const CAMERA_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("shot", FieldType::Enum(SHOT_SIZES)),
    FieldSpec::required("angle", FieldType::Enum(CAMERA_ANGLES)),
    FieldSpec::required("move", FieldType::Enum(CAMERA_MOVES)),
];

pub const COMPOSITION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("grid", FieldType::Enum(COMPOSITION_GRIDS)),
    FieldSpec::optional("notes", array(&ArraySpec { items: FieldType::Text, min_items: 0, max_items: Some(3) }))
        .english(),
];

pub const KEYFRAME_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("role", FieldType::Enum(KEYFRAME_ROLES)),
    FieldSpec::optional("t_rel_shot", FieldType::Seconds),
    FieldSpec::required("desc", FieldType::Text).english(),
];

pub const SHOT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("shot_id", FieldType::Text),
    FieldSpec::required("start", FieldType::Seconds),
    FieldSpec::required("end", FieldType::Seconds),
    FieldSpec::required("camera", FieldType::Object(CAMERA_FIELDS)),
    FieldSpec::required("composition", FieldType::Object(COMPOSITION_FIELDS)),
    FieldSpec::required(
        "keyframes",
        array(&ArraySpec { items: FieldType::Object(KEYFRAME_FIELDS), min_items: 2, max_items: Some(4) }),
    ),
    FieldSpec::required("confidence", FieldType::Enum(CONFIDENCE_LEVELS)),
];

pub const SCENE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("scene_id", FieldType::Pattern(TextPattern::SceneId)),
    FieldSpec::required("time_start", FieldType::Seconds),
    FieldSpec::required("time_end", FieldType::Seconds),
    FieldSpec::required("duration_sec", FieldType::Seconds),
    FieldSpec::optional("importance", FieldType::Enum(IMPORTANCE)).not_null(),
    FieldSpec::required("narrative_unit", FieldType::Object(NARRATIVE_UNIT_FIELDS)),
    FieldSpec::required("setting", FieldType::Object(SCENE_SETTING_FIELDS)),
    FieldSpec::required(
        "shots",
        array(&ArraySpec { items: FieldType::Object(SHOT_FIELDS), min_items: 1, max_items: Some(6) }),
    ),
];

pub const PROMOTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("status", FieldType::Enum(PROMOTION_STATUSES)),
    FieldSpec::required("signals", array(&TEXT_LIST)),
];

const TIME_RANGE: ArraySpec = ArraySpec { items: FieldType::Seconds, min_items: 2, max_items: Some(2) };

pub const MENTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("type", FieldType::Enum(MENTION_TYPES)),
    FieldSpec::required("name", FieldType::Text),
    FieldSpec::optional("category", FieldType::Text).english(),
    FieldSpec::required(
        "sources",
        array(&ArraySpec { items: FieldType::Enum(MENTION_SOURCES), min_items: 1, max_items: None }),
    ),
    FieldSpec::optional(
        "time_ranges",
        array(&ArraySpec { items: FieldType::Array(&TIME_RANGE), min_items: 0, max_items: None }),
    ),
    FieldSpec::required("evidence", array(&ArraySpec { items: FieldType::Text, min_items: 1, max_items: None })),
    FieldSpec::required("promotion", FieldType::Object(PROMOTION_FIELDS)),
    FieldSpec::required("confidence", FieldType::Enum(CONFIDENCE_LEVELS)),
];

const MENTION_LIST: ArraySpec = ArraySpec { items: FieldType::Object(MENTION_FIELDS), min_items: 0, max_items: None };

/// Root of the schema.
pub const PROFILE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("content_id", FieldType::Text),
    FieldSpec::optional("default_lang", FieldType::Text).not_null(),
    FieldSpec::required("metadata", FieldType::Object(METADATA_FIELDS)),
    FieldSpec::required("overall_analysis", FieldType::Object(OVERALL_ANALYSIS_FIELDS)),
    FieldSpec::required(
        "scenes",
        array(&ArraySpec { items: FieldType::Object(SCENE_FIELDS), min_items: 0, max_items: None }),
    ),
    FieldSpec::optional("product_mentions", array(&MENTION_LIST)).not_null(),
    FieldSpec::optional("service_mentions", array(&MENTION_LIST)).not_null(),
];

// ============================================================================
// FLATTENED VIEW
// ============================================================================

/// One row of the flattened schema, addressed by a wildcard path
/// (`scenes[*].shots[*].camera.shot`).
#[derive(Debug, Clone, Serialize)]
pub struct SchemaEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub required: bool,
    pub nullable: bool,
    pub lang: LangPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<&'static str>>,
}

/// Flatten the whole schema into a list of entries, depth first.
pub fn flatten() -> Vec<SchemaEntry> {
    let mut out = Vec::new();
    flatten_fields(PROFILE_FIELDS, "", &mut out);
    out
}

fn flatten_fields(fields: &'static [FieldSpec], prefix: &str, out: &mut Vec<SchemaEntry>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        out.push(SchemaEntry {
            path: path.clone(),
            kind: field.ty.kind(),
            description: field.ty.describe(),
            required: field.required,
            nullable: field.nullable,
            lang: field.lang,
            allowed: allowed_values(&field.ty),
        });
        flatten_type(&field.ty, &path, out);
    }
}

fn flatten_type(ty: &FieldType, path: &str, out: &mut Vec<SchemaEntry>) {
    match ty {
        FieldType::Object(fields) => flatten_fields(fields, path, out),
        FieldType::Array(spec) => flatten_type(&spec.items, &format!("{}[*]", path), out),
        _ => {}
    }
}

fn allowed_values(ty: &FieldType) -> Option<Vec<&'static str>> {
    match ty {
        FieldType::Enum(values) => Some(values.to_vec()),
        FieldType::Array(spec) => allowed_values(&spec.items),
        _ => None,
    }
}

/// Paths (wildcard form) whose language policy is English-normalized.
pub fn english_normalized_paths() -> Vec<String> {
    flatten()
        .into_iter()
        .filter(|e| e.lang == LangPolicy::EnglishNormalized)
        .map(|e| e.path)
        .collect()
}
