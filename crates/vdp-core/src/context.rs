//! Execution Context: caller ground truth and per-run settings
use crate::data_model::{OriginalSound, VideoOrigin};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Values supplied by the caller that always replace whatever the candidate
/// carries. Only `content_id` is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallerOverrides {
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_origin: Option<VideoOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_sound: Option<OriginalSound>,
}

impl CallerOverrides {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self { content_id: content_id.into(), ..Default::default() }
    }

    /// Field paths replaced by this override set. The structural validator
    /// does not report problems at these paths.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = vec!["content_id".to_string()];
        let metadata: [(&str, bool); 9] = [
            ("platform", self.platform.is_some()),
            ("source_url", self.source_url.is_some()),
            ("upload_date", self.upload_date.is_some()),
            ("view_count", self.view_count.is_some()),
            ("like_count", self.like_count.is_some()),
            ("comment_count", self.comment_count.is_some()),
            ("share_count", self.share_count.is_some()),
            ("video_origin", self.video_origin.is_some()),
            ("original_sound", self.original_sound.is_some()),
        ];
        paths.extend(
            metadata
                .iter()
                .filter(|(_, set)| *set)
                .map(|(name, _)| format!("metadata.{}", name)),
        );
        paths
    }

    /// Write the overrides into a candidate tree. A non-object `metadata`
    /// is left alone; the structural validator has already rejected it.
    pub fn apply(&self, candidate: &mut Value) {
        let Some(root) = candidate.as_object_mut() else {
            return;
        };
        root.insert("content_id".to_string(), Value::String(self.content_id.clone()));

        let metadata = root
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(metadata) = metadata.as_object_mut() else {
            return;
        };

        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                metadata.insert(key.to_string(), value);
            }
        };
        set("platform", self.platform.clone().map(Value::String));
        set("source_url", self.source_url.clone().map(Value::String));
        set("upload_date", self.upload_date.clone().map(Value::String));
        set("view_count", self.view_count.map(Value::from));
        set("like_count", self.like_count.map(Value::from));
        set("comment_count", self.comment_count.map(Value::from));
        set("share_count", self.share_count.map(Value::from));
        set("video_origin", self.video_origin.map(|o| json!(o)));
        set(
            "original_sound",
            self.original_sound
                .as_ref()
                .map(|s| json!({ "id": s.id, "title": s.title })),
        );
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub trace_id: String,
    /// Verbosity profile the caller expects (e.g. "strict@1.0"); `None`
    /// accepts whichever profile the pipeline runs
    pub profile: Option<String>,
    pub overrides: CallerOverrides,
}

impl ExecutionContext {
    pub fn new(overrides: CallerOverrides) -> Self {
        Self { trace_id: uuid::Uuid::new_v4().to_string(), profile: None, overrides }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}
