//! Repair Policy: where added text comes from
//!
//! The engine decides *what* to add and *where*; a policy supplies the
//! words. The default policy builds every string from the scene's own data
//! so repairs never introduce facts the profile does not already carry.

use vdp_core::{KeyframeRole, Scene, Shot, SummaryCue};

pub trait RepairPolicy: Send + Sync {
    /// Description for a keyframe inserted with `role`.
    fn keyframe_desc(&self, scene: &Scene, shot: &Shot, role: KeyframeRole) -> String;

    /// Description for an appended `end` keyframe that must read as closure.
    fn closure_desc(&self, scene: &Scene, shot: &Shot) -> String;

    /// Composition notes to try, in order; the engine appends the first one
    /// the shot does not already carry.
    fn composition_notes(&self, scene: &Scene, shot: &Shot) -> Vec<String>;

    /// One clause covering `cue`, appended to the scene summary.
    fn summary_clause(&self, scene: &Scene, cue: SummaryCue) -> String;
}

/// Default policy: templates filled from the scene itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePolicy;

impl RepairPolicy for TemplatePolicy {
    fn keyframe_desc(&self, scene: &Scene, shot: &Shot, role: KeyframeRole) -> String {
        let beat = scene.narrative_unit.narrative_role.to_lowercase();
        let size = shot.camera.shot.code();
        match role {
            KeyframeRole::Start => format!("{} shot opens on the {} beat", size, beat),
            KeyframeRole::Mid => format!("Subtle shift in expression mid-way through the {} beat", beat),
            KeyframeRole::Peak => format!("Peak of the {} beat, framed {}", beat, shot.composition.grid.as_str()),
            KeyframeRole::End => format!("{} shot holds on the last frame of the {} beat", size, beat),
        }
    }

    fn closure_desc(&self, _scene: &Scene, shot: &Shot) -> String {
        format!("Action freezes in a brief pause as the {} frame holds still", shot.camera.shot.code())
    }

    fn composition_notes(&self, scene: &Scene, shot: &Shot) -> Vec<String> {
        vec![
            format!("{} composition in a {} shot", capitalize(shot.composition.grid.as_str()), shot.camera.shot.code()),
            format!("{} angle, {} camera", capitalize(shot.camera.angle.as_str()), shot.camera.movement.as_str()),
            format!("Lit by {}", sentence_body(&scene.setting.visual_style.lighting)),
        ]
    }

    fn summary_clause(&self, scene: &Scene, cue: SummaryCue) -> String {
        match cue {
            SummaryCue::CameraMovement => {
                let shots: Vec<String> = scene
                    .shots
                    .iter()
                    .map(|s| format!("{} {}", s.camera.movement.as_str(), s.camera.shot.code()))
                    .collect();
                format!("Camera work: {}.", shots.join(" then "))
            }
            SummaryCue::LocationTime => format!(
                "Set in {} from {:.1}s to {:.1}s.",
                sentence_body(&scene.setting.location),
                scene.time_start,
                scene.time_end
            ),
            SummaryCue::Lighting => {
                format!("Lighting: {}.", sentence_body(&scene.setting.visual_style.lighting))
            }
            SummaryCue::AudioMood => {
                let audio = &scene.setting.audio_style;
                format!("Audio: {}, {} tone.", sentence_body(&audio.music), sentence_body(&audio.tone))
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text trimmed of surrounding whitespace and trailing full stops, first
/// letter lowercased so it can sit mid-sentence.
fn sentence_body(text: &str) -> String {
    let trimmed = text.trim().trim_end_matches('.');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
