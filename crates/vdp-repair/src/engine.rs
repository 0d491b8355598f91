//! Repair Engine
//!
//! Bounded, additive repair of detail-floor violations on a working copy.
//! Each pass takes at most one action per outstanding violation; the
//! verbosity checker re-runs on the affected scenes after every pass.
//! Whatever is still open when the pass budget runs out becomes a `qa_flag`
//! plus a confidence override; nothing here ever fails.

use crate::policy::{RepairPolicy, TemplatePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use vdp_checks::{DurationTier, VerbosityChecker, VerbosityProfile};
use vdp_core::{
    Confidence, Importance, Keyframe, KeyframeRole, Profile, Scene, SummaryCue, Violation, ViolationKind,
};

/// Schema bound on keyframes per shot
const MAX_KEYFRAMES: usize = 4;
/// Schema bound on composition notes per shot
const MAX_NOTES: usize = 3;

// ============================================================================
// OUTCOME TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairPhase {
    PostQa,
    LastMile,
}

/// Passes actually used in each phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairPasses {
    pub post_qa: u32,
    pub last_mile: u32,
}

impl RepairPasses {
    pub fn total(&self) -> u32 {
        self.post_qa + self.last_mile
    }
}

/// One additive change made to the working copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairAction {
    pub phase: RepairPhase,
    pub pass: u32,
    /// Violation the action addresses
    pub violation: ViolationKind,
    /// Path of the added element
    pub path: String,
    pub description: String,
}

/// A detail-floor violation left unresolved after the pass budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaFlag {
    pub scene_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_id: Option<String>,
    pub violation: ViolationKind,
    pub path: String,
    pub message: String,
}

/// Field-level confidence downgrade, kept separate from the repaired profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceOverride {
    /// e.g. `scenes[2].shots[0].confidence`
    pub path: String,
    pub scene_id: String,
    pub shot_id: String,
    pub from: Confidence,
    pub to: Confidence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// Repaired working copy, confidence overrides not yet applied
    pub profile: Profile,
    pub passes: RepairPasses,
    pub actions: Vec<RepairAction>,
    pub qa_flags: Vec<QaFlag>,
    pub confidence_overrides: Vec<ConfidenceOverride>,
}

impl RepairOutcome {
    /// The repaired profile with every confidence override applied.
    pub fn into_profile(self) -> Profile {
        let mut profile = self.profile;
        apply_confidence_overrides(&mut profile, &self.confidence_overrides);
        profile
    }
}

/// Apply overrides by `(scene_id, shot_id)`; unknown ids are ignored.
pub fn apply_confidence_overrides(profile: &mut Profile, overrides: &[ConfidenceOverride]) {
    for o in overrides {
        let shot = profile
            .scenes
            .iter_mut()
            .filter(|s| s.scene_id == o.scene_id)
            .flat_map(|s| s.shots.iter_mut())
            .find(|s| s.shot_id == o.shot_id);
        if let Some(shot) = shot {
            shot.confidence = o.to;
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RepairEngine {
    checker: VerbosityChecker,
    policy: Box<dyn RepairPolicy>,
}

impl Default for RepairEngine {
    fn default() -> Self {
        Self::new(VerbosityProfile::strict())
    }
}

impl RepairEngine {
    pub fn new(profile: VerbosityProfile) -> Self {
        Self { checker: VerbosityChecker::new(profile), policy: Box::new(TemplatePolicy) }
    }

    pub fn with_policy(mut self, policy: impl RepairPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn checker(&self) -> &VerbosityChecker {
        &self.checker
    }

    /// Repair `profile` against `violations`. Fatal kinds in the list are
    /// ignored; they never reach the engine in a pipeline run.
    pub fn repair(&self, profile: &Profile, violations: &[Violation]) -> RepairOutcome {
        let limits = self.checker.profile().passes;
        let mut working = profile.clone();
        let mut actions = Vec::new();
        let mut passes = RepairPasses::default();

        // Reported violations may be stale; only what the checker still finds
        // on the scenes they name is worked on or demoted.
        let reported: Vec<Violation> = violations.iter().filter(|v| v.kind.is_auto_fixable()).cloned().collect();
        let mut pending = self.recheck(&working, &reported);

        // === POST_QA ===
        while !pending.is_empty() && passes.post_qa < limits.post_qa {
            let pass = passes.post_qa + 1;
            let applied = self.run_pass(RepairPhase::PostQa, pass, &mut working, &pending, &mut actions);
            if applied == 0 {
                break;
            }
            passes.post_qa = pass;
            pending = self.recheck(&working, &pending);
            debug!(pass, applied, remaining = pending.len(), "post_qa repair pass");
        }

        // === LAST_MILE ===
        while passes.last_mile < limits.last_mile {
            let eligible: Vec<Violation> =
                pending.iter().filter(|v| self.last_mile_eligible(&working, v)).cloned().collect();
            if eligible.is_empty() {
                break;
            }
            let pass = passes.last_mile + 1;
            let applied = self.run_pass(RepairPhase::LastMile, pass, &mut working, &eligible, &mut actions);
            if applied == 0 {
                break;
            }
            passes.last_mile = pass;
            pending = self.recheck(&working, &pending);
            debug!(pass, applied, remaining = pending.len(), "last_mile repair pass");
        }

        let (qa_flags, confidence_overrides) = self.demote(&working, &pending);
        if !qa_flags.is_empty() {
            warn!(unresolved = qa_flags.len(), "detail-floor violations left after repair budget");
        }

        RepairOutcome { profile: working, passes, actions, qa_flags, confidence_overrides }
    }

    fn run_pass(
        &self,
        phase: RepairPhase,
        pass: u32,
        working: &mut Profile,
        violations: &[Violation],
        actions: &mut Vec<RepairAction>,
    ) -> usize {
        let mut applied = 0;
        for violation in violations {
            let Some(index) = violation.scene else {
                continue;
            };
            let Some(scene) = working.scenes.get_mut(index) else {
                continue;
            };
            if let Some((path, description)) = self.act(index, scene, violation) {
                actions.push(RepairAction { phase, pass, violation: violation.kind, path, description });
                applied += 1;
            }
        }
        applied
    }

    /// Take one action for `violation` if it is still open on the current
    /// state of `scene`. Returns the path and text of what was added.
    fn act(&self, index: usize, scene: &mut Scene, violation: &Violation) -> Option<(String, String)> {
        match violation.kind {
            ViolationKind::KeyframeFloorViolation => match violation.shot {
                Some(j) => self.add_shot_keyframe(index, scene, j),
                None => self.add_scene_keyframe(index, scene),
            },
            ViolationKind::NoteFloorViolation => self.add_note(index, scene),
            ViolationKind::SummaryLengthViolation => self.extend_summary(index, scene),
            ViolationKind::ClosureKeyframeMissing => self.add_closure(index, scene, violation.shot?),
            ViolationKind::ImportanceMismatch => {
                let req = self.checker.requirements(scene);
                if req.must_be_critical && scene.importance.is_none() {
                    scene.importance = Some(Importance::Critical);
                    Some((format!("scenes[{}].importance", index), "critical".to_string()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    // === Keyframes ===

    fn add_scene_keyframe(&self, index: usize, scene: &mut Scene) -> Option<(String, String)> {
        let req = self.checker.requirements(scene);
        let missing = req.required_roles.iter().copied().find(|r| !scene.has_keyframe_role(*r));
        if scene.keyframe_count() >= req.floor.min_keyframes && missing.is_none() {
            return None;
        }
        let role = missing.unwrap_or_else(|| filler_role(scene.has_keyframe_role(KeyframeRole::Peak)));

        let with_room: Vec<usize> =
            (0..scene.shots.len()).filter(|j| scene.shots[*j].keyframes.len() < MAX_KEYFRAMES).collect();
        let target = match role {
            KeyframeRole::Start => with_room.first().copied(),
            KeyframeRole::End => with_room.last().copied(),
            _ => with_room.iter().copied().min_by_key(|j| scene.shots[*j].keyframes.len()),
        }?;
        Some(self.insert_keyframe(index, scene, target, role))
    }

    fn add_shot_keyframe(&self, index: usize, scene: &mut Scene, j: usize) -> Option<(String, String)> {
        let rule = &self.checker.profile().hook_closeup;
        let shot = scene.shots.get(j)?;
        let missing = rule.required_roles.iter().copied().find(|r| !shot.has_role(*r));
        if shot.keyframes.len() >= rule.min_keyframes && missing.is_none() {
            return None;
        }
        if shot.keyframes.len() >= MAX_KEYFRAMES {
            return None;
        }
        let role = missing.unwrap_or_else(|| filler_role(shot.has_role(KeyframeRole::Peak)));
        Some(self.insert_keyframe(index, scene, j, role))
    }

    fn insert_keyframe(&self, index: usize, scene: &mut Scene, j: usize, role: KeyframeRole) -> (String, String) {
        let desc = self.policy.keyframe_desc(scene, &scene.shots[j], role);
        let shot = &mut scene.shots[j];
        let at = shot.keyframes.iter().position(|k| k.role > role).unwrap_or(shot.keyframes.len());

        let timed = !shot.keyframes.is_empty() && shot.keyframes.iter().all(|k| k.t_rel_shot.is_some());
        let t_rel_shot = timed.then(|| {
            let before = at.checked_sub(1).and_then(|p| shot.keyframes[p].t_rel_shot).unwrap_or(0.0);
            let after = shot.keyframes.get(at).and_then(|k| k.t_rel_shot).unwrap_or_else(|| shot.span());
            round_ms((before + after) / 2.0)
        });

        shot.keyframes.insert(at, Keyframe { role, t_rel_shot, desc: desc.clone() });
        (format!("scenes[{}].shots[{}].keyframes[{}]", index, j, at), format!("{} keyframe: {}", role, desc))
    }

    fn add_closure(&self, index: usize, scene: &mut Scene, j: usize) -> Option<(String, String)> {
        let shot = scene.shots.get(j)?;
        if self.checker.has_closure(shot) || shot.keyframes.len() >= MAX_KEYFRAMES {
            return None;
        }
        let desc = self.policy.closure_desc(scene, shot);
        let timed = !shot.keyframes.is_empty() && shot.keyframes.iter().all(|k| k.t_rel_shot.is_some());
        let t_rel_shot = timed.then(|| round_ms(shot.span()));

        let shot = &mut scene.shots[j];
        shot.keyframes.push(Keyframe { role: KeyframeRole::End, t_rel_shot, desc: desc.clone() });
        Some((
            format!("scenes[{}].shots[{}].keyframes[{}]", index, j, shot.keyframes.len() - 1),
            format!("closure keyframe: {}", desc),
        ))
    }

    // === Notes ===

    fn add_note(&self, index: usize, scene: &mut Scene) -> Option<(String, String)> {
        let req = self.checker.requirements(scene);
        if scene.max_note_count() >= req.floor.min_notes {
            return None;
        }
        // The best-annotated shot with room: one more note there moves the maximum.
        let j = (0..scene.shots.len())
            .filter(|j| scene.shots[*j].note_count() < MAX_NOTES)
            .rev()
            .max_by_key(|j| scene.shots[*j].note_count())?;

        let shot = &scene.shots[j];
        let existing = shot.composition.notes.clone().unwrap_or_default();
        let note = self
            .policy
            .composition_notes(scene, shot)
            .into_iter()
            .find(|n| !existing.contains(n))?;

        let notes = scene.shots[j].composition.notes.get_or_insert_with(Vec::new);
        notes.push(note.clone());
        Some((
            format!("scenes[{}].shots[{}].composition.notes[{}]", index, j, notes.len() - 1),
            format!("note: {}", note),
        ))
    }

    // === Summary ===

    fn extend_summary(&self, index: usize, scene: &mut Scene) -> Option<(String, String)> {
        let req = self.checker.requirements(scene);
        let lexicon = &self.checker.profile().cues;
        let summary = &scene.narrative_unit.summary;

        let missing = lexicon.missing(&req.required_cues, scene);
        let short = summary.chars().count() < req.floor.min_summary_chars;
        if missing.is_empty() && !short {
            return None;
        }

        let cue = SummaryCue::ALL
            .iter()
            .copied()
            .find(|c| missing.contains(c))
            .or_else(|| SummaryCue::ALL.iter().copied().find(|c| !lexicon.mentions(*c, summary, scene)));
        let clause = match cue {
            Some(cue) => self.policy.summary_clause(scene, cue),
            None => SummaryCue::ALL
                .iter()
                .map(|c| self.policy.summary_clause(scene, *c))
                .find(|clause| !summary.contains(clause.as_str()))?,
        };

        let summary = &mut scene.narrative_unit.summary;
        if !summary.is_empty() && !summary.ends_with(char::is_whitespace) {
            summary.push(' ');
        }
        summary.push_str(&clause);
        Some((format!("scenes[{}].narrative_unit.summary", index), format!("clause: {}", clause)))
    }

    // === Pass bookkeeping ===

    /// Re-run the verbosity checker on every scene touched by `previous`.
    fn recheck(&self, working: &Profile, previous: &[Violation]) -> Vec<Violation> {
        let scenes: BTreeSet<usize> = previous.iter().filter_map(|v| v.scene).collect();
        scenes
            .into_iter()
            .filter_map(|i| working.scenes.get(i).map(|s| self.checker.check_scene(i, s)))
            .flatten()
            .collect()
    }

    /// LAST_MILE covers long-scene keyframe floors, medium-scene note floors
    /// and summary completeness.
    fn last_mile_eligible(&self, working: &Profile, violation: &Violation) -> bool {
        let Some(scene) = violation.scene.and_then(|i| working.scenes.get(i)) else {
            return false;
        };
        let tier = self.checker.profile().tier(scene.duration_sec);
        match violation.kind {
            ViolationKind::KeyframeFloorViolation => tier == DurationTier::Long,
            ViolationKind::NoteFloorViolation => tier == DurationTier::Medium,
            ViolationKind::SummaryLengthViolation => true,
            _ => false,
        }
    }

    fn demote(&self, working: &Profile, unresolved: &[Violation]) -> (Vec<QaFlag>, Vec<ConfidenceOverride>) {
        let mut flags = Vec::new();
        let mut overrides: Vec<ConfidenceOverride> = Vec::new();

        for violation in unresolved {
            let Some(i) = violation.scene else {
                continue;
            };
            let Some(scene) = working.scenes.get(i) else {
                continue;
            };
            let shot_id = violation.shot.and_then(|j| scene.shots.get(j)).map(|s| s.shot_id.clone());
            flags.push(QaFlag {
                scene_id: scene.scene_id.clone(),
                shot_id,
                violation: violation.kind,
                path: violation.path.clone(),
                message: violation.message.clone(),
            });

            let shots: Vec<usize> = match violation.shot {
                Some(j) => vec![j],
                None => (0..scene.shots.len()).collect(),
            };
            for j in shots {
                let Some(shot) = scene.shots.get(j) else {
                    continue;
                };
                let path = format!("scenes[{}].shots[{}].confidence", i, j);
                if shot.confidence == Confidence::Low || overrides.iter().any(|o| o.path == path) {
                    continue;
                }
                overrides.push(ConfidenceOverride {
                    path,
                    scene_id: scene.scene_id.clone(),
                    shot_id: shot.shot_id.clone(),
                    from: shot.confidence,
                    to: Confidence::Low,
                });
            }
        }
        (flags, overrides)
    }
}

/// Role used when no specific role is required: peak first, then mid.
fn filler_role(has_peak: bool) -> KeyframeRole {
    if has_peak {
        KeyframeRole::Mid
    } else {
        KeyframeRole::Peak
    }
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Repair with the `strict@1.0` profile and the template policy.
pub fn repair(profile: &Profile, violations: &[Violation]) -> RepairOutcome {
    RepairEngine::default().repair(profile, violations)
}
