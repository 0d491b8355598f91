//! Verbosity / Detail-Floor Checker
//!
//! Minimum annotation density per scene, scaled by duration tier and
//! narrative signal. Everything reported here is recoverable and routed to
//! the repair engine.

use crate::cues::{contains_any, role_matches};
use crate::profile::{DetailFloor, DurationTier, VerbosityProfile};
use serde::Serialize;
use vdp_core::{
    FloorDetail, Importance, KeyframeRole, Profile, Scene, Shot, ShotSize, SummaryCue, Violation, ViolationKind,
};

/// Effective requirements for one scene after tier and micro rules combine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRequirements {
    pub tier: DurationTier,
    pub micro: bool,
    pub floor: DetailFloor,
    /// Keyframe roles that must appear somewhere in the scene
    pub required_roles: Vec<KeyframeRole>,
    /// Summary cues the scene must mention
    pub required_cues: Vec<SummaryCue>,
    /// ECU shots in this scene need a closure beat
    pub hook_closeup: bool,
    pub must_be_critical: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VerbosityChecker {
    profile: VerbosityProfile,
}

impl VerbosityChecker {
    pub fn new(profile: VerbosityProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &VerbosityProfile {
        &self.profile
    }

    pub fn is_micro(&self, scene: &Scene) -> bool {
        let rule = &self.profile.micro;
        scene.duration_sec <= rule.max_duration_sec
            || role_matches(&scene.narrative_unit.narrative_role, &rule.roles)
            || scene
                .narrative_unit
                .comedic_device
                .iter()
                .any(|d| rule.comedic_devices.iter().any(|m| m.eq_ignore_ascii_case(d)))
    }

    pub fn requirements(&self, scene: &Scene) -> SceneRequirements {
        let profile = &self.profile;
        let tier = profile.tier(scene.duration_sec);
        let micro = self.is_micro(scene);

        let mut floor = profile.floor(tier);
        let mut required_roles = Vec::new();
        if micro {
            floor.min_keyframes = floor.min_keyframes.max(profile.micro.min_keyframes);
            floor.min_notes = floor.min_notes.max(profile.micro.min_notes);
            required_roles = profile.micro.required_roles.clone();
        }

        let role = &scene.narrative_unit.narrative_role;
        SceneRequirements {
            tier,
            micro,
            floor,
            required_roles,
            required_cues: profile.required_cues.for_tier(tier).to_vec(),
            hook_closeup: role_matches(role, &profile.hook_closeup.roles),
            must_be_critical: role_matches(role, &profile.critical_roles),
        }
    }

    /// Detail-floor violations for the scene at `index`.
    pub fn check_scene(&self, index: usize, scene: &Scene) -> Vec<Violation> {
        let req = self.requirements(scene);
        let mut out = Vec::new();

        // === Keyframes (summed over shots) ===
        let actual = scene.keyframe_count();
        let missing_roles: Vec<KeyframeRole> =
            req.required_roles.iter().copied().filter(|r| !scene.has_keyframe_role(*r)).collect();
        if actual < req.floor.min_keyframes || !missing_roles.is_empty() {
            let mut message = format!("{} keyframes, {} required", actual, req.floor.min_keyframes);
            if !missing_roles.is_empty() {
                message.push_str(&format!("; missing roles {}", join_roles(&missing_roles)));
            }
            out.push(
                Violation::new(ViolationKind::KeyframeFloorViolation, format!("scenes[{}].shots", index), message)
                    .expected(format!(">= {} keyframes", req.floor.min_keyframes))
                    .actual(actual.to_string())
                    .in_scene(index)
                    .with_detail(FloorDetail::Keyframes {
                        required: req.floor.min_keyframes,
                        actual,
                        missing_roles,
                    }),
            );
        }

        // === Composition notes (best shot) ===
        let notes = scene.max_note_count();
        if notes < req.floor.min_notes {
            out.push(
                Violation::new(
                    ViolationKind::NoteFloorViolation,
                    format!("scenes[{}].shots", index),
                    format!("best-annotated shot has {} composition notes", notes),
                )
                .expected(format!(">= {} notes on one shot", req.floor.min_notes))
                .actual(notes.to_string())
                .in_scene(index)
                .with_detail(FloorDetail::Notes { required: req.floor.min_notes, actual: notes }),
            );
        }

        // === Summary ===
        let summary = &scene.narrative_unit.summary;
        let chars = summary.chars().count();
        let missing_cues = self.profile.cues.missing(&req.required_cues, scene);
        if chars < req.floor.min_summary_chars || !missing_cues.is_empty() {
            let message = if missing_cues.is_empty() {
                format!("summary has {} characters", chars)
            } else {
                let cues: Vec<String> = missing_cues.iter().map(ToString::to_string).collect();
                format!("summary has {} characters and does not mention {}", chars, cues.join(", "))
            };
            out.push(
                Violation::new(
                    ViolationKind::SummaryLengthViolation,
                    format!("scenes[{}].narrative_unit.summary", index),
                    message,
                )
                .expected(format!(">= {} characters", req.floor.min_summary_chars))
                .actual(chars.to_string())
                .in_scene(index)
                .with_detail(FloorDetail::Summary {
                    required_chars: req.floor.min_summary_chars,
                    actual_chars: chars,
                    missing_cues,
                }),
            );
        }

        // === Hook close-ups ===
        if req.hook_closeup {
            self.check_hook_closeups(index, scene, &mut out);
        }

        // === Priority ===
        if req.must_be_critical && scene.importance != Some(Importance::Critical) {
            let actual = match scene.importance {
                Some(Importance::Normal) => "normal",
                _ => "absent",
            };
            out.push(
                Violation::new(
                    ViolationKind::ImportanceMismatch,
                    format!("scenes[{}].importance", index),
                    format!("{} scenes are critical", scene.narrative_unit.narrative_role),
                )
                .expected("critical")
                .actual(actual)
                .in_scene(index),
            );
        }

        out
    }

    fn check_hook_closeups(&self, index: usize, scene: &Scene, out: &mut Vec<Violation>) {
        let rule = &self.profile.hook_closeup;
        for (j, shot) in scene.shots.iter().enumerate() {
            if shot.camera.shot != ShotSize::ExtremeCloseUp {
                continue;
            }
            let path = format!("scenes[{}].shots[{}].keyframes", index, j);

            let actual = shot.keyframes.len();
            let missing_roles: Vec<KeyframeRole> =
                rule.required_roles.iter().copied().filter(|r| !shot.has_role(*r)).collect();
            if actual < rule.min_keyframes || !missing_roles.is_empty() {
                out.push(
                    Violation::new(
                        ViolationKind::KeyframeFloorViolation,
                        &path,
                        format!("hook close-up {} has {} keyframes", shot.shot_id, actual),
                    )
                    .expected(format!(">= {} keyframes with start, peak, end", rule.min_keyframes))
                    .actual(actual.to_string())
                    .in_shot(index, j)
                    .with_detail(FloorDetail::Keyframes { required: rule.min_keyframes, actual, missing_roles }),
                );
            }

            if !self.has_closure(shot) {
                out.push(
                    Violation::new(
                        ViolationKind::ClosureKeyframeMissing,
                        &path,
                        format!("hook close-up {} has no end keyframe denoting closure", shot.shot_id),
                    )
                    .expected("end keyframe mentioning a pause, freeze or held beat")
                    .in_shot(index, j),
                );
            }
        }
    }

    /// Whether an `end` keyframe of the shot describes a closure beat.
    pub fn has_closure(&self, shot: &Shot) -> bool {
        let keywords = &self.profile.hook_closeup.closure_keywords;
        shot.keyframes
            .iter()
            .any(|k| k.role == KeyframeRole::End && contains_any(&k.desc, keywords))
    }

    /// Detail-floor violations for every scene of `profile`.
    pub fn check_profile(&self, profile: &Profile) -> Vec<Violation> {
        profile
            .scenes
            .iter()
            .enumerate()
            .flat_map(|(i, scene)| self.check_scene(i, scene))
            .collect()
    }
}

/// Check one scene against the `strict@1.0` profile.
pub fn check_verbosity(index: usize, scene: &Scene) -> Vec<Violation> {
    VerbosityChecker::default().check_scene(index, scene)
}

fn join_roles(roles: &[KeyframeRole]) -> String {
    roles.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdp_core::Keyframe;

    fn sample() -> Profile {
        serde_json::from_str(include_str!("../../../fixtures/sample_vdp.json")).unwrap()
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_sample_meets_floors() {
        let violations = VerbosityChecker::default().check_profile(&sample());
        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn test_requirements_per_tier() {
        let checker = VerbosityChecker::default();
        let profile = sample();

        let hook = checker.requirements(&profile.scenes[0]);
        assert_eq!(hook.tier, DurationTier::Short);
        assert!(hook.micro);
        assert_eq!(hook.floor.min_keyframes, 3);
        assert_eq!(hook.floor.min_notes, 2);
        assert_eq!(hook.floor.min_summary_chars, 60);
        assert!(hook.hook_closeup);
        assert!(hook.required_cues.is_empty());

        let setup = checker.requirements(&profile.scenes[1]);
        assert_eq!(setup.tier, DurationTier::Medium);
        assert!(!setup.micro);
        assert!(setup.required_roles.is_empty());
        assert_eq!(
            setup.required_cues,
            vec![SummaryCue::CameraMovement, SummaryCue::Lighting, SummaryCue::AudioMood]
        );

        let punchline = checker.requirements(&profile.scenes[2]);
        assert_eq!(punchline.tier, DurationTier::Long);
        assert!(punchline.micro);
        assert_eq!(punchline.floor.min_keyframes, 4);
        assert_eq!(punchline.required_cues, vec![SummaryCue::CameraMovement, SummaryCue::LocationTime]);
        assert!(punchline.must_be_critical);
    }

    #[test]
    fn test_long_scene_keyframe_floor() {
        let mut scene = sample().scenes[2].clone();
        scene.shots[1].keyframes.truncate(1);

        let violations = check_verbosity(2, &scene);
        assert_eq!(kinds(&violations), vec![ViolationKind::KeyframeFloorViolation]);
        assert_eq!(
            violations[0].detail,
            Some(FloorDetail::Keyframes { required: 4, actual: 3, missing_roles: vec![KeyframeRole::End] })
        );
    }

    #[test]
    fn test_note_floor_uses_best_shot() {
        let mut scene = sample().scenes[1].clone();
        scene.shots[0].composition.notes = Some(vec!["one".into()]);
        assert_eq!(kinds(&check_verbosity(1, &scene)), vec![ViolationKind::NoteFloorViolation]);

        scene.shots[1].composition.notes = Some(vec!["one".into(), "two".into()]);
        assert!(check_verbosity(1, &scene).is_empty());
    }

    #[test]
    fn test_summary_cues_for_long_scenes() {
        let mut scene = sample().scenes[2].clone();
        scene.narrative_unit.summary = "The owner finally arrives, sits down, and silently eats the whole bowl himself \
                                        while the diner stares in total, speechless disbelief."
            .into();

        let violations = check_verbosity(2, &scene);
        assert_eq!(kinds(&violations), vec![ViolationKind::SummaryLengthViolation]);
        match &violations[0].detail {
            Some(FloorDetail::Summary { missing_cues, .. }) => {
                assert_eq!(missing_cues, &vec![SummaryCue::CameraMovement, SummaryCue::LocationTime])
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_summary_cues_for_medium_scenes() {
        let mut scene = sample().scenes[1].clone();
        assert_eq!(scene.duration_sec, 5.0);
        scene.narrative_unit.summary = "The diner sets down the spoon and waits at the table while checking \
                                        the clock for the owner to finally come."
            .into();

        let violations = check_verbosity(1, &scene);
        assert_eq!(kinds(&violations), vec![ViolationKind::SummaryLengthViolation]);
        match &violations[0].detail {
            Some(FloorDetail::Summary { missing_cues, .. }) => assert_eq!(
                missing_cues,
                &vec![SummaryCue::CameraMovement, SummaryCue::Lighting, SummaryCue::AudioMood]
            ),
            other => panic!("unexpected detail {:?}", other),
        }

        scene.narrative_unit.summary.push_str(" Static shot under dim light, the beat keeps playing.");
        assert!(check_verbosity(1, &scene).is_empty());
    }

    #[test]
    fn test_hook_closeup_requires_closure() {
        let mut scene = sample().scenes[0].clone();
        scene.shots[0].keyframes[2] = Keyframe {
            role: KeyframeRole::End,
            t_rel_shot: None,
            desc: "Spoon reaches the broth".into(),
        };

        let violations = check_verbosity(0, &scene);
        assert_eq!(kinds(&violations), vec![ViolationKind::ClosureKeyframeMissing]);
        assert_eq!((violations[0].scene, violations[0].shot), (Some(0), Some(0)));
    }

    #[test]
    fn test_hook_closeup_shot_needs_three_roles() {
        let mut scene = sample().scenes[0].clone();
        scene.shots[0].keyframes.remove(1);

        let violations = check_verbosity(0, &scene);
        let kinds = kinds(&violations);
        assert_eq!(kinds.iter().filter(|k| **k == ViolationKind::KeyframeFloorViolation).count(), 2);
        assert!(violations.iter().any(|v| v.shot == Some(0)));
    }

    #[test]
    fn test_punchline_must_be_critical() {
        let mut scene = sample().scenes[2].clone();
        scene.importance = None;
        let violations = check_verbosity(2, &scene);
        assert_eq!(kinds(&violations), vec![ViolationKind::ImportanceMismatch]);
        assert_eq!(violations[0].actual.as_deref(), Some("absent"));
    }

    #[test]
    fn test_micro_by_comedic_device() {
        let checker = VerbosityChecker::default();
        let mut scene = sample().scenes[1].clone();
        assert!(!checker.is_micro(&scene));
        scene.narrative_unit.comedic_device.push("expectation_subversion".into());
        assert!(checker.is_micro(&scene));

        let violations = checker.check_scene(1, &scene);
        let detail = violations
            .iter()
            .find_map(|v| match &v.detail {
                Some(FloorDetail::Keyframes { missing_roles, .. }) => Some(missing_roles.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(detail, vec![KeyframeRole::Peak]);
    }
}
