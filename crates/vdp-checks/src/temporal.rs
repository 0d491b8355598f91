//! Temporal Consistency Checker
//!
//! Scene ordering and adjacency, shot containment, and the duration
//! invariant. Runs on a structurally valid profile; never mutates it.

use tracing::debug;
use vdp_core::{Profile, Scene, Violation, ViolationKind, TIME_EPSILON};

/// Check every temporal invariant and return all violations found.
pub fn check_temporal(profile: &Profile) -> Vec<Violation> {
    let mut out = Vec::new();

    for (i, scene) in profile.scenes.iter().enumerate() {
        check_scene_interval(i, scene, &mut out);
        check_shots(i, scene, &mut out);
    }
    check_scene_sequence(&profile.scenes, &mut out);

    debug!(violations = out.len(), "temporal check finished");
    out
}

fn check_scene_interval(i: usize, scene: &Scene, out: &mut Vec<Violation>) {
    if scene.time_start >= scene.time_end {
        out.push(
            Violation::new(
                ViolationKind::InvalidInterval,
                format!("scenes[{}]", i),
                "scene must start before it ends",
            )
            .expected("time_start < time_end")
            .actual(format!("[{}, {}]", scene.time_start, scene.time_end))
            .in_scene(i),
        );
    }

    let span = scene.span();
    if (scene.duration_sec - span).abs() > TIME_EPSILON {
        out.push(
            Violation::new(
                ViolationKind::DurationMismatchViolation,
                format!("scenes[{}].duration_sec", i),
                "duration_sec disagrees with time_end - time_start",
            )
            .expected(format!("{:.3}", span))
            .actual(format!("{}", scene.duration_sec))
            .in_scene(i),
        );
    }
}

fn check_scene_sequence(scenes: &[Scene], out: &mut Vec<Violation>) {
    for (i, pair) in scenes.windows(2).enumerate() {
        if pair[1].time_start < pair[0].time_start {
            out.push(
                Violation::new(
                    ViolationKind::SceneOrderViolation,
                    format!("scenes[{}].time_start", i + 1),
                    format!("scene starts before scenes[{}]", i),
                )
                .expected(format!(">= {}", pair[0].time_start))
                .actual(format!("{}", pair[1].time_start))
                .in_scene(i + 1),
            );
        }
    }

    // Adjacency is judged in chronological order so a misordered list still
    // reports its real gaps.
    let mut order: Vec<usize> = (0..scenes.len()).collect();
    order.sort_by(|a, b| scenes[*a].time_start.total_cmp(&scenes[*b].time_start));

    for pair in order.windows(2) {
        let (prev, next) = (&scenes[pair[0]], &scenes[pair[1]]);
        let delta = next.time_start - prev.time_end;
        if delta.abs() <= TIME_EPSILON {
            continue;
        }
        let what = if delta > 0.0 { "gap" } else { "overlap" };
        let (from, to) = if delta > 0.0 {
            (prev.time_end, next.time_start)
        } else {
            (next.time_start, prev.time_end)
        };
        out.push(
            Violation::new(
                ViolationKind::GapOrOverlapViolation,
                format!("scenes[{}].time_start", pair[1]),
                format!(
                    "{} of {:.3}s between {} and {} over [{}, {}]",
                    what,
                    delta.abs(),
                    prev.scene_id,
                    next.scene_id,
                    from,
                    to
                ),
            )
            .expected(format!("{}", prev.time_end))
            .actual(format!("{}", next.time_start))
            .in_scene(pair[1]),
        );
    }
}

fn check_shots(i: usize, scene: &Scene, out: &mut Vec<Violation>) {
    let bounds = |j: usize, message: String, expected: String, actual: String| {
        Violation::new(ViolationKind::ShotBoundsViolation, format!("scenes[{}].shots[{}]", i, j), message)
            .expected(expected)
            .actual(actual)
            .in_shot(i, j)
    };

    for (j, shot) in scene.shots.iter().enumerate() {
        let interval = format!("[{}, {}]", shot.start, shot.end);

        if shot.start >= shot.end {
            out.push(bounds(j, "shot must start before it ends".into(), "start < end".into(), interval.clone()));
        }

        if shot.start < scene.time_start - TIME_EPSILON || shot.end > scene.time_end + TIME_EPSILON {
            out.push(bounds(
                j,
                format!("shot {} leaves its scene", shot.shot_id),
                format!("within [{}, {}]", scene.time_start, scene.time_end),
                interval.clone(),
            ));
        }

        if j > 0 {
            let prev = &scene.shots[j - 1];
            if shot.start < prev.end - TIME_EPSILON {
                let message = if shot.start < prev.start {
                    format!("shot {} starts before {}", shot.shot_id, prev.shot_id)
                } else {
                    format!("shot {} overlaps {}", shot.shot_id, prev.shot_id)
                };
                out.push(bounds(j, message, format!("start >= {}", prev.end), interval));
            }
        }
    }
}
