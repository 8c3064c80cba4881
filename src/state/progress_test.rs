use super::*;
use crate::net::types::{Npc, NpcStatus};

fn npcs(prefix: &str, count: usize, status: NpcStatus) -> Vec<Npc> {
    (0..count)
        .map(|i| Npc {
            id: format!("{prefix}{i}"),
            name: format!("{prefix}{i}"),
            role: String::new(),
            bio: String::new(),
            avatar_color: String::new(),
            status,
        })
        .collect()
}

fn status(safe: usize, convincing: usize, unknown: usize, game_won: bool) -> GameStatus {
    GameStatus {
        safe_count: safe,
        total_npcs: safe + convincing + unknown,
        safe_npcs: npcs("s", safe, NpcStatus::Safe),
        needs_convincing: npcs("c", convincing, NpcStatus::NeedsConvincing),
        unknown: npcs("u", unknown, NpcStatus::Unknown),
        game_won,
    }
}

#[test]
fn fresh_game_shows_zero_of_ten() {
    let mut tracker = ProgressTracker::default();
    let update = tracker.apply(status(0, 0, 10, false)).unwrap();
    assert_eq!(update.progress, Progress { safe: 0, total: 10 });
    assert_eq!(update.progress.to_string(), "0/10 NPCs safe");
    assert!(update.progress.fraction().abs() < f64::EPSILON);
    assert!(!update.game_won);
}

#[test]
fn fraction_and_percent_track_safe_share() {
    let progress = Progress { safe: 3, total: 4 };
    assert!((progress.fraction() - 0.75).abs() < f64::EPSILON);
    assert!((progress.percent() - 75.0).abs() < f64::EPSILON);
    assert!(Progress::default().fraction().abs() < f64::EPSILON);
}

#[test]
fn apply_reports_win() {
    let mut tracker = ProgressTracker::default();
    let update = tracker.apply(status(10, 0, 0, true)).unwrap();
    assert!(update.game_won);
    assert_eq!(tracker.progress(), Progress { safe: 10, total: 10 });
}

#[test]
fn invalid_snapshot_keeps_previous_one() {
    let mut tracker = ProgressTracker::default();
    tracker.apply(status(2, 3, 5, false)).unwrap();

    let mut broken = status(4, 0, 6, false);
    broken.safe_count = 5;
    assert!(tracker.apply(broken).is_err());
    assert_eq!(tracker.progress(), Progress { safe: 2, total: 10 });
}

#[test]
fn reset_forgets_snapshot() {
    let mut tracker = ProgressTracker::default();
    tracker.apply(status(1, 0, 1, false)).unwrap();
    tracker.reset();
    assert!(tracker.snapshot().is_none());
    assert_eq!(tracker.progress(), Progress::default());
}
