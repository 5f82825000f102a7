//! Integration tests for the session lifecycle against persistent storage.

use pulsetrack_core::{
    evaluate, Database, Frame, KvSessionRepository, RuleThresholds, Session, SessionEvent,
    SessionRepository, Config,
};

const MINUTE: i64 = 60_000;

fn file_repo(dir: &tempfile::TempDir) -> KvSessionRepository<Database> {
    KvSessionRepository::new(Database::open_at(&dir.path().join("pulsetrack.db")).unwrap())
}

#[test]
fn begin_end_survives_reload() {
    let dir = tempfile::tempdir().unwrap();

    // First process: begin only.
    {
        let repo = file_repo(&dir);
        let mut session = repo.load_session().unwrap();
        session.begin(1_000);
        repo.save_session(&session).unwrap();
    }

    // Second process: end and record.
    {
        let repo = file_repo(&dir);
        let mut session = repo.load_session().unwrap();
        assert!(session.is_active());
        let ev = session.end(1_000 + 90_000).unwrap();
        assert!(matches!(ev, SessionEvent::IntervalRecorded { .. }));
        repo.save_session(&session).unwrap();
    }

    let repo = file_repo(&dir);
    let session = repo.load_session().unwrap();
    assert!(!session.is_active());
    assert_eq!(session.intervals().len(), 1);
    assert_eq!(session.intervals()[0].duration_ms, 90_000);
}

#[test]
fn premature_end_leaves_history_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(&dir);
    let mut session = Session::new();
    session.begin(0);
    session.end(2_000);
    session.begin(10_000);
    session.end(10_999);
    repo.save_session(&session).unwrap();

    let reloaded = repo.load_session().unwrap();
    assert_eq!(reloaded.intervals().len(), 1);
}

#[test]
fn clear_then_reload_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = file_repo(&dir);
    let mut session = Session::new();
    for i in 0..3 {
        session.begin(i * 5 * MINUTE);
        session.end(i * 5 * MINUTE + MINUTE);
    }
    repo.save_session(&session).unwrap();

    session.clear();
    repo.save_session(&session).unwrap();

    let repo = file_repo(&dir);
    assert!(repo.load().unwrap().is_empty());
    assert!(repo.load_session().unwrap().intervals().is_empty());
}

#[test]
fn live_session_reaches_threshold() {
    // Thirteen one-minute intervals every five minutes cover an hour.
    let rules = RuleThresholds::default();
    let mut session = Session::new();
    for i in 0..13 {
        session.begin(i * 5 * MINUTE);
        session.end(i * 5 * MINUTE + MINUTE);
    }
    let end = 12 * 5 * MINUTE + MINUTE;
    let r = evaluate(session.intervals(), end, &rules);
    assert_eq!(r.qualifying_start, Some(0));
    assert!(r.threshold_met);

    // Opening a new interval does not change the streak start.
    session.begin(end + 2 * MINUTE);
    let frame = Frame::compute(&session, end + 3 * MINUTE, &Config::default(), Some(800.0));
    assert_eq!(frame.streak.qualifying_start, Some(0));
    assert!(frame.badges.all());
    assert!(frame.layout.segments.iter().any(|s| matches!(
        s,
        pulsetrack_core::Segment::Bump { active: true, .. }
    )));
}

#[test]
fn broken_pattern_restarts_streak() {
    let rules = RuleThresholds::default();
    let mut session = Session::new();
    session.begin(0);
    session.end(MINUTE);
    // Twenty minutes later: too far apart.
    session.begin(20 * MINUTE);
    session.end(21 * MINUTE);
    session.begin(24 * MINUTE);
    session.end(25 * MINUTE);

    let r = evaluate(session.intervals(), 30 * MINUTE, &rules);
    assert_eq!(r.qualifying_start, Some(20 * MINUTE));
    assert_eq!(r.streak_duration_ms, 10 * MINUTE);
    assert!(!r.threshold_met);
}
