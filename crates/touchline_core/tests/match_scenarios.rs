//! End-to-end match scenarios through the public API.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use touchline_core::{
    format_clock, snapshot, EventType, Match, MatchCommand, MatchError, MatchHistory, PlayerRef,
    Position, SaveManager, SportType, TimedCommand,
};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_767_225_600 + secs, 0).unwrap()
}

fn assert_secs(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 0.001, "expected {expected}, got {actual}");
}

#[test]
fn paused_minute_is_not_played() {
    let p1 = PlayerRef::new("P1", 1);
    let mut m = Match::new("Pause", &[p1.clone()], SportType::Soccer, at(-60));

    m.start_play(at(0));
    m.sub_in(p1.id, at(0)).unwrap();
    m.pause(at(30));
    m.resume(at(90));

    assert_secs(m.seconds_played(p1.id, at(100)).unwrap(), 40.0);
    assert_secs(m.elapsed_seconds(at(100)), 40.0);
}

#[test]
fn swap_at_two_minutes_then_full_time() {
    let p1 = PlayerRef::new("P1", 1);
    let p2 = PlayerRef::new("P2", 2);
    let mut m = Match::new("Swap", &[p1.clone(), p2.clone()], SportType::Soccer, at(-60));

    m.sub_in(p1.id, at(-1)).unwrap();
    m.start_play(at(0));
    m.sub_out(p1.id, at(120)).unwrap();
    m.sub_in(p2.id, at(120)).unwrap();
    m.end(at(300));

    assert_secs(m.entry(p1.id).unwrap().total_seconds_played(), 120.0);
    assert_secs(m.entry(p2.id).unwrap().total_seconds_played(), 180.0);
    assert_eq!(m.final_elapsed_seconds(), Some(300.0));

    // final values never move afterwards
    assert_secs(m.display_seconds(at(86_400)), 300.0);
    assert_secs(m.seconds_played(p2.id, at(86_400)).unwrap(), 180.0);
}

#[test]
fn halftime_once_and_end_during_pause() {
    let squad: Vec<PlayerRef> = (1..=7).map(|n| PlayerRef::new(format!("Kid {n}"), n)).collect();
    let mut m = Match::new("U10 league", &squad, SportType::Soccer, at(-300));
    for p in &squad[..5] {
        m.sub_in(p.id, at(-30)).unwrap();
    }

    m.start_play(at(0));
    m.start_halftime(at(1_500));
    m.start_halftime(at(1_510));
    m.end_halftime(at(1_800));
    assert!(m.clock().has_had_halftime());

    m.start_halftime(at(2_000));
    assert!(!m.is_paused(), "a second halftime is refused");

    m.pause(at(3_000));
    m.end(at(3_600));

    // 3000s of wall time minus 300s halftime; the final pause is not counted
    assert_eq!(m.final_elapsed_seconds(), Some(2_700.0));
    for p in &squad[..5] {
        assert_secs(m.entry(p.id).unwrap().total_seconds_played(), 2_700.0);
    }
    for p in &squad[5..] {
        assert_secs(m.entry(p.id).unwrap().total_seconds_played(), 0.0);
    }
    assert!(m.on_field().is_empty());
}

#[test]
fn mis_tapped_opponent_goal_is_undone() {
    let striker = PlayerRef::new("Striker", 9);
    let mut m = Match::new("Undo", &[striker.clone()], SportType::Soccer, at(0));
    m.start_play(at(0));

    m.add_goal(striker.id, at(100)).unwrap();
    m.add_opponent_goal(at(200));
    m.add_opponent_goal(at(201));
    let removed = m.remove_last_opponent_goal().unwrap();

    assert_secs(removed.match_seconds, 201.0);
    assert_eq!((m.goals_for(), m.goals_against()), (1, 1));
    assert_eq!(m.events().count_of(EventType::OpponentGoal), 1);
}

#[test]
fn suggestions_point_at_the_kids_who_sat_longest() {
    let squad: Vec<PlayerRef> = (1..=6).map(|n| PlayerRef::new(format!("Kid {n}"), n)).collect();
    let ids: Vec<_> = squad.iter().map(|p| p.id).collect();
    let mut m = Match::new("Fair play", &squad, SportType::Basketball, at(-10));
    for id in &ids[..5] {
        m.sub_in(*id, at(-5)).unwrap();
    }
    m.start_play(at(0));
    m.substitute(ids[0], ids[5], at(60)).unwrap();
    m.substitute(ids[1], ids[0], at(400)).unwrap();

    // at 600s: #1 60+200, #2 400, #3-#5 600, #6 540
    let subs = m.suggested_subs(at(600));
    let jerseys: Vec<u32> = subs.iter().map(|s| s.jersey_number).collect();
    assert_eq!(jerseys, vec![1, 2]);
    assert!(subs[0].deficit_seconds > subs[1].deficit_seconds);
}

#[test]
fn position_history_is_logged() {
    let keeper = PlayerRef::new("Keeper", 1);
    let mut m = Match::new("Positions", &[keeper.clone()], SportType::Soccer, at(0));
    m.start_play(at(0));
    m.sub_in(keeper.id, at(0)).unwrap();
    m.change_position(keeper.id, Position::Defender, at(5)).unwrap();
    m.change_position(keeper.id, Position::Goalkeeper, at(600)).unwrap();

    let changes = m.events().position_changes_for(keeper.id);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1].event_type, EventType::KeeperChange);
    assert_eq!(changes[1].from_position, Some(Position::Defender));
}

#[test]
fn recorded_commands_replay_to_the_same_state() {
    let a = PlayerRef::new("A", 3);
    let b = PlayerRef::new("B", 8);
    let commands = vec![
        TimedCommand::new(at(0), MatchCommand::SubIn { player_id: a.id }),
        TimedCommand::new(at(10), MatchCommand::StartPlay),
        TimedCommand::new(at(70), MatchCommand::Pause),
        TimedCommand::new(at(75), MatchCommand::Substitute { player_out: a.id, player_in: b.id }),
        TimedCommand::new(at(100), MatchCommand::Resume),
        TimedCommand::new(at(160), MatchCommand::End),
    ];

    let mut scripted = Match::new("Replay", &[a.clone(), b.clone()], SportType::Soccer, at(0));
    scripted.apply_all(&commands).unwrap();

    assert_secs(scripted.entry(a.id).unwrap().total_seconds_played(), 60.0);
    assert_secs(scripted.entry(b.id).unwrap().total_seconds_played(), 60.0);
    assert_eq!(format_clock(scripted.final_elapsed_seconds().unwrap()), "02:00");

    let snap = snapshot(&scripted, at(1_000));
    assert_eq!(snap.clock.phase, "ended");
}

#[test]
fn history_survives_a_save_and_load() {
    let dir = TempDir::new().unwrap();
    let manager = SaveManager::new(dir.path());
    let players = vec![PlayerRef::new("A", 1), PlayerRef::new("B", 2)];

    let mut history = MatchHistory::new();
    let first = history.create_match("First", &players, SportType::Soccer, at(0)).unwrap();
    {
        let m = history.get_mut(first).unwrap();
        m.sub_in(players[0].id, at(1)).unwrap();
        m.start_play(at(10));
        m.start_halftime(at(100));
    }
    manager.save(&history, at(150)).unwrap();

    let mut restored = manager.load().unwrap();
    assert_eq!(restored, history);

    // the restored open match keeps running from where it was saved
    assert!(matches!(
        restored.create_match("Second", &players, SportType::Soccer, at(200)),
        Err(MatchError::ActiveMatchExists(_))
    ));
    restored.get_mut(first).unwrap().end_halftime(at(400));
    restored.end_active(at(460));
    assert_eq!(restored.get(first).unwrap().final_elapsed_seconds(), Some(150.0));

    restored.delete(first).unwrap();
    manager.save(&restored, at(500)).unwrap();
    assert!(manager.load().unwrap().is_empty());
}
