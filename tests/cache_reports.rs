use std::path::PathBuf;

use chrono::NaiveDate;

use hoops_form::cache_store::CacheStore;
use hoops_form::reports::{
    FormRequest, Unavailable, player_form, team_defense_form, team_offense_form, try_player_form,
};
use hoops_form::source::StatsSource;
use hoops_form::stat_catalog::StatKey;

const SEASON: &str = "2025-26";
const LAKERS: u32 = 1610612747;
const WARRIORS: u32 = 1610612744;

fn fixture_store() -> CacheStore {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("cached_data");
    CacheStore::new(path)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn directories_load_from_cache() {
    let store = fixture_store();
    let players = store.players(SEASON).expect("players fixture");
    assert_eq!(players.len(), 5);
    assert_eq!(players.resolve("ada").map(|p| p.id), Some(1001));
    assert!(players.refreshed_at().is_some());

    let teams = store.teams(SEASON).expect("teams fixture").league_only();
    assert_eq!(teams.len(), 2);
    assert_eq!(store.player_file_count(), 5);
    assert_eq!(store.team_log_file_count(), 2);
}

#[test]
fn player_report_trims_recent_window() {
    let store = fixture_store();
    let report = player_form(&store, &FormRequest::new(1001, SEASON)).expect("report");

    assert_eq!(report.entity_name, "Ada Guard");
    assert_eq!(report.team.as_deref(), Some("LAL"));
    assert_eq!(report.season.games, 8);
    assert_eq!(report.season.get(StatKey::Points), 25.0);
    assert_eq!(report.trimmed_recent.games, 7);
    assert!(close(report.trimmed_recent.get(StatKey::Points), 22.4));
    assert!(close(report.trimmed_recent.get(StatKey::Minutes), 33.12));
    assert!(report.season.same_keys(&report.trimmed_recent));

    // The DNP game is skipped, so the window reaches back to game two.
    assert_eq!(report.recent_games.len(), 7);
    assert_eq!(report.recent_games[0].game_id, "0022500009");
    assert_eq!(report.recent_games[1].game_id, "0022500007");
    assert_eq!(
        report.window_span,
        Some((
            NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 5).unwrap()
        ))
    );

    let att = report.attendance.expect("attendance");
    assert_eq!((att.team_games, att.games_played, att.games_missed), (9, 8, 1));

    let pts = report
        .trend_deltas
        .iter()
        .find(|d| d.key == StatKey::Points)
        .expect("points delta");
    assert!(close(pts.delta, -2.6));
}

#[test]
fn two_game_player_falls_back_to_season() {
    let store = fixture_store();
    let report = player_form(&store, &FormRequest::new(1002, SEASON)).expect("report");
    assert_eq!(report.trimmed_recent.games, 2);
    assert_eq!(report.trimmed_recent.rates, report.season.rates);
    assert_eq!(report.season.get(StatKey::Rebounds), 12.0);
    assert!(report.trend_deltas.iter().all(|d| d.delta == 0.0));
}

#[test]
fn zero_games_and_unknown_players_are_none() {
    let store = fixture_store();
    assert!(player_form(&store, &FormRequest::new(1003, SEASON)).is_none());
    assert!(matches!(
        try_player_form(&store, &FormRequest::new(1003, SEASON)),
        Err(Unavailable::EmptySample(_))
    ));
    assert!(player_form(&store, &FormRequest::new(9999, SEASON)).is_none());
    assert!(matches!(
        try_player_form(&store, &FormRequest::new(9999, SEASON)),
        Err(Unavailable::NotFound(_))
    ));
}

#[test]
fn other_season_has_no_game_log() {
    let store = fixture_store();
    let data = store.player_season(1001, "2024-25").expect("player file");
    assert!(data.game_log.is_empty());
    assert_eq!(data.season_totals.len(), 2);
    // The 2024-25 totals row still yields a season profile.
    let report = player_form(&store, &FormRequest::new(1001, "2024-25")).expect("report");
    assert_eq!(report.season.games, 70);
    assert_eq!(report.trimmed_recent.games, 0);
    assert_eq!(report.trimmed_recent.rates, report.season.rates);
}

#[test]
fn team_offense_uses_team_log() {
    let store = fixture_store();
    let report = team_offense_form(&store, &FormRequest::new(LAKERS, SEASON)).expect("report");
    assert_eq!(report.entity_name, "Los Angeles Lakers");
    assert_eq!(report.season.games, 9);
    assert!(close(report.season.get(StatKey::Points), 987.0 / 9.0));
    assert!(close(report.trimmed_recent.get(StatKey::Points), 110.8));
    assert!(close(report.trimmed_recent.get(StatKey::AssistTurnoverRatio), 25.0 / 13.0));
    assert!(report.attendance.is_none());
}

#[test]
fn team_defense_reconciles_opponents() {
    let store = fixture_store();
    let lakers = team_defense_form(&store, &FormRequest::new(LAKERS, SEASON)).expect("report");
    // The opener against an uncached opponent is dropped.
    assert_eq!(lakers.season.games, 8);
    assert!(close(lakers.season.get(StatKey::OppPoints), 857.0 / 8.0));
    assert!(close(lakers.trimmed_recent.get(StatKey::OppPoints), 107.6));
    assert_eq!(lakers.season.get(StatKey::Steals), 8.0);

    let warriors = team_defense_form(&store, &FormRequest::new(WARRIORS, SEASON)).expect("report");
    assert!(close(warriors.season.get(StatKey::OppPoints), 110.875));
    assert!(close(warriors.trimmed_recent.get(StatKey::OppPoints), 110.8));
    let opp_fg = warriors.recent_games[0].values[&StatKey::OppFieldGoalPct];
    assert!(close(opp_fg, 45.0 / 88.0));
}

#[test]
fn unknown_team_is_none() {
    let store = fixture_store();
    assert!(team_offense_form(&store, &FormRequest::new(1, SEASON)).is_none());
    assert!(team_defense_form(&store, &FormRequest::new(1, SEASON)).is_none());
}
