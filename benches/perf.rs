use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

use hoops_form::game_log::{BoxLine, GameRecord, select_recent};
use hoops_form::minutes::MinutesValue;
use hoops_form::nba_rows::{extract_rows, game_records};
use hoops_form::opponent::reconcile_defense;
use hoops_form::profile::{recent_form, season_from_log};
use hoops_form::stat_catalog::ProfileKind;
use hoops_form::stat_math::trimmed_mean;

const TEAMS: u32 = 30;
const GAMES_PER_TEAM: u32 = 82;

/// A full regular season: every game has two rows, one per side.
fn league_season() -> Vec<GameRecord> {
    let mut out = Vec::with_capacity((TEAMS * GAMES_PER_TEAM) as usize);
    for game in 0..(TEAMS * GAMES_PER_TEAM / 2) {
        let home = game % TEAMS;
        let away = (game * 7 + 1) % TEAMS;
        let away = if away == home { (away + 1) % TEAMS } else { away };
        for (team, pts) in [(home, 100 + game % 25), (away, 95 + game % 30)] {
            out.push(GameRecord {
                game_id: format!("00225{game:05}"),
                team_id: Some(1610612737 + team),
                minutes: MinutesValue::Count(240.0),
                line: BoxLine {
                    pts: f64::from(pts),
                    fgm: 40.0,
                    fga: 88.0,
                    fg3m: 12.0,
                    fg3a: 34.0,
                    ftm: 16.0,
                    fta: 20.0,
                    ast: 25.0,
                    tov: 13.0,
                    ..BoxLine::default()
                },
                ..GameRecord::default()
            });
        }
    }
    out
}

fn game_log_json(rows: usize) -> Value {
    let row_set: Vec<Value> = (0..rows)
        .map(|i| {
            json!([
                format!("00225{i:05}"),
                "NOV 04, 2025",
                "LAL vs. SAS",
                if i % 2 == 0 { "W" } else { "L" },
                "34:12",
                20 + i % 15,
                8,
                5,
                9,
                0.476
            ])
        })
        .collect();
    json!({
        "resultSets": [{
            "name": "PlayerGameLog",
            "headers": ["Game_ID", "GAME_DATE", "MATCHUP", "WL", "MIN", "PTS", "REB", "AST", "FGM", "FG_PCT"],
            "rowSet": row_set
        }]
    })
}

fn bench_trimmed_mean(c: &mut Criterion) {
    let values: Vec<f64> = (0..82).map(|i| f64::from(i * 37 % 50)).collect();
    c.bench_function("trimmed_mean_82", |b| {
        b.iter(|| black_box(trimmed_mean(black_box(&values))))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let league = league_season();
    let team_id = 1610612747;
    let own: Vec<GameRecord> = league
        .iter()
        .filter(|g| g.team_id == Some(team_id))
        .cloned()
        .collect();
    c.bench_function("reconcile_defense_season", |b| {
        b.iter(|| {
            let games = reconcile_defense(team_id, black_box(&own), black_box(&league));
            black_box(games.len());
        })
    });
}

fn bench_profiles(c: &mut Criterion) {
    let league = league_season();
    let own: Vec<GameRecord> = league
        .iter()
        .filter(|g| g.team_id == Some(1610612747))
        .cloned()
        .collect();
    c.bench_function("offense_profiles", |b| {
        b.iter(|| {
            let season = season_from_log(ProfileKind::TeamOffense, black_box(&own));
            if let Some(season) = season {
                let window = select_recent(&own, 7);
                black_box(recent_form(ProfileKind::TeamOffense, &window, &season));
            }
        })
    });
}

fn bench_parse_game_log(c: &mut Criterion) {
    let root = game_log_json(82);
    c.bench_function("parse_player_game_log", |b| {
        b.iter(|| {
            let rows = extract_rows(black_box(&root), "PlayerGameLog");
            black_box(game_records(&rows, None).len());
        })
    });
}

criterion_group!(
    benches,
    bench_trimmed_mean,
    bench_reconcile,
    bench_profiles,
    bench_parse_game_log
);
criterion_main!(benches);
