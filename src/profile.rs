use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::game_log::{BoxLine, StatRow, played_games};
use crate::stat_catalog::{Aggregation, Direction, ProfileKind, StatKey};
use crate::stat_math::{MIN_TRIM_SAMPLE, mean, safe_div, trimmed_mean};

/// Per-game rates plus the sample size behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatProfile {
    pub games: usize,
    pub rates: BTreeMap<StatKey, f64>,
}

impl StatProfile {
    pub fn get(&self, key: StatKey) -> f64 {
        self.rates.get(&key).copied().unwrap_or(0.0)
    }

    pub fn same_keys(&self, other: &StatProfile) -> bool {
        self.rates.keys().eq(other.rates.keys())
    }
}

/// One season row of cumulative totals.
#[derive(Debug, Clone, Default)]
pub struct SeasonTotals {
    pub season_id: String,
    pub team_abbreviation: Option<String>,
    pub games_played: u32,
    pub minutes_total: f64,
    pub totals: BoxLine,
}

/// Season rates from cumulative totals; `None` when no games were played.
pub fn season_from_totals(kind: ProfileKind, totals: &SeasonTotals) -> Option<StatProfile> {
    if totals.games_played == 0 {
        return None;
    }
    let g = f64::from(totals.games_played);
    let rates = kind
        .keys()
        .iter()
        .map(|&key| {
            let v = match key.aggregation() {
                _ if key == StatKey::Minutes => safe_div(totals.minutes_total, g),
                Aggregation::Count => safe_div(totals.totals.value(key), g),
                Aggregation::Rate => totals.totals.value(key),
                Aggregation::Ratio(n, d) => {
                    safe_div(totals.totals.value(n), totals.totals.value(d))
                }
            };
            (key, v)
        })
        .collect();
    Some(StatProfile {
        games: totals.games_played as usize,
        rates,
    })
}

/// Season rates averaged over every played game; `None` when nothing was played.
pub fn season_from_log<R: StatRow>(kind: ProfileKind, rows: &[R]) -> Option<StatProfile> {
    let played = played_games(rows);
    if played.is_empty() {
        return None;
    }
    Some(aggregate(kind, &played, mean))
}

/// Trimmed profile over an already selected window.
///
/// Below three games the season rates stand in, while `games` still reports
/// the real window size.
pub fn recent_form<R: StatRow>(
    kind: ProfileKind,
    window: &[&R],
    season: &StatProfile,
) -> StatProfile {
    if window.len() < MIN_TRIM_SAMPLE {
        debug!(
            games = window.len(),
            "recent window too small to trim, using season rates"
        );
        return StatProfile {
            games: window.len(),
            rates: kind.keys().iter().map(|&k| (k, season.get(k))).collect(),
        };
    }
    trimmed_profile(kind, window)
}

/// Trimmed mean of every key over `window`, whatever its size.
pub fn trimmed_profile<R: StatRow>(kind: ProfileKind, window: &[&R]) -> StatProfile {
    aggregate(kind, window, trimmed_mean)
}

fn aggregate<R: StatRow>(kind: ProfileKind, rows: &[&R], reduce: fn(&[f64]) -> f64) -> StatProfile {
    let column = |key: StatKey| -> Vec<f64> { rows.iter().map(|r| r.stat(key)).collect() };
    let rates = kind
        .keys()
        .iter()
        .map(|&key| {
            let v = match key.aggregation() {
                Aggregation::Count | Aggregation::Rate => reduce(&column(key)),
                Aggregation::Ratio(n, d) => safe_div(reduce(&column(n)), reduce(&column(d))),
            };
            (key, v)
        })
        .collect();
    StatProfile {
        games: rows.len(),
        rates,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendDelta {
    pub key: StatKey,
    pub season: f64,
    pub recent: f64,
    pub delta: f64,
    pub direction: Direction,
}

impl TrendDelta {
    /// `Some(true)` when the move is good for the entity, `None` when flat.
    pub fn favorable(&self) -> Option<bool> {
        if self.delta == 0.0 {
            return None;
        }
        Some(match self.direction {
            Direction::HigherBetter => self.delta > 0.0,
            Direction::LowerBetter => self.delta < 0.0,
        })
    }
}

pub fn trend_deltas(kind: ProfileKind, season: &StatProfile, recent: &StatProfile) -> Vec<TrendDelta> {
    kind.keys()
        .iter()
        .map(|&key| {
            let s = season.get(key);
            let r = recent.get(key);
            TrendDelta {
                key,
                season: s,
                recent: r,
                delta: r - s,
                direction: key.direction(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_log::{GameRecord, select_recent};
    use crate::minutes::MinutesValue;

    fn game(minutes: f64, pts: f64, ast: f64, tov: f64) -> GameRecord {
        GameRecord {
            game_id: format!("g{pts}"),
            minutes: MinutesValue::Count(minutes),
            line: BoxLine {
                pts,
                ast,
                tov,
                fgm: 4.0,
                fga: 10.0,
                ..BoxLine::default()
            },
            ..GameRecord::default()
        }
    }

    #[test]
    fn totals_mode_divides_counts_only() {
        let totals = SeasonTotals {
            season_id: "2025-26".into(),
            games_played: 4,
            minutes_total: 130.0,
            totals: BoxLine {
                pts: 100.0,
                ast: 20.0,
                tov: 8.0,
                fg_pct: Some(0.512),
                ..BoxLine::default()
            },
            ..SeasonTotals::default()
        };
        let p = season_from_totals(ProfileKind::Player, &totals).unwrap();
        assert_eq!(p.games, 4);
        assert_eq!(p.get(StatKey::Points), 25.0);
        assert_eq!(p.get(StatKey::FieldGoalPct), 0.512);
        assert_eq!(p.get(StatKey::Minutes), 32.5);
        assert_eq!(p.get(StatKey::FreeThrowPct), 0.0);

        let team = season_from_totals(ProfileKind::TeamOffense, &totals).unwrap();
        assert_eq!(team.get(StatKey::AssistTurnoverRatio), 2.5);

        let empty = SeasonTotals::default();
        assert!(season_from_totals(ProfileKind::Player, &empty).is_none());
    }

    #[test]
    fn log_mode_ignores_dnp() {
        let rows = vec![game(30.0, 20.0, 4.0, 2.0), game(0.0, 0.0, 0.0, 0.0), game(20.0, 10.0, 2.0, 2.0)];
        let p = season_from_log(ProfileKind::Player, &rows).unwrap();
        assert_eq!(p.games, 2);
        assert_eq!(p.get(StatKey::Points), 15.0);
        assert_eq!(p.get(StatKey::Minutes), 25.0);
        assert_eq!(p.get(StatKey::FieldGoalPct), 0.4);

        let none: Vec<GameRecord> = vec![game(0.0, 0.0, 0.0, 0.0)];
        assert!(season_from_log(ProfileKind::Player, &none).is_none());
    }

    #[test]
    fn recent_form_trims_each_column() {
        let pts = [10.0, 50.0, 20.0, 25.0, 30.0, 15.0, 22.0];
        let rows: Vec<GameRecord> = pts.iter().map(|&p| game(30.0, p, 5.0, 1.0)).collect();
        let season = season_from_log(ProfileKind::TeamOffense, &rows).unwrap();
        let window = select_recent(&rows, 7);
        let recent = recent_form(ProfileKind::TeamOffense, &window, &season);
        assert!((recent.get(StatKey::Points) - 22.4).abs() < 1e-9);
        assert_eq!(recent.get(StatKey::AssistTurnoverRatio), 5.0);
        assert_eq!(recent.games, 7);
        assert!(recent.same_keys(&season));
    }

    #[test]
    fn short_window_falls_back_to_season() {
        let rows = vec![game(30.0, 40.0, 1.0, 1.0), game(30.0, 10.0, 3.0, 1.0)];
        let season = season_from_log(ProfileKind::Player, &rows).unwrap();
        let window = select_recent(&rows, 7);
        let recent = recent_form(ProfileKind::Player, &window, &season);
        assert_eq!(recent.rates, season.rates);
        assert_eq!(recent.games, 2);
    }

    #[test]
    fn deltas_follow_direction() {
        let mut season = StatProfile { games: 10, rates: BTreeMap::new() };
        season.rates.insert(StatKey::OppPoints, 110.0);
        let mut recent = season.clone();
        recent.rates.insert(StatKey::OppPoints, 104.0);
        let deltas = trend_deltas(ProfileKind::TeamDefense, &season, &recent);
        let opp = deltas.iter().find(|d| d.key == StatKey::OppPoints).unwrap();
        assert_eq!(opp.delta, -6.0);
        assert_eq!(opp.favorable(), Some(true));
        let stl = deltas.iter().find(|d| d.key == StatKey::Steals).unwrap();
        assert_eq!(stl.favorable(), None);
        assert_eq!(deltas.len(), ProfileKind::TeamDefense.keys().len());
    }
}
