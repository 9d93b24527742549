//! Season vs recent-form reports for players and teams.
//!
//! The `try_*` functions keep the reason a report is unavailable; the plain
//! variants log it and answer `None`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::directory::PlayerEntry;
use crate::game_log::{DEFAULT_WINDOW, GameOutcome, GameRecord, StatRow, date_span, select_recent};
use crate::nba_rows::find_season_totals;
use crate::opponent::reconcile_defense;
use crate::profile::{
    StatProfile, TrendDelta, recent_form, season_from_log, season_from_totals, trend_deltas,
};
use crate::source::{PlayerSeasonData, StatsSource};
use crate::stat_catalog::{ProfileKind, StatKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub entity_id: u32,
    pub season: String,
    pub window: usize,
}

impl FormRequest {
    pub fn new(entity_id: u32, season: impl Into<String>) -> Self {
        Self {
            entity_id,
            season: season.into(),
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

/// Why no report could be produced.
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no played games: {0}")]
    EmptySample(String),
    #[error("upstream: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

/// One game of the recent window, as displayed.
#[derive(Debug, Clone, Serialize)]
pub struct RecentGameRow {
    pub game_id: String,
    pub date: Option<NaiveDate>,
    pub matchup: String,
    pub outcome: Option<GameOutcome>,
    pub minutes: f64,
    pub values: BTreeMap<StatKey, f64>,
}

/// Schedule context of a player's season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceContext {
    pub team_games: usize,
    pub games_played: usize,
    pub games_missed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormReport {
    pub kind: ProfileKind,
    pub entity_id: u32,
    pub entity_name: String,
    pub team: Option<String>,
    pub season_id: String,
    pub window: usize,
    pub season: StatProfile,
    pub trimmed_recent: StatProfile,
    pub recent_games: Vec<RecentGameRow>,
    pub trend_deltas: Vec<TrendDelta>,
    pub attendance: Option<AttendanceContext>,
    pub window_span: Option<(NaiveDate, NaiveDate)>,
}

pub fn player_form(source: &dyn StatsSource, req: &FormRequest) -> Option<FormReport> {
    settle(ProfileKind::Player, req, try_player_form(source, req))
}

pub fn team_offense_form(source: &dyn StatsSource, req: &FormRequest) -> Option<FormReport> {
    settle(ProfileKind::TeamOffense, req, try_team_offense_form(source, req))
}

pub fn team_defense_form(source: &dyn StatsSource, req: &FormRequest) -> Option<FormReport> {
    settle(ProfileKind::TeamDefense, req, try_team_defense_form(source, req))
}

fn settle(
    kind: ProfileKind,
    req: &FormRequest,
    outcome: Result<FormReport, Unavailable>,
) -> Option<FormReport> {
    match outcome {
        Ok(report) => Some(report),
        Err(err @ Unavailable::Upstream(_)) => {
            warn!(kind = kind.label(), entity_id = req.entity_id, "report unavailable: {err}");
            None
        }
        Err(err) => {
            debug!(kind = kind.label(), entity_id = req.entity_id, "report unavailable: {err}");
            None
        }
    }
}

pub fn try_player_form(
    source: &dyn StatsSource,
    req: &FormRequest,
) -> Result<FormReport, Unavailable> {
    let players = source.players(&req.season)?;
    let entry = players
        .find_by_id(req.entity_id)
        .ok_or_else(|| Unavailable::NotFound(format!("player {}", req.entity_id)))?;
    let data = source.player_season(entry.id, &req.season)?;

    let season = player_season_profile(&data, &req.season)?;
    let attendance = attendance(source, entry, &data, &season, &req.season);

    let mut report = build_report(
        ProfileKind::Player,
        req,
        data.player_name.clone().unwrap_or_else(|| entry.display_name.clone()),
        entry.team_abbreviation.clone().or(data.team_abbreviation.clone()),
        season,
        &data.game_log,
    );
    report.attendance = attendance;
    Ok(report)
}

/// Totals row when the season has one, otherwise the game log.
fn player_season_profile(data: &PlayerSeasonData, season: &str) -> Result<StatProfile, Unavailable> {
    if let Some(totals) = find_season_totals(&data.season_totals, season) {
        return season_from_totals(ProfileKind::Player, totals)
            .ok_or_else(|| Unavailable::EmptySample(format!("player {} season {season}", data.player_id)));
    }
    if data.game_log.is_empty() {
        return Err(Unavailable::NotFound(format!(
            "season {season} for player {}",
            data.player_id
        )));
    }
    season_from_log(ProfileKind::Player, &data.game_log)
        .ok_or_else(|| Unavailable::EmptySample(format!("player {} season {season}", data.player_id)))
}

fn attendance(
    source: &dyn StatsSource,
    entry: &PlayerEntry,
    data: &PlayerSeasonData,
    season: &StatProfile,
    season_id: &str,
) -> Option<AttendanceContext> {
    let team_games = if entry.team_id == 0 {
        0
    } else {
        match source.team_game_log(entry.team_id, season_id) {
            Ok(log) => log.len(),
            Err(err) => {
                debug!(team_id = entry.team_id, "team schedule unavailable: {err:#}");
                0
            }
        }
    };
    let team_games = if team_games == 0 { data.game_log.len() } else { team_games };
    if team_games == 0 {
        return None;
    }
    Some(AttendanceContext {
        team_games,
        games_played: season.games,
        games_missed: team_games.saturating_sub(season.games),
    })
}

pub fn try_team_offense_form(
    source: &dyn StatsSource,
    req: &FormRequest,
) -> Result<FormReport, Unavailable> {
    let kind = ProfileKind::TeamOffense;
    let (name, log) = team_log(source, req)?;
    let season = season_from_log(kind, &log)
        .ok_or_else(|| Unavailable::EmptySample(format!("team {}", req.entity_id)))?;
    Ok(build_report(kind, req, name, None, season, &log))
}

pub fn try_team_defense_form(
    source: &dyn StatsSource,
    req: &FormRequest,
) -> Result<FormReport, Unavailable> {
    let kind = ProfileKind::TeamDefense;
    let (name, log) = team_log(source, req)?;
    let league = source.league_games(&req.season)?;
    let games = reconcile_defense(req.entity_id, &log, &league);
    let season = season_from_log(kind, &games).ok_or_else(|| {
        Unavailable::EmptySample(format!("no reconciled games for team {}", req.entity_id))
    })?;
    Ok(build_report(kind, req, name, None, season, &games))
}

fn team_log(
    source: &dyn StatsSource,
    req: &FormRequest,
) -> Result<(String, Vec<GameRecord>), Unavailable> {
    let teams = source.teams(&req.season)?;
    let entry = teams
        .find_by_id(req.entity_id)
        .ok_or_else(|| Unavailable::NotFound(format!("team {}", req.entity_id)))?;
    let log = source.team_game_log(entry.id, &req.season)?;
    if log.is_empty() {
        return Err(Unavailable::NotFound(format!(
            "season {} for team {}",
            req.season, entry.id
        )));
    }
    Ok((entry.name.clone(), log))
}

fn build_report<R: StatRow>(
    kind: ProfileKind,
    req: &FormRequest,
    entity_name: String,
    team: Option<String>,
    season: StatProfile,
    rows: &[R],
) -> FormReport {
    let window = select_recent(rows, req.window);
    let trimmed_recent = recent_form(kind, &window, &season);
    let recent_games = window.iter().map(|r| recent_row(kind, *r)).collect();
    FormReport {
        kind,
        entity_id: req.entity_id,
        entity_name,
        team,
        season_id: req.season.clone(),
        window: req.window,
        trend_deltas: trend_deltas(kind, &season, &trimmed_recent),
        window_span: date_span(&window),
        season,
        trimmed_recent,
        recent_games,
        attendance: None,
    }
}

fn recent_row<R: StatRow>(kind: ProfileKind, row: &R) -> RecentGameRow {
    RecentGameRow {
        game_id: row.game_id().to_string(),
        date: row.game_date(),
        matchup: row.matchup().to_string(),
        outcome: row.outcome(),
        minutes: row.minutes(),
        values: kind.keys().iter().map(|&k| (k, row.stat(k))).collect(),
    }
}
