use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::directory::{
    Directory, PlayerEntry, TeamEntry, player_entry_from_row, team_entry_from_row,
};
use crate::game_log::{GameRecord, order_most_recent_first};
use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::nba_rows::{extract_rows, game_records, season_totals_from_row};
use crate::source::{PlayerSeasonData, StatsSource};

pub const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
const SEASON_TYPE: &str = "Regular+Season";

// The provider rejects requests without browser-like origin headers.
const PROVIDER_HEADERS: &[(&str, &str)] = &[
    ("Referer", "https://www.nba.com/"),
    ("Origin", "https://www.nba.com"),
    ("Accept", "application/json, text/plain, */*"),
    ("x-nba-stats-origin", "stats"),
    ("x-nba-stats-token", "true"),
];

/// Stats provider queried on demand, one request per call (cached on disk).
#[derive(Debug, Clone)]
pub struct LiveSource {
    base_url: String,
    max_age: Duration,
}

impl LiveSource {
    pub fn new(max_age: Duration) -> Self {
        Self {
            base_url: STATS_BASE_URL.to_string(),
            max_age,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}/{endpoint}?{}", self.base_url, query.join("&"))
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint_url(endpoint, params);
        debug!(%url, "stats request");
        let client = http_client()?;
        let body = fetch_json_cached(client, &url, PROVIDER_HEADERS, self.max_age)
            .with_context(|| format!("{endpoint} request failed"))?;
        serde_json::from_str(&body).with_context(|| format!("invalid {endpoint} json"))
    }

    fn team_game_finder(&self, season: &str, team_id: Option<u32>) -> Result<Vec<GameRecord>> {
        let mut params = vec![
            ("PlayerOrTeam", "T".to_string()),
            ("LeagueID", "00".to_string()),
            ("Season", season.to_string()),
            ("SeasonType", SEASON_TYPE.to_string()),
        ];
        if let Some(id) = team_id {
            params.push(("TeamID", id.to_string()));
        }
        let root = self.get("leaguegamefinder", &params)?;
        Ok(game_records(&extract_rows(&root, "TeamGameFinderResults"), team_id))
    }
}

impl StatsSource for LiveSource {
    fn players(&self, season: &str) -> Result<Directory<PlayerEntry>> {
        let root = self.get(
            "commonallplayers",
            &[
                ("LeagueID", "00".to_string()),
                ("Season", season.to_string()),
                ("IsOnlyCurrentSeason", "1".to_string()),
            ],
        )?;
        Ok(Directory {
            last_updated: None,
            season: Some(season.to_string()),
            entries: extract_rows(&root, "CommonAllPlayers")
                .iter()
                .filter_map(player_entry_from_row)
                .collect(),
        })
    }

    fn teams(&self, season: &str) -> Result<Directory<TeamEntry>> {
        let root = self.get("leaguedashteamstats", &dash_params(season))?;
        Ok(Directory {
            last_updated: None,
            season: Some(season.to_string()),
            entries: extract_rows(&root, "LeagueDashTeamStats")
                .iter()
                .filter_map(team_entry_from_row)
                .collect(),
        })
    }

    fn player_season(&self, player_id: u32, season: &str) -> Result<PlayerSeasonData> {
        let career = self.get(
            "playercareerstats",
            &[
                ("PlayerID", player_id.to_string()),
                ("PerMode", "Totals".to_string()),
                ("LeagueID", "00".to_string()),
            ],
        )?;
        let log = self.get(
            "playergamelog",
            &[
                ("PlayerID", player_id.to_string()),
                ("Season", season.to_string()),
                ("SeasonType", SEASON_TYPE.to_string()),
            ],
        )?;
        let mut game_log = game_records(&extract_rows(&log, "PlayerGameLog"), None);
        order_most_recent_first(&mut game_log);
        Ok(PlayerSeasonData {
            player_id,
            player_name: None,
            team_abbreviation: None,
            season_totals: extract_rows(&career, "SeasonTotalsRegularSeason")
                .iter()
                .filter_map(season_totals_from_row)
                .collect(),
            game_log,
        })
    }

    fn team_game_log(&self, team_id: u32, season: &str) -> Result<Vec<GameRecord>> {
        let mut log = self.team_game_finder(season, Some(team_id))?;
        order_most_recent_first(&mut log);
        Ok(log)
    }

    fn league_games(&self, season: &str) -> Result<Vec<GameRecord>> {
        self.team_game_finder(season, None)
    }
}

fn dash_params(season: &str) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = [
        ("LeagueID", "00"),
        ("MeasureType", "Base"),
        ("PerMode", "PerGame"),
        ("PlusMinus", "N"),
        ("PaceAdjust", "N"),
        ("Rank", "N"),
        ("LastNGames", "0"),
        ("Month", "0"),
        ("OpponentTeamID", "0"),
        ("Period", "0"),
    ]
    .iter()
    .map(|(k, v)| (*k, v.to_string()))
    .collect();
    params.push(("Season", season.to_string()));
    params.push(("SeasonType", SEASON_TYPE.to_string()));
    params
}
