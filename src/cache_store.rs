use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::directory::{
    Directory, PlayerEntry, TeamEntry, player_entry_from_row, team_entry_from_row,
};
use crate::game_log::{GameRecord, order_most_recent_first};
use crate::nba_rows::{RawRow, extract_rows, game_records, season_totals_from_row};
use crate::source::{PlayerSeasonData, StatsSource};

const PLAYERS_FILE: &str = "players.json";
const TEAMS_FILE: &str = "teams.json";
const PLAYER_STATS_DIR: &str = "player_stats";
const TEAM_LOGS_DIR: &str = "team_gamelogs";

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    season: Option<String>,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct PlayerFile {
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    team_abbreviation: Option<String>,
    #[serde(default)]
    season: Option<String>,
    #[serde(default)]
    data: Value,
    // An empty list when the batch fetch of the log failed.
    #[serde(default)]
    game_log: Value,
}

#[derive(Debug, Deserialize)]
struct TeamLogFile {
    #[serde(default)]
    team_id: Option<u32>,
    #[serde(default)]
    season: Option<String>,
    #[serde(default)]
    data: Value,
}

/// The batch fetcher's on-disk cache, one JSON file per entity.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn player_file_count(&self) -> usize {
        json_files(&self.root.join(PLAYER_STATS_DIR)).map(|f| f.len()).unwrap_or(0)
    }

    pub fn team_log_file_count(&self) -> usize {
        json_files(&self.root.join(TEAM_LOGS_DIR)).map(|f| f.len()).unwrap_or(0)
    }

    fn load_directory(&self, file: &str, set_name: &str) -> Result<(DirectoryFile, Vec<RawRow>)> {
        let path = self.root.join(file);
        let parsed: DirectoryFile = read_json(&path)?;
        let rows = extract_rows(&parsed.data, set_name);
        Ok((parsed, rows))
    }
}

impl StatsSource for CacheStore {
    fn players(&self, _season: &str) -> Result<Directory<PlayerEntry>> {
        let (file, rows) = self.load_directory(PLAYERS_FILE, "CommonAllPlayers")?;
        Ok(Directory {
            last_updated: file.last_updated,
            season: file.season,
            entries: rows.iter().filter_map(player_entry_from_row).collect(),
        })
    }

    fn teams(&self, _season: &str) -> Result<Directory<TeamEntry>> {
        let (file, rows) = self.load_directory(TEAMS_FILE, "LeagueDashTeamStats")?;
        Ok(Directory {
            last_updated: file.last_updated,
            season: file.season,
            entries: rows.iter().filter_map(team_entry_from_row).collect(),
        })
    }

    fn player_season(&self, player_id: u32, season: &str) -> Result<PlayerSeasonData> {
        let dir = self.root.join(PLAYER_STATS_DIR);
        let path = entity_file(&dir, player_id)?
            .ok_or_else(|| anyhow!("no cached stats for player {player_id}"))?;
        let file: PlayerFile = read_json(&path)?;

        let season_totals = extract_rows(&file.data, "SeasonTotalsRegularSeason")
            .iter()
            .filter_map(season_totals_from_row)
            .collect();
        let mut game_log = if season_matches(file.season.as_deref(), season) {
            game_records(&extract_rows(&file.game_log, "PlayerGameLog"), None)
        } else {
            Vec::new()
        };
        order_most_recent_first(&mut game_log);

        Ok(PlayerSeasonData {
            player_id,
            player_name: file.player_name,
            team_abbreviation: file.team_abbreviation,
            season_totals,
            game_log,
        })
    }

    fn team_game_log(&self, team_id: u32, season: &str) -> Result<Vec<GameRecord>> {
        let dir = self.root.join(TEAM_LOGS_DIR);
        let path = entity_file(&dir, team_id)?
            .ok_or_else(|| anyhow!("no cached game log for team {team_id}"))?;
        let file: TeamLogFile = read_json(&path)?;
        if !season_matches(file.season.as_deref(), season) {
            return Ok(Vec::new());
        }
        let mut log = team_records(&file, team_id);
        order_most_recent_first(&mut log);
        Ok(log)
    }

    fn league_games(&self, season: &str) -> Result<Vec<GameRecord>> {
        let dir = self.root.join(TEAM_LOGS_DIR);
        let mut out = Vec::new();
        for path in json_files(&dir)? {
            let file: TeamLogFile = match read_json(&path) {
                Ok(f) => f,
                Err(err) => {
                    warn!(path = %path.display(), "skipping unreadable team log: {err:#}");
                    continue;
                }
            };
            if !season_matches(file.season.as_deref(), season) {
                continue;
            }
            let fallback = file.team_id.or_else(|| id_from_file_name(&path)).unwrap_or(0);
            out.extend(team_records(&file, fallback));
        }
        Ok(out)
    }
}

fn team_records(file: &TeamLogFile, fallback_team: u32) -> Vec<GameRecord> {
    let rows = extract_rows(&file.data, "TeamGameLog");
    game_records(&rows, file.team_id.or(Some(fallback_team)))
}

fn season_matches(tag: Option<&str>, season: &str) -> bool {
    tag.is_none_or(|t| t.trim() == season.trim())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// `{id}_{Display_Name}.json`
fn entity_file(dir: &Path, id: u32) -> Result<Option<PathBuf>> {
    let prefix = format!("{id}_");
    Ok(json_files(dir)?.into_iter().find(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&prefix))
    }))
}

fn id_from_file_name(path: &Path) -> Option<u32> {
    let name = path.file_stem()?.to_str()?;
    name.split('_').next()?.parse().ok()
}
