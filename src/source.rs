use anyhow::Result;

use crate::directory::{Directory, PlayerEntry, TeamEntry};
use crate::game_log::GameRecord;
use crate::profile::SeasonTotals;

/// Everything stored for one player and season.
#[derive(Debug, Clone, Default)]
pub struct PlayerSeasonData {
    pub player_id: u32,
    pub player_name: Option<String>,
    pub team_abbreviation: Option<String>,
    /// Regular-season totals rows, any season.
    pub season_totals: Vec<SeasonTotals>,
    /// Most recent game first.
    pub game_log: Vec<GameRecord>,
}

/// Where raw records come from: the local cache or the live provider.
///
/// Errors mean "no data" to the caller.
pub trait StatsSource: Sync {
    fn players(&self, season: &str) -> Result<Directory<PlayerEntry>>;
    fn teams(&self, season: &str) -> Result<Directory<TeamEntry>>;
    fn player_season(&self, player_id: u32, season: &str) -> Result<PlayerSeasonData>;
    /// Most recent game first.
    fn team_game_log(&self, team_id: u32, season: &str) -> Result<Vec<GameRecord>>;
    /// Every team's row for every game of the season.
    fn league_games(&self, season: &str) -> Result<Vec<GameRecord>>;
}
