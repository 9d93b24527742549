use std::collections::BTreeMap;

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::directory::PlayerEntry;
use crate::game_log::{DEFAULT_WINDOW, select_recent};
use crate::profile::{StatProfile, trimmed_profile};
use crate::source::StatsSource;
use crate::stat_catalog::{ProfileKind, StatKey};
use crate::stat_math::MIN_TRIM_SAMPLE;

pub const DEFAULT_LEADERS_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderCategory {
    Points,
    Rebounds,
    Assists,
    ThreesMade,
    Steals,
    Blocks,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 6] = [
        LeaderCategory::Points,
        LeaderCategory::Rebounds,
        LeaderCategory::Assists,
        LeaderCategory::ThreesMade,
        LeaderCategory::Steals,
        LeaderCategory::Blocks,
    ];

    pub fn key(self) -> StatKey {
        match self {
            LeaderCategory::Points => StatKey::Points,
            LeaderCategory::Rebounds => StatKey::Rebounds,
            LeaderCategory::Assists => StatKey::Assists,
            LeaderCategory::ThreesMade => StatKey::ThreesMade,
            LeaderCategory::Steals => StatKey::Steals,
            LeaderCategory::Blocks => StatKey::Blocks,
        }
    }

    /// Stats shown next to the ranked value.
    pub fn companions(self) -> &'static [StatKey] {
        match self {
            LeaderCategory::Points => &[StatKey::FieldGoalPct, StatKey::ThreesMade],
            LeaderCategory::ThreesMade => &[StatKey::Points],
            _ => &[StatKey::Minutes],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LeaderCategory::Points => "Points Per Game",
            LeaderCategory::Rebounds => "Rebounds Per Game",
            LeaderCategory::Assists => "Assists Per Game",
            LeaderCategory::ThreesMade => "3-Pointers Made",
            LeaderCategory::Steals => "Steals Per Game",
            LeaderCategory::Blocks => "Blocks Per Game",
        }
    }
}

/// A player's trimmed form over the default window.
#[derive(Debug, Clone)]
pub struct RecentForm {
    pub player_id: u32,
    pub player_name: String,
    pub team: String,
    pub profile: StatProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderRow {
    pub rank: usize,
    pub player_id: u32,
    pub player_name: String,
    pub team: String,
    pub games: usize,
    pub value: f64,
    pub extras: BTreeMap<StatKey, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderBoard {
    pub category: LeaderCategory,
    pub rows: Vec<LeaderRow>,
}

/// Trimmed recent form of every directory player with enough recent games.
pub fn collect_recent_forms(source: &dyn StatsSource, season: &str) -> Result<Vec<RecentForm>> {
    let teams = source.teams(season)?.league_only();
    let players = source.players(season)?.on_teams(&teams.ids());
    let forms: Vec<RecentForm> = players
        .entries
        .par_iter()
        .filter_map(|entry| recent_form_for(source, entry, season))
        .collect();
    info!(
        players = players.len(),
        qualified = forms.len(),
        "collected recent forms"
    );
    Ok(forms)
}

fn recent_form_for(source: &dyn StatsSource, entry: &PlayerEntry, season: &str) -> Option<RecentForm> {
    let data = match source.player_season(entry.id, season) {
        Ok(data) => data,
        Err(err) => {
            debug!(player_id = entry.id, "skipping player: {err:#}");
            return None;
        }
    };
    let window = select_recent(&data.game_log, DEFAULT_WINDOW);
    if window.len() < MIN_TRIM_SAMPLE {
        return None;
    }
    Some(RecentForm {
        player_id: entry.id,
        player_name: data.player_name.clone().unwrap_or_else(|| entry.display_name.clone()),
        team: entry
            .team_abbreviation
            .clone()
            .or_else(|| data.team_abbreviation.clone())
            .unwrap_or_else(|| "FA".to_string()),
        profile: trimmed_profile(ProfileKind::Player, &window),
    })
}

/// Top `limit` players of `category`, highest first; ties go by name.
pub fn leader_board(forms: &[RecentForm], category: LeaderCategory, limit: usize) -> LeaderBoard {
    let key = category.key();
    let mut ranked: Vec<&RecentForm> = forms.iter().collect();
    ranked.sort_by(|a, b| {
        b.profile
            .get(key)
            .total_cmp(&a.profile.get(key))
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    let rows = ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, form)| LeaderRow {
            rank: i + 1,
            player_id: form.player_id,
            player_name: form.player_name.clone(),
            team: form.team.clone(),
            games: form.profile.games,
            value: form.profile.get(key),
            extras: category
                .companions()
                .iter()
                .map(|&k| (k, form.profile.get(k)))
                .collect(),
        })
        .collect();
    LeaderBoard { category, rows }
}

pub fn league_leaders(
    source: &dyn StatsSource,
    season: &str,
    limit: usize,
) -> Result<Vec<LeaderBoard>> {
    let forms = collect_recent_forms(source, season)?;
    Ok(LeaderCategory::ALL
        .iter()
        .map(|&category| leader_board(&forms, category, limit))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: u32, name: &str, pts: f64, reb: f64) -> RecentForm {
        let mut rates = BTreeMap::new();
        rates.insert(StatKey::Points, pts);
        rates.insert(StatKey::Rebounds, reb);
        rates.insert(StatKey::Minutes, 30.0);
        RecentForm {
            player_id: id,
            player_name: name.to_string(),
            team: "LAL".to_string(),
            profile: StatProfile { games: 7, rates },
        }
    }

    #[test]
    fn boards_rank_descending_with_name_ties() {
        let forms = vec![form(1, "Cole", 20.0, 9.0), form(2, "Abe", 31.0, 4.0), form(3, "Bo", 20.0, 12.0)];
        let board = leader_board(&forms, LeaderCategory::Points, 30);
        let order: Vec<u32> = board.rows.iter().map(|r| r.player_id).collect();
        assert_eq!(order, [2, 3, 1]);
        assert_eq!(board.rows[0].rank, 1);
        assert!(board.rows[0].extras.contains_key(&StatKey::FieldGoalPct));

        let reb = leader_board(&forms, LeaderCategory::Rebounds, 2);
        assert_eq!(reb.rows.len(), 2);
        assert_eq!(reb.rows[0].player_id, 3);
        assert_eq!(reb.rows[1].extras.get(&StatKey::Minutes), Some(&30.0));
    }

    #[test]
    fn empty_forms_give_empty_boards() {
        let board = leader_board(&[], LeaderCategory::Blocks, 30);
        assert!(board.rows.is_empty());
    }
}
