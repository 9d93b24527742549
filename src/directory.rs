use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::nba_rows::{RawRow, id_field, text_field};

/// Franchise ids of the league all start with this prefix; the provider also
/// lists G League and WNBA clubs.
pub const NBA_TEAM_ID_PREFIX: &str = "1610612";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerEntry {
    pub id: u32,
    pub display_name: String,
    /// 0 for unaffiliated players.
    pub team_id: u32,
    pub team_abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamEntry {
    pub id: u32,
    pub name: String,
}

pub trait DirectoryEntry {
    fn id(&self) -> u32;
    fn name(&self) -> &str;
}

impl DirectoryEntry for PlayerEntry {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}

impl DirectoryEntry for TeamEntry {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Read-only snapshot of players or teams.
#[derive(Debug, Clone, Serialize)]
pub struct Directory<T> {
    pub last_updated: Option<String>,
    pub season: Option<String>,
    pub entries: Vec<T>,
}

impl<T> Default for Directory<T> {
    fn default() -> Self {
        Self {
            last_updated: None,
            season: None,
            entries: Vec::new(),
        }
    }
}

impl<T: DirectoryEntry> Directory<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_updated.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    pub fn find_by_id(&self, id: u32) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Exact (case-insensitive) name first, then a unique partial match.
    pub fn find_by_name(&self, query: &str) -> Option<&T> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }
        if let Some(hit) = self.entries.iter().find(|e| e.name().to_lowercase() == q) {
            return Some(hit);
        }
        let mut partial = self.entries.iter().filter(|e| e.name().to_lowercase().contains(&q));
        let first = partial.next()?;
        partial.next().is_none().then_some(first)
    }

    /// Numeric queries are ids, everything else a name.
    pub fn resolve(&self, query: &str) -> Option<&T> {
        match query.trim().parse::<u32>() {
            Ok(id) => self.find_by_id(id),
            Err(_) => self.find_by_name(query),
        }
    }

    /// Entries sorted by display name.
    pub fn sorted_by_name(&self) -> Vec<&T> {
        let mut out: Vec<&T> = self.entries.iter().collect();
        out.sort_by(|a, b| a.name().cmp(b.name()));
        out
    }
}

impl Directory<TeamEntry> {
    pub fn league_only(mut self) -> Self {
        self.entries
            .retain(|t| t.id.to_string().starts_with(NBA_TEAM_ID_PREFIX));
        self
    }

    pub fn ids(&self) -> HashSet<u32> {
        self.entries.iter().map(|t| t.id).collect()
    }
}

impl Directory<PlayerEntry> {
    /// Keep players on one of `team_ids`, plus free agents.
    pub fn on_teams(mut self, team_ids: &HashSet<u32>) -> Self {
        self.entries
            .retain(|p| p.team_id == 0 || team_ids.contains(&p.team_id));
        self
    }
}

pub fn player_entry_from_row(row: &RawRow) -> Option<PlayerEntry> {
    Some(PlayerEntry {
        id: id_field(row, &["PERSON_ID", "PLAYER_ID"])?,
        display_name: text_field(row, &["DISPLAY_FIRST_LAST", "PLAYER_NAME"])?,
        team_id: id_field(row, &["TEAM_ID"]).unwrap_or(0),
        team_abbreviation: text_field(row, &["TEAM_ABBREVIATION"]),
    })
}

pub fn team_entry_from_row(row: &RawRow) -> Option<TeamEntry> {
    Some(TeamEntry {
        id: id_field(row, &["TEAM_ID"])?,
        name: text_field(row, &["TEAM_NAME"])?,
    })
}
