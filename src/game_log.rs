use chrono::NaiveDate;
use serde::Serialize;

use crate::minutes::MinutesValue;
use crate::stat_catalog::StatKey;
use crate::stat_math::safe_div;

pub const DEFAULT_WINDOW: usize = 7;
pub const SHORT_WINDOW: usize = 5;
pub const MINI_WINDOW: usize = 3;

/// Counting stats of one side of a box score (or season totals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxLine {
    pub pts: f64,
    pub reb: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fg3m: f64,
    pub fg3a: f64,
    pub ftm: f64,
    pub fta: f64,
    // Source-provided rates; derived from made/attempted when absent.
    pub fg_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ft_pct: Option<f64>,
}

impl BoxLine {
    pub fn fg_pct(&self) -> f64 {
        self.fg_pct.unwrap_or_else(|| safe_div(self.fgm, self.fga))
    }

    pub fn fg3_pct(&self) -> f64 {
        self.fg3_pct.unwrap_or_else(|| safe_div(self.fg3m, self.fg3a))
    }

    pub fn ft_pct(&self) -> f64 {
        self.ft_pct.unwrap_or_else(|| safe_div(self.ftm, self.fta))
    }

    /// Same line with every rate recomputed from made/attempted.
    pub fn with_derived_rates(mut self) -> Self {
        self.fg_pct = Some(safe_div(self.fgm, self.fga));
        self.fg3_pct = Some(safe_div(self.fg3m, self.fg3a));
        self.ft_pct = Some(safe_div(self.ftm, self.fta));
        self
    }

    /// Own-side value for a key; opponent keys and minutes are 0 here.
    pub fn value(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Points => self.pts,
            StatKey::Rebounds => self.reb,
            StatKey::OffRebounds => self.oreb,
            StatKey::DefRebounds => self.dreb,
            StatKey::Assists => self.ast,
            StatKey::Steals => self.stl,
            StatKey::Blocks => self.blk,
            StatKey::Turnovers => self.tov,
            StatKey::Fouls => self.pf,
            StatKey::FieldGoalsMade => self.fgm,
            StatKey::FieldGoalPct => self.fg_pct(),
            StatKey::ThreesMade => self.fg3m,
            StatKey::ThreePct => self.fg3_pct(),
            StatKey::FreeThrowsMade => self.ftm,
            StatKey::FreeThrowPct => self.ft_pct(),
            StatKey::AssistTurnoverRatio => safe_div(self.ast, self.tov),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl GameOutcome {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "W" => Some(Self::Win),
            "L" => Some(Self::Loss),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Win => 'W',
            Self::Loss => 'L',
        }
    }
}

/// One game as played by one entity (player or team).
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    pub game_id: String,
    pub game_date: Option<NaiveDate>,
    pub matchup: String,
    pub team_id: Option<u32>,
    pub outcome: Option<GameOutcome>,
    pub minutes: MinutesValue,
    pub plus_minus: Option<f64>,
    pub line: BoxLine,
}

/// Anything the profile builders can aggregate.
pub trait StatRow {
    fn game_id(&self) -> &str;
    fn game_date(&self) -> Option<NaiveDate>;
    fn matchup(&self) -> &str;
    fn outcome(&self) -> Option<GameOutcome>;
    fn minutes(&self) -> f64;
    fn stat(&self, key: StatKey) -> f64;

    fn played(&self) -> bool {
        self.minutes() > 0.0
    }
}

impl StatRow for GameRecord {
    fn game_id(&self) -> &str {
        &self.game_id
    }

    fn game_date(&self) -> Option<NaiveDate> {
        self.game_date
    }

    fn matchup(&self) -> &str {
        &self.matchup
    }

    fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    fn minutes(&self) -> f64 {
        self.minutes.normalized()
    }

    fn stat(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Minutes => self.minutes(),
            // A team's own row only knows the opponent's score through plus-minus.
            StatKey::OppPoints => self
                .plus_minus
                .map(|pm| (self.line.pts - pm).max(0.0))
                .unwrap_or(0.0),
            _ => self.line.value(key),
        }
    }
}

/// Played games only, input order kept.
pub fn played_games<R: StatRow>(rows: &[R]) -> Vec<&R> {
    rows.iter().filter(|r| r.played()).collect()
}

/// The most recent `window` played games from a most-recent-first history.
pub fn select_recent<R: StatRow>(rows: &[R], window: usize) -> Vec<&R> {
    rows.iter().filter(|r| r.played()).take(window).collect()
}

/// Stable sort newest first, but only when every record carries a date;
/// otherwise the source order is trusted.
pub fn order_most_recent_first(records: &mut [GameRecord]) {
    if records.iter().all(|r| r.game_date.is_some()) {
        records.sort_by(|a, b| b.game_date.cmp(&a.game_date));
    }
}

/// Oldest and newest date of a window, when dated.
pub fn date_span<R: StatRow>(rows: &[&R]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = rows.iter().filter_map(|r| r.game_date());
    let first = dates.next()?;
    let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some((lo, hi))
}
