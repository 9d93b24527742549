use serde::{Serialize, Serializer};

/// Canonical statistic names shared by every profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatKey {
    Points,
    Rebounds,
    OffRebounds,
    DefRebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    Fouls,
    FieldGoalsMade,
    FieldGoalPct,
    ThreesMade,
    ThreePct,
    FreeThrowsMade,
    FreeThrowPct,
    AssistTurnoverRatio,
    Minutes,
    OppPoints,
    OppFieldGoalPct,
    OppThreesMade,
    OppThreePct,
    OppFreeThrowPct,
    OppRebounds,
    OppAssists,
    OppTurnovers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

/// How a per-game column turns into a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Counting stat; totals are divided by games.
    Count,
    /// Already a rate per game (percentages, minutes handled separately).
    Rate,
    /// Quotient of two aggregated counting stats.
    Ratio(StatKey, StatKey),
}

impl StatKey {
    pub const ALL: [StatKey; 25] = [
        StatKey::Points,
        StatKey::Rebounds,
        StatKey::OffRebounds,
        StatKey::DefRebounds,
        StatKey::Assists,
        StatKey::Steals,
        StatKey::Blocks,
        StatKey::Turnovers,
        StatKey::Fouls,
        StatKey::FieldGoalsMade,
        StatKey::FieldGoalPct,
        StatKey::ThreesMade,
        StatKey::ThreePct,
        StatKey::FreeThrowsMade,
        StatKey::FreeThrowPct,
        StatKey::AssistTurnoverRatio,
        StatKey::Minutes,
        StatKey::OppPoints,
        StatKey::OppFieldGoalPct,
        StatKey::OppThreesMade,
        StatKey::OppThreePct,
        StatKey::OppFreeThrowPct,
        StatKey::OppRebounds,
        StatKey::OppAssists,
        StatKey::OppTurnovers,
    ];

    pub fn code(self) -> &'static str {
        match self {
            StatKey::Points => "pts",
            StatKey::Rebounds => "reb",
            StatKey::OffRebounds => "oreb",
            StatKey::DefRebounds => "dreb",
            StatKey::Assists => "ast",
            StatKey::Steals => "stl",
            StatKey::Blocks => "blk",
            StatKey::Turnovers => "tov",
            StatKey::Fouls => "pf",
            StatKey::FieldGoalsMade => "fgm",
            StatKey::FieldGoalPct => "fg_pct",
            StatKey::ThreesMade => "fg3m",
            StatKey::ThreePct => "fg3_pct",
            StatKey::FreeThrowsMade => "ftm",
            StatKey::FreeThrowPct => "ft_pct",
            StatKey::AssistTurnoverRatio => "ast_tov",
            StatKey::Minutes => "min",
            StatKey::OppPoints => "opp_pts",
            StatKey::OppFieldGoalPct => "opp_fg_pct",
            StatKey::OppThreesMade => "opp_fg3m",
            StatKey::OppThreePct => "opp_fg3_pct",
            StatKey::OppFreeThrowPct => "opp_ft_pct",
            StatKey::OppRebounds => "opp_reb",
            StatKey::OppAssists => "opp_ast",
            StatKey::OppTurnovers => "opp_tov",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKey::Points => "Points",
            StatKey::Rebounds => "Rebounds",
            StatKey::OffRebounds => "Offensive Rebounds",
            StatKey::DefRebounds => "Defensive Rebounds",
            StatKey::Assists => "Assists",
            StatKey::Steals => "Steals",
            StatKey::Blocks => "Blocks",
            StatKey::Turnovers => "Turnovers",
            StatKey::Fouls => "Fouls",
            StatKey::FieldGoalsMade => "FG Made",
            StatKey::FieldGoalPct => "Field Goal %",
            StatKey::ThreesMade => "3-Pointers Made",
            StatKey::ThreePct => "3-Point %",
            StatKey::FreeThrowsMade => "FT Made",
            StatKey::FreeThrowPct => "Free Throw %",
            StatKey::AssistTurnoverRatio => "AST/TO Ratio",
            StatKey::Minutes => "Minutes",
            StatKey::OppPoints => "Opponent PPG",
            StatKey::OppFieldGoalPct => "Opponent FG%",
            StatKey::OppThreesMade => "Opponent 3PM",
            StatKey::OppThreePct => "Opponent 3PT%",
            StatKey::OppFreeThrowPct => "Opponent FT%",
            StatKey::OppRebounds => "Opponent Rebounds",
            StatKey::OppAssists => "Opponent Assists",
            StatKey::OppTurnovers => "Opponent Turnovers",
        }
    }

    pub fn from_code(code: &str) -> Option<StatKey> {
        StatKey::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn aggregation(self) -> Aggregation {
        match self {
            StatKey::FieldGoalPct
            | StatKey::ThreePct
            | StatKey::FreeThrowPct
            | StatKey::Minutes
            | StatKey::OppFieldGoalPct
            | StatKey::OppThreePct
            | StatKey::OppFreeThrowPct => Aggregation::Rate,
            StatKey::AssistTurnoverRatio => {
                Aggregation::Ratio(StatKey::Assists, StatKey::Turnovers)
            }
            _ => Aggregation::Count,
        }
    }

    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            StatKey::FieldGoalPct
                | StatKey::ThreePct
                | StatKey::FreeThrowPct
                | StatKey::OppFieldGoalPct
                | StatKey::OppThreePct
                | StatKey::OppFreeThrowPct
        )
    }

    pub fn direction(self) -> Direction {
        match self {
            StatKey::Turnovers
            | StatKey::Fouls
            | StatKey::OppPoints
            | StatKey::OppFieldGoalPct
            | StatKey::OppThreesMade
            | StatKey::OppThreePct
            | StatKey::OppFreeThrowPct
            | StatKey::OppRebounds
            | StatKey::OppAssists => Direction::LowerBetter,
            _ => Direction::HigherBetter,
        }
    }

    /// The same statistic read from the other side of the box score.
    pub fn opponent_source(self) -> Option<StatKey> {
        match self {
            StatKey::OppPoints => Some(StatKey::Points),
            StatKey::OppFieldGoalPct => Some(StatKey::FieldGoalPct),
            StatKey::OppThreesMade => Some(StatKey::ThreesMade),
            StatKey::OppThreePct => Some(StatKey::ThreePct),
            StatKey::OppFreeThrowPct => Some(StatKey::FreeThrowPct),
            StatKey::OppRebounds => Some(StatKey::Rebounds),
            StatKey::OppAssists => Some(StatKey::Assists),
            StatKey::OppTurnovers => Some(StatKey::Turnovers),
            _ => None,
        }
    }
}

impl Serialize for StatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Which comparison table a profile feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Player,
    TeamOffense,
    TeamDefense,
}

const PLAYER_KEYS: &[StatKey] = &[
    StatKey::Points,
    StatKey::Rebounds,
    StatKey::Assists,
    StatKey::Steals,
    StatKey::Blocks,
    StatKey::Turnovers,
    StatKey::ThreesMade,
    StatKey::FieldGoalPct,
    StatKey::FreeThrowPct,
    StatKey::Minutes,
];

const TEAM_OFFENSE_KEYS: &[StatKey] = &[
    StatKey::Points,
    StatKey::FieldGoalPct,
    StatKey::FieldGoalsMade,
    StatKey::ThreesMade,
    StatKey::ThreePct,
    StatKey::FreeThrowPct,
    StatKey::FreeThrowsMade,
    StatKey::Assists,
    StatKey::Turnovers,
    StatKey::AssistTurnoverRatio,
    StatKey::OffRebounds,
    StatKey::DefRebounds,
    StatKey::Rebounds,
];

const TEAM_DEFENSE_KEYS: &[StatKey] = &[
    StatKey::OppPoints,
    StatKey::OppFieldGoalPct,
    StatKey::OppThreesMade,
    StatKey::OppThreePct,
    StatKey::OppFreeThrowPct,
    StatKey::OppRebounds,
    StatKey::OppAssists,
    StatKey::OppTurnovers,
    StatKey::Steals,
    StatKey::Blocks,
    StatKey::DefRebounds,
    StatKey::Fouls,
];

impl ProfileKind {
    /// Display order of the comparison table.
    pub fn keys(self) -> &'static [StatKey] {
        match self {
            ProfileKind::Player => PLAYER_KEYS,
            ProfileKind::TeamOffense => TEAM_OFFENSE_KEYS,
            ProfileKind::TeamDefense => TEAM_DEFENSE_KEYS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileKind::Player => "Player",
            ProfileKind::TeamOffense => "Team Offense",
            ProfileKind::TeamDefense => "Team Defense",
        }
    }
}
