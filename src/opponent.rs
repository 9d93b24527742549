use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::game_log::{BoxLine, GameOutcome, GameRecord, StatRow};
use crate::minutes::MinutesValue;
use crate::stat_catalog::StatKey;

/// A team's game joined with the opposing box score of the same contest.
#[derive(Debug, Clone)]
pub struct DefensiveGame {
    pub game_id: String,
    pub game_date: Option<NaiveDate>,
    pub matchup: String,
    pub outcome: Option<GameOutcome>,
    pub minutes: MinutesValue,
    pub opponent_team_id: Option<u32>,
    /// Opponent line with rates recomputed from made/attempted.
    pub opponent: BoxLine,
    pub own: BoxLine,
}

impl StatRow for DefensiveGame {
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
        if key == StatKey::Minutes {
            return self.minutes();
        }
        match key.opponent_source() {
            Some(src) => self.opponent.value(src),
            None => self.own.value(key),
        }
    }
}

/// League-wide rows grouped by game id.
pub struct GameIndex<'a> {
    by_game: HashMap<&'a str, Vec<&'a GameRecord>>,
}

impl<'a> GameIndex<'a> {
    pub fn build(league: &'a [GameRecord]) -> Self {
        let mut by_game: HashMap<&'a str, Vec<&'a GameRecord>> = HashMap::with_capacity(league.len() / 2 + 1);
        for row in league {
            by_game.entry(row.game_id.as_str()).or_default().push(row);
        }
        Self { by_game }
    }

    pub fn len(&self) -> usize {
        self.by_game.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_game.is_empty()
    }

    /// The row of `game_id` that belongs to any team other than `team_id`.
    pub fn opponent_row(&self, game_id: &str, team_id: u32) -> Option<&'a GameRecord> {
        self.by_game
            .get(game_id)?
            .iter()
            .copied()
            .find(|row| row.team_id.is_some_and(|id| id != team_id))
    }
}

/// Join each of `team_id`'s games with its opponent's row.
///
/// Games with no opponent row in the league set are dropped; order follows
/// `own_games`.
pub fn reconcile_defense(
    team_id: u32,
    own_games: &[GameRecord],
    league: &[GameRecord],
) -> Vec<DefensiveGame> {
    let index = GameIndex::build(league);
    let mut out = Vec::with_capacity(own_games.len());
    for game in own_games {
        let own_team = game.team_id.unwrap_or(team_id);
        let Some(opp) = index.opponent_row(&game.game_id, own_team) else {
            debug!(game_id = %game.game_id, team_id, "no opponent row, dropping game");
            continue;
        };
        out.push(DefensiveGame {
            game_id: game.game_id.clone(),
            game_date: game.game_date.or(opp.game_date),
            matchup: game.matchup.clone(),
            outcome: game.outcome,
            minutes: game.minutes.clone(),
            opponent_team_id: opp.team_id,
            opponent: opp.line.with_derived_rates(),
            own: defensive_side(&game.line),
        });
    }
    out
}

fn defensive_side(line: &BoxLine) -> BoxLine {
    BoxLine {
        stl: line.stl,
        blk: line.blk,
        dreb: line.dreb,
        pf: line.pf,
        ..BoxLine::default()
    }
}
