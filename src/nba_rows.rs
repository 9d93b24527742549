//! Adapters from the stats provider's JSON shapes to the canonical records.
//!
//! Two shapes show up: live responses (`resultSets` with `headers` + `rowSet`)
//! and the batch fetcher's normalized dicts (`{"PlayerGameLog": [{..}, ..]}`).
//! Column names differ in case between endpoints (`GAME_ID` vs `Game_ID`).

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::game_log::{BoxLine, GameOutcome, GameRecord};
use crate::minutes::MinutesValue;
use crate::profile::SeasonTotals;

pub type RawRow = Map<String, Value>;

/// Rows of the named result set, whichever shape `root` is in.
pub fn extract_rows(root: &Value, set_name: &str) -> Vec<RawRow> {
    if let Some(sets) = root.get("resultSets").and_then(|x| x.as_array()) {
        let named = sets
            .iter()
            .find(|s| s.get("name").and_then(|n| n.as_str()) == Some(set_name));
        return named.map(rows_from_table).unwrap_or_default();
    }
    if let Some(single) = root.get("resultSet") {
        return rows_from_table(single);
    }
    match root.get(set_name) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect(),
        _ => Vec::new(),
    }
}

fn rows_from_table(table: &Value) -> Vec<RawRow> {
    let Some(headers) = table.get("headers").and_then(|x| x.as_array()) else {
        return Vec::new();
    };
    let headers: Vec<String> = headers
        .iter()
        .map(|h| h.as_str().unwrap_or_default().to_string())
        .collect();
    let Some(rows) = table.get("rowSet").and_then(|x| x.as_array()) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|r| r.as_array())
        .map(|cells| {
            headers
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect::<RawRow>()
        })
        .collect()
}

pub fn field<'a>(row: &'a RawRow, names: &[&str]) -> Option<&'a Value> {
    for name in names {
        if let Some(v) = row.get(*name) {
            return Some(v);
        }
    }
    row.iter()
        .find(|(k, _)| names.iter().any(|n| k.eq_ignore_ascii_case(n)))
        .map(|(_, v)| v)
}

pub fn number_field(row: &RawRow, names: &[&str]) -> Option<f64> {
    match field(row, names)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

pub fn count_field(row: &RawRow, names: &[&str]) -> f64 {
    number_field(row, names).unwrap_or(0.0)
}

/// Shooting rate as a fraction; 0-100 style values are scaled down.
pub fn pct_field(row: &RawRow, names: &[&str]) -> Option<f64> {
    let v = number_field(row, names)?;
    if v < 0.0 {
        return None;
    }
    Some(if v > 1.0 { v / 100.0 } else { v })
}

pub fn text_field(row: &RawRow, names: &[&str]) -> Option<String> {
    match field(row, names)? {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn id_field(row: &RawRow, names: &[&str]) -> Option<u32> {
    match field(row, names)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    let cleaned = cleaned.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// "OCT 22, 2025", "2025-10-22" or "2025-10-22T00:00:00".
pub fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

pub fn box_line_from_row(row: &RawRow) -> BoxLine {
    let oreb = count_field(row, &["OREB"]);
    let dreb = count_field(row, &["DREB"]);
    let reb = number_field(row, &["REB"]).unwrap_or(oreb + dreb);
    BoxLine {
        pts: count_field(row, &["PTS"]),
        reb,
        oreb,
        dreb,
        ast: count_field(row, &["AST"]),
        stl: count_field(row, &["STL"]),
        blk: count_field(row, &["BLK"]),
        tov: count_field(row, &["TOV", "TO"]),
        pf: count_field(row, &["PF"]),
        fgm: count_field(row, &["FGM"]),
        fga: count_field(row, &["FGA"]),
        fg3m: count_field(row, &["FG3M"]),
        fg3a: count_field(row, &["FG3A"]),
        ftm: count_field(row, &["FTM"]),
        fta: count_field(row, &["FTA"]),
        fg_pct: pct_field(row, &["FG_PCT"]),
        fg3_pct: pct_field(row, &["FG3_PCT"]),
        ft_pct: pct_field(row, &["FT_PCT"]),
    }
}

/// A game row; `None` when it has no game id.
pub fn game_record_from_row(row: &RawRow, fallback_team: Option<u32>) -> Option<GameRecord> {
    let game_id = text_field(row, &["GAME_ID", "Game_ID"])?;
    Some(GameRecord {
        game_id,
        game_date: text_field(row, &["GAME_DATE"]).and_then(|d| parse_game_date(&d)),
        matchup: text_field(row, &["MATCHUP"]).unwrap_or_default(),
        team_id: id_field(row, &["TEAM_ID", "Team_ID"]).or(fallback_team),
        outcome: text_field(row, &["WL"]).and_then(|w| GameOutcome::parse(&w)),
        minutes: MinutesValue::from_json(field(row, &["MIN"])),
        plus_minus: number_field(row, &["PLUS_MINUS"]),
        line: box_line_from_row(row),
    })
}

pub fn game_records(rows: &[RawRow], fallback_team: Option<u32>) -> Vec<GameRecord> {
    rows.iter()
        .filter_map(|r| game_record_from_row(r, fallback_team))
        .collect()
}

pub fn season_totals_from_row(row: &RawRow) -> Option<SeasonTotals> {
    let season_id = text_field(row, &["SEASON_ID"])?;
    let games_played = number_field(row, &["GP"])
        .filter(|g| *g >= 0.0)
        .map(|g| g as u32)
        .unwrap_or(0);
    Some(SeasonTotals {
        season_id,
        team_abbreviation: text_field(row, &["TEAM_ABBREVIATION"]),
        games_played,
        minutes_total: MinutesValue::from_json(field(row, &["MIN"])).normalized(),
        totals: box_line_from_row(row),
    })
}

/// The regular-season totals row whose season id contains `season`.
pub fn find_season_totals<'a>(rows: &'a [SeasonTotals], season: &str) -> Option<&'a SeasonTotals> {
    let season = season.trim();
    // Traded players get one row per team plus a "TOT" row; prefer the total.
    let matching: Vec<&SeasonTotals> = rows.iter().filter(|r| r.season_id.contains(season)).collect();
    matching
        .iter()
        .copied()
        .find(|r| r.team_abbreviation.as_deref() == Some("TOT"))
        .or_else(|| matching.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_sets_and_normalized_agree() {
        let live = json!({
            "resultSets": [
                {"name": "Other", "headers": ["X"], "rowSet": [[1]]},
                {"name": "PlayerGameLog", "headers": ["Game_ID", "PTS", "MIN"], "rowSet": [["0022500001", 31, "35:30"]]}
            ]
        });
        let cached = json!({"PlayerGameLog": [{"Game_ID": "0022500001", "PTS": 31, "MIN": "35:30"}]});
        let a = game_records(&extract_rows(&live, "PlayerGameLog"), None);
        let b = game_records(&extract_rows(&cached, "PlayerGameLog"), None);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].game_id, b[0].game_id);
        assert_eq!(a[0].line.pts, 31.0);
        assert_eq!(a[0].minutes.normalized(), 35.5);
        assert!(extract_rows(&live, "Missing").is_empty());
    }

    #[test]
    fn pct_and_numbers() {
        let row: RawRow = serde_json::from_value(json!({
            "FG_PCT": 47.5, "FT_PCT": "0.81", "FG3_PCT": null, "REB": "1,024", "gp": 12
        }))
        .unwrap();
        assert_eq!(pct_field(&row, &["FG_PCT"]), Some(0.475));
        assert_eq!(pct_field(&row, &["FT_PCT"]), Some(0.81));
        assert_eq!(pct_field(&row, &["FG3_PCT"]), None);
        assert_eq!(number_field(&row, &["REB"]), Some(1024.0));
        assert_eq!(number_field(&row, &["GP"]), Some(12.0));
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2025, 10, 22);
        assert_eq!(parse_game_date("OCT 22, 2025"), d);
        assert_eq!(parse_game_date("Oct 22, 2025"), d);
        assert_eq!(parse_game_date("2025-10-22"), d);
        assert_eq!(parse_game_date("2025-10-22T00:00:00"), d);
        assert_eq!(parse_game_date("someday"), None);
    }

    #[test]
    fn rebounds_fall_back_to_components() {
        let row: RawRow = serde_json::from_value(json!({"OREB": 3, "DREB": 5})).unwrap();
        assert_eq!(box_line_from_row(&row).reb, 8.0);
    }

    #[test]
    fn season_row_prefers_tot() {
        let rows = vec![
            SeasonTotals { season_id: "2024-25".into(), games_played: 70, ..Default::default() },
            SeasonTotals { season_id: "2025-26".into(), team_abbreviation: Some("LAL".into()), games_played: 10, ..Default::default() },
            SeasonTotals { season_id: "2025-26".into(), team_abbreviation: Some("TOT".into()), games_played: 25, ..Default::default() },
        ];
        assert_eq!(find_season_totals(&rows, "2025-26").map(|r| r.games_played), Some(25));
        assert!(find_season_totals(&rows, "2019-20").is_none());
    }
}
