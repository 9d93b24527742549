use std::path::PathBuf;

use hoops_form::cache_store::CacheStore;
use hoops_form::leaders::{LeaderCategory, collect_recent_forms, league_leaders};
use hoops_form::stat_catalog::StatKey;

fn fixture_store() -> CacheStore {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("cached_data");
    CacheStore::new(path)
}

#[test]
fn only_league_players_with_three_recent_games_qualify() {
    let forms = collect_recent_forms(&fixture_store(), "2025-26").expect("forms");
    let mut ids: Vec<u32> = forms.iter().map(|f| f.player_id).collect();
    ids.sort();
    // Two-game and zero-game players miss the cut; the WNBA player is filtered out.
    assert_eq!(ids, [1001, 1005]);
}

#[test]
fn boards_rank_each_category() {
    let boards = league_leaders(&fixture_store(), "2025-26", 30).expect("boards");
    assert_eq!(boards.len(), LeaderCategory::ALL.len());

    let points = boards
        .iter()
        .find(|b| b.category == LeaderCategory::Points)
        .expect("points board");
    assert_eq!(points.rows.len(), 2);
    assert_eq!(points.rows[0].player_name, "Ada Guard");
    assert!((points.rows[0].value - 22.4).abs() < 1e-9);
    assert_eq!(points.rows[0].games, 7);
    assert_eq!(points.rows[1].player_name, "Eve Wing");
    assert_eq!(points.rows[1].value, 20.0);
    assert_eq!(points.rows[1].team, "GSW");
    assert!(points.rows[0].extras.contains_key(&StatKey::ThreesMade));

    let rebounds = boards
        .iter()
        .find(|b| b.category == LeaderCategory::Rebounds)
        .expect("rebounds board");
    assert_eq!(rebounds.rows[0].player_id, 1005);
    assert_eq!(rebounds.rows[0].rank, 1);
    assert_eq!(rebounds.rows[1].rank, 2);
}

#[test]
fn limit_caps_rows() {
    let boards = league_leaders(&fixture_store(), "2025-26", 1).expect("boards");
    assert!(boards.iter().all(|b| b.rows.len() == 1));
}
