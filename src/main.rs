use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hoops_form::cache_store::CacheStore;
use hoops_form::config::{AppConfig, SourceMode};
use hoops_form::leaders::{LeaderBoard, league_leaders};
use hoops_form::live_fetch::LiveSource;
use hoops_form::profile::TrendDelta;
use hoops_form::reports::{
    FormReport, FormRequest, Unavailable, try_player_form, try_team_defense_form,
    try_team_offense_form,
};
use hoops_form::source::StatsSource;
use hoops_form::stat_catalog::StatKey;

#[derive(Parser, Debug)]
#[command(name = "hoops_form")]
#[command(about = "Season averages vs trimmed recent form for NBA players and teams", long_about = None)]
struct Cli {
    /// Cache directory written by the batch fetcher
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Season tag, e.g. 2025-26
    #[arg(long, global = true)]
    season: Option<String>,

    /// Number of recent played games
    #[arg(long, global = true)]
    window: Option<usize>,

    /// Query the stats provider instead of the cache
    #[arg(long, global = true)]
    live: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Player season vs recent form
    Player {
        /// Player id or name
        query: String,
    },
    /// Team offense season vs recent form
    Offense {
        /// Team id or name
        query: String,
    },
    /// Team defense (opponent stats) season vs recent form
    Defense {
        /// Team id or name
        query: String,
    },
    /// League leaders over the last seven played games
    Leaders {
        /// Rows per category
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Cache freshness and directory sizes
    Status,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = apply_overrides(AppConfig::from_env(), &cli);
    let source = build_source(&config);

    match &cli.command {
        Commands::Player { query } => {
            let players = source.players(&config.season)?;
            let entry = players
                .resolve(query)
                .ok_or_else(|| anyhow!("no player matches '{query}'"))?;
            let req = FormRequest::new(entry.id, &config.season).with_window(config.window);
            emit(&cli, try_player_form(source.as_ref(), &req))
        }
        Commands::Offense { query } => {
            let req = team_request(source.as_ref(), &config, query)?;
            emit(&cli, try_team_offense_form(source.as_ref(), &req))
        }
        Commands::Defense { query } => {
            let req = team_request(source.as_ref(), &config, query)?;
            emit(&cli, try_team_defense_form(source.as_ref(), &req))
        }
        Commands::Leaders { limit } => {
            let limit = limit.unwrap_or(config.leaders_limit).max(1);
            let boards = league_leaders(source.as_ref(), &config.season, limit)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&boards)?);
            } else {
                for board in &boards {
                    print_board(board);
                }
            }
            Ok(())
        }
        Commands::Status => print_status(source.as_ref(), &config),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hoops_form=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(dir) = cli.cache_dir.as_ref() {
        config.cache_dir = dir.clone();
    }
    if let Some(season) = cli.season.as_ref() {
        config.season = season.clone();
    }
    if let Some(window) = cli.window {
        config.window = window.max(1);
    }
    if cli.live {
        config.source = SourceMode::Live;
    }
    config
}

fn build_source(config: &AppConfig) -> Box<dyn StatsSource> {
    match config.source {
        SourceMode::Cache => Box::new(CacheStore::new(&config.cache_dir)),
        SourceMode::Live => Box::new(LiveSource::new(config.http_ttl)),
    }
}

fn team_request(source: &dyn StatsSource, config: &AppConfig, query: &str) -> Result<FormRequest> {
    let teams = source.teams(&config.season)?.league_only();
    let entry = teams
        .resolve(query)
        .ok_or_else(|| anyhow!("no team matches '{query}'"))?;
    Ok(FormRequest::new(entry.id, &config.season).with_window(config.window))
}

fn emit(cli: &Cli, outcome: Result<FormReport, Unavailable>) -> Result<()> {
    let report = match outcome {
        Ok(report) => report,
        Err(err) => bail!("report unavailable: {err}"),
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &FormReport) {
    let team = report
        .team
        .as_deref()
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();
    println!(
        "{}{} | {} | {}",
        report.entity_name,
        team,
        report.kind.label(),
        report.season_id
    );
    let span = report
        .window_span
        .map(|(from, to)| format!(", {from} to {to}"))
        .unwrap_or_default();
    println!(
        "Season: {} games | Last {}: {} games{}",
        report.season.games, report.window, report.trimmed_recent.games, span
    );
    if let Some(att) = report.attendance {
        println!(
            "Team games: {} | Played: {} | Missed: {}",
            att.team_games, att.games_played, att.games_missed
        );
    }
    println!();
    println!("{:<24} {:>9} {:>9} {:>9}", "Stat", "Season", "Recent", "Delta");
    for delta in &report.trend_deltas {
        println!(
            "{:<24} {:>9} {:>9} {:>9} {}",
            delta.key.label(),
            format_value(delta.key, delta.season),
            format_value(delta.key, delta.recent),
            format_delta(delta),
            trend_marker(delta)
        );
    }

    if report.recent_games.is_empty() {
        return;
    }
    println!();
    let keys = report.kind.keys();
    let header: Vec<String> = keys.iter().map(|k| format!("{:>7}", k.code().to_uppercase())).collect();
    println!("{:<10} {:<14} {:>2} {:>5} {}", "Date", "Matchup", "WL", "MIN", header.join(""));
    for game in &report.recent_games {
        let date = game.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        let wl = game.outcome.map(|o| o.letter().to_string()).unwrap_or_default();
        let values: Vec<String> = keys
            .iter()
            .map(|k| format!("{:>7}", format_value(*k, game.values.get(k).copied().unwrap_or(0.0))))
            .collect();
        println!(
            "{:<10} {:<14} {:>2} {:>5.1} {}",
            date,
            game.matchup,
            wl,
            game.minutes,
            values.join("")
        );
    }
}

fn format_value(key: StatKey, value: f64) -> String {
    if key.is_percentage() {
        format!("{:.1}%", value * 100.0)
    } else {
        format!("{value:.1}")
    }
}

fn format_delta(delta: &TrendDelta) -> String {
    if delta.key.is_percentage() {
        format!("{:+.1}%", delta.delta * 100.0)
    } else {
        format!("{:+.1}", delta.delta)
    }
}

fn trend_marker(delta: &TrendDelta) -> &'static str {
    match delta.favorable() {
        Some(true) => "better",
        Some(false) => "worse",
        None => "",
    }
}

fn print_board(board: &LeaderBoard) {
    println!("{}", board.category.title());
    let key = board.category.key();
    for row in &board.rows {
        let extras: Vec<String> = board
            .category
            .companions()
            .iter()
            .map(|k| {
                let v = row.extras.get(k).copied().unwrap_or(0.0);
                format!("{} {}", k.code().to_uppercase(), format_value(*k, v))
            })
            .collect();
        println!(
            "{:>3}. {:<26} {:<4} {:>2} GP {:>6} {}",
            row.rank,
            row.player_name,
            row.team,
            row.games,
            format_value(key, row.value),
            extras.join("  ")
        );
    }
    println!();
}

fn print_status(source: &dyn StatsSource, config: &AppConfig) -> Result<()> {
    match config.source {
        SourceMode::Cache => println!("Source: cache at {}", config.cache_dir.display()),
        SourceMode::Live => println!("Source: live stats provider"),
    }
    println!("Season: {}", config.season);

    let players = source
        .players(&config.season)
        .context("player directory unavailable")?;
    let teams = source.teams(&config.season).context("team directory unavailable")?;
    let league = teams.clone().league_only();
    for (label, refreshed, tag, count) in [
        ("Players", players.refreshed_at(), players.season.as_deref(), players.len()),
        ("Teams", league.refreshed_at(), teams.season.as_deref(), league.len()),
    ] {
        let refreshed = refreshed
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{label}: {count} entries, season {}, refreshed {refreshed}",
            tag.unwrap_or("?")
        );
    }
    if config.source == SourceMode::Cache {
        let store = CacheStore::new(&config.cache_dir);
        println!(
            "Cached files: {} players, {} team game logs",
            store.player_file_count(),
            store.team_log_file_count()
        );
    }
    Ok(())
}
