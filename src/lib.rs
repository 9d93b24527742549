pub mod cache_store;
pub mod config;
pub mod directory;
pub mod game_log;
pub mod http_cache;
pub mod http_client;
pub mod leaders;
pub mod live_fetch;
pub mod minutes;
pub mod nba_rows;
pub mod opponent;
pub mod profile;
pub mod reports;
pub mod source;
pub mod stat_catalog;
pub mod stat_math;
