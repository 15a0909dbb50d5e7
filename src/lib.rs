pub mod calendar;
pub mod commands;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod geo;
pub mod location;
pub mod photos;
pub mod pins;
pub mod pipeline;
pub mod renewal;
pub mod report;
pub mod requests;
pub mod state;
pub mod storage;
pub mod stores;
pub mod types;
pub mod util;
pub mod weather;

/// Initialize `env_logger` with `info` as the default level. `RUST_LOG`
/// overrides it.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
