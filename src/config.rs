use std::path::PathBuf;

use serde::Deserialize;

/// Scoreboard version.
#[allow(dead_code)]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent header for outgoing requests.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Limits the number of rows on the big-screen time trial boards.
///
/// This should be as low as necessary to keep the board readable
/// on a distant display.
pub const MAX_DISPLAYED_HEAT_RANKS: usize = 16;

/// The number of heats that make up the overall league standings.
pub const NB_LEAGUE_HEATS: usize = 3;

/// The race keys of the league heats, in standings column order.
/// The last key doubles as the tie-breaker for equal league totals.
pub const LEAGUE_HEAT_KEYS: [&str; NB_LEAGUE_HEATS] = ["heat1", "heat2", "heat3"];

/// How often the result store is polled per subscription.
///
/// The store publishes whole-payload snapshots, so polling more often
/// only re-downloads identical payloads.
pub const STORE_POLL_INTERVAL_SECS: u64 = 2;

/// Scoreboard config.
#[derive(Deserialize)]
pub struct Config {
    /// Base URL of the result store's REST endpoint, f.e.
    /// "https://dm-ecykling.firebaseio.com". Payloads are read from
    /// `<store_url>/race_results/<event id>.json`.
    pub store_url: String,

    /// Path of the JSON lookup table mapping category and race keys
    /// to the store's opaque event identifiers.
    pub event_map_file: PathBuf,

    /// Directory the rendered boards are written to. The display
    /// surface serves these files as-is.
    pub output_dir: PathBuf,

    /// Heading shown on every board, f.e. "DM e-cykling 2025".
    pub event_title: String,
}

impl Config {
    /// Read the config file listed in the `VELOBOARD_CONFIG`
    /// environment variable.
    ///
    /// # Panics
    /// - when `VELOBOARD_CONFIG` is not set
    /// - when `VELOBOARD_CONFIG` does not point to a valid TOML config
    /// - when an assertion on one or more values fails
    pub fn read_from_env() -> Config {
        const CONFIG_ENV_VAR: &str = "VELOBOARD_CONFIG";

        fn parse_file(f: PathBuf) -> anyhow::Result<Config> {
            let f_str = std::fs::read_to_string(f)?;
            let config: Config = toml::from_str(&f_str)?;
            Ok(config)
        }

        let env_file = match std::env::var(CONFIG_ENV_VAR) {
            Ok(f) => Some(PathBuf::from(f)).filter(|p| p.is_file()),
            Err(_) => None,
        };

        if let Some(f) = env_file {
            let cfg = parse_file(f).expect("failed to parse config file");
            check_config(&cfg);
            return cfg;
        }

        panic!("cannot locate config: use the '{}' env var", CONFIG_ENV_VAR)
    }
}

/// Try to catch configuration errors early.
fn check_config(config: &Config) {
    assert!(
        !config.store_url.is_empty(),
        "config: 'store_url' must not be empty!"
    );
    assert!(
        !config.store_url.ends_with('/'),
        "config: 'store_url' must not end with a slash!"
    );
}
