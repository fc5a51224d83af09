//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `DISCORD_TOKEN` - Discord bot token
//! - `BOTC_MOVER_DISCORD_TOKEN` - Discord bot token (wins over `DISCORD_TOKEN`)
//! - `BOTC_MOVER_COMMAND_PREFIX` - Command prefix
//! - `BOTC_MOVER_CONFIG` - Config file path

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "BOTC_MOVER";

/// Plain token variable, read for compatibility with `.env` files that predate the prefix.
const LEGACY_TOKEN_VAR: &str = "DISCORD_TOKEN";

/// Apply environment variable overrides to a config.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(LEGACY_TOKEN_VAR) {
        config.discord.token = token;
    }
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }

    if let Ok(prefix) = env::var(format!("{}_COMMAND_PREFIX", ENV_PREFIX)) {
        config.discord.command_prefix = prefix;
    }

    config
}

/// Load a `.env` file from the working directory, if there is one.
///
/// Returns the path that was loaded.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}

/// Get the config file path from environment or use default.
///
/// Checks `BOTC_MOVER_CONFIG`, otherwise returns "botc-mover.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "botc-mover.conf".to_string())
}
