//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate Discord config
    if config.discord.token.is_empty() {
        errors.push("discord.token is required (or set DISCORD_TOKEN)".to_string());
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }
    if config.discord.command_prefix.is_empty() {
        errors.push("discord.command_prefix must not be empty".to_string());
    }
    if config.discord.command_prefix.chars().any(char::is_whitespace) {
        errors.push("discord.command_prefix must not contain whitespace".to_string());
    }

    // Validate guild layout names
    let layout = &config.layout;
    let names = [
        ("layout.day_category", &layout.day_category),
        ("layout.night_category", &layout.night_category),
        ("layout.town_square", &layout.town_square),
        ("layout.control_channel", &layout.control_channel),
        ("layout.storyteller_role", &layout.storyteller_role),
        ("layout.current_game_role", &layout.current_game_role),
    ];
    for (field, value) in names {
        if value.is_empty() {
            errors.push(format!("{} must not be empty", field));
        }
    }
    if !layout.day_category.is_empty() && layout.day_category == layout.night_category {
        errors.push(format!(
            "layout.day_category and layout.night_category are both '{}'",
            layout.day_category
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
