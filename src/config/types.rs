//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: default_command_prefix(),
        }
    }
}

/// Names of the categories, channels and roles the bot expects in the guild.
///
/// Everything is looked up by exact, case-sensitive name on every command.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub day_category: String,
    pub night_category: String,
    pub town_square: String,
    /// Name of the channel the bot accepts commands in. Any channel kind.
    pub control_channel: String,
    pub storyteller_role: String,
    pub current_game_role: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            day_category: "BotC - Daytime".to_string(),
            night_category: "BotC - Nighttime".to_string(),
            town_square: "Town Square".to_string(),
            control_channel: "botc_mover".to_string(),
            storyteller_role: "BotC Current Storyteller".to_string(),
            current_game_role: "BotC Current Game".to_string(),
        }
    }
}

fn default_command_prefix() -> String {
    "!".to_string()
}
