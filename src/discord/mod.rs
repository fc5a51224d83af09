//! Discord bot integration.
//!
//! This module connects to the gateway, turns control channel messages into
//! commands, and carries the commands out against the guild.

pub mod client;
pub mod commands;
pub mod handler;
pub mod platform;

// Re-export main types for external use
pub use client::DiscordBotBuilder;
