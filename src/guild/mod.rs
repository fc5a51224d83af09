//! Guild layout resolution.

pub mod context;
#[cfg(test)]
pub mod fixtures;

pub use context::GuildContext;
