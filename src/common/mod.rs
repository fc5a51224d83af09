//! Common utilities and types shared across the application.

pub mod error;
pub mod types;

pub use error::{CommandError, CommandResult};
pub use types::{ChannelInfo, ChannelKind, GuildSnapshot, Invocation, MemberInfo, RoleInfo};
