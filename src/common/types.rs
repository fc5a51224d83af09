//! Guild snapshot types shared across the application.
//!
//! A `GuildSnapshot` is a read-only view of the live guild taken at the start of a
//! command. Nothing in it is persisted; every command takes a fresh one.

use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};

/// Kind of a guild channel, reduced to what the bot cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Category,
    Voice,
    Text,
    Other,
}

/// A guild channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
    /// Category the channel lives in, if any.
    pub parent_id: Option<ChannelId>,
    /// Position within the guild's channel list.
    pub position: u16,
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
}

/// A guild member and where they currently are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub id: UserId,
    /// Account username, used for ordering seat moves.
    pub username: String,
    /// Nickname, global name or username, in that order.
    pub display_name: String,
    pub roles: Vec<RoleId>,
    /// Voice channel the member is connected to.
    pub voice_channel: Option<ChannelId>,
}

impl MemberInfo {
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}

/// Point-in-time view of a guild.
#[derive(Debug, Clone)]
pub struct GuildSnapshot {
    pub guild_id: GuildId,
    /// Ordered by (position, id).
    pub channels: Vec<ChannelInfo>,
    pub roles: Vec<RoleInfo>,
    /// Ordered by user id.
    pub members: Vec<MemberInfo>,
}

impl GuildSnapshot {
    /// Members connected to the given voice channel, in snapshot order.
    pub fn members_in(&self, channel: ChannelId) -> Vec<&MemberInfo> {
        self.members
            .iter()
            .filter(|m| m.voice_channel == Some(channel))
            .collect()
    }

    /// Members holding the given role, in snapshot order.
    pub fn members_with_role(&self, role: RoleId) -> Vec<&MemberInfo> {
        self.members.iter().filter(|m| m.has_role(role)).collect()
    }
}

/// The message that triggered a command.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub author: UserId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    /// Full message text, including the prefix and command name.
    pub content: String,
}
