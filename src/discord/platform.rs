//! The guild mutations the bot performs, behind a trait.
//!
//! `DiscordPlatform` carries them out through serenity's HTTP client; tests use
//! `testing::RecordingPlatform`. Guild snapshots are read from the serenity cache.

use std::sync::Arc;

use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::ChannelType;
use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use tracing::debug;

use crate::common::{ChannelInfo, ChannelKind, CommandError, CommandResult, GuildSnapshot, MemberInfo, RoleInfo};

/// Chat platform operations used by the commands.
///
/// Every call is a single, independently awaited request. Nothing is batched or
/// rolled back.
#[async_trait]
pub trait GuildPlatform: Send + Sync {
    async fn add_role(&self, user: UserId, role: RoleId) -> CommandResult<()>;

    async fn remove_role(&self, user: UserId, role: RoleId) -> CommandResult<()>;

    /// Move a member connected to voice into another voice channel.
    async fn move_member(&self, user: UserId, channel: ChannelId) -> CommandResult<()>;

    async fn send_dm(&self, user: UserId, content: &str) -> CommandResult<()>;

    /// Post a message in a guild channel.
    async fn say(&self, channel: ChannelId, content: &str) -> CommandResult<()>;

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> CommandResult<()>;
}

/// `GuildPlatform` for one guild over the Discord REST API.
#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }
}

#[async_trait]
impl GuildPlatform for DiscordPlatform {
    async fn add_role(&self, user: UserId, role: RoleId) -> CommandResult<()> {
        debug!("Adding role {} to {}", role, user);
        self.http
            .add_member_role(self.guild_id, user, role, None)
            .await
            .map_err(|e| CommandError::platform(format!("add <@&{}> to <@{}>", role, user), e))
    }

    async fn remove_role(&self, user: UserId, role: RoleId) -> CommandResult<()> {
        debug!("Removing role {} from {}", role, user);
        self.http
            .remove_member_role(self.guild_id, user, role, None)
            .await
            .map_err(|e| CommandError::platform(format!("remove <@&{}> from <@{}>", role, user), e))
    }

    async fn move_member(&self, user: UserId, channel: ChannelId) -> CommandResult<()> {
        self.guild_id
            .move_member(self.http.as_ref(), user, channel)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::platform(format!("move <@{}> to <#{}>", user, channel), e))
    }

    async fn send_dm(&self, user: UserId, content: &str) -> CommandResult<()> {
        let dm = user
            .create_dm_channel(self.http.as_ref())
            .await
            .map_err(|e| CommandError::platform(format!("open a direct message with <@{}>", user), e))?;
        dm.say(self.http.as_ref(), content)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::platform(format!("send a direct message to <@{}>", user), e))
    }

    async fn say(&self, channel: ChannelId, content: &str) -> CommandResult<()> {
        channel
            .say(self.http.as_ref(), content)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::platform(format!("post in <#{}>", channel), e))
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> CommandResult<()> {
        channel
            .delete_message(self.http.as_ref(), message)
            .await
            .map_err(|e| CommandError::platform("delete the command message", e))
    }
}

/// Build a snapshot of a guild from the cache, or `None` if it is not cached.
pub fn snapshot_from_cache(cache: &Cache, guild_id: GuildId) -> Option<GuildSnapshot> {
    let guild = cache.guild(guild_id)?;

    // Threads are listed so commands can be sent from one.
    let mut channels: Vec<ChannelInfo> = guild
        .channels
        .values()
        .chain(guild.threads.iter())
        .map(|c| ChannelInfo {
            id: c.id,
            name: c.name.clone(),
            kind: channel_kind(c.kind),
            parent_id: c.parent_id,
            position: c.position,
        })
        .collect();
    channels.sort_by_key(|c| (c.position, c.id));

    let mut roles: Vec<RoleInfo> = guild
        .roles
        .values()
        .map(|r| RoleInfo {
            id: r.id,
            name: r.name.clone(),
        })
        .collect();
    roles.sort_by_key(|r| r.id);

    let mut members: Vec<MemberInfo> = guild
        .members
        .values()
        .map(|m| MemberInfo {
            id: m.user.id,
            username: m.user.name.clone(),
            display_name: m.display_name().to_string(),
            roles: m.roles.clone(),
            voice_channel: guild
                .voice_states
                .get(&m.user.id)
                .and_then(|state| state.channel_id),
        })
        .collect();
    members.sort_by_key(|m| m.id);

    Some(GuildSnapshot {
        guild_id,
        channels,
        roles,
        members,
    })
}

fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Category => ChannelKind::Category,
        ChannelType::Voice => ChannelKind::Voice,
        ChannelType::Text => ChannelKind::Text,
        _ => ChannelKind::Other,
    }
}
