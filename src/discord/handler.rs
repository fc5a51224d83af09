//! Discord event handling.
//!
//! Turns gateway events into command invocations. Only messages in the configured
//! control channel are acted on; every failure is reported privately to the author.

use serenity::gateway::ChunkGuildFilter;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::model::id::ChannelId;
use serenity::client::Context;
use tracing::{debug, info, warn};

use crate::common::{CommandResult, GuildSnapshot, Invocation};
use crate::config::{Config, LayoutConfig};
use crate::discord::commands::{report_to_author, BotCommand, CommandHandler, CommandSession};
use crate::discord::platform::{snapshot_from_cache, DiscordPlatform, GuildPlatform};
use crate::guild::GuildContext;

/// Discord event handler.
pub struct MoverHandler {
    command_handler: CommandHandler,
    layout: LayoutConfig,
}

impl MoverHandler {
    pub fn new(config: &Config) -> Self {
        Self {
            command_handler: CommandHandler::new(config.discord.command_prefix.clone()),
            layout: config.layout.clone(),
        }
    }

    pub fn handle_ready(&self, ready: &Ready) {
        info!("{} has connected to Discord!", ready.user.name);
    }

    /// Request the full member list and check the guild layout.
    pub fn handle_guild_create(&self, ctx: &Context, guild: &Guild) {
        info!(
            "Received guild data for '{}' ({} channels, {} of {} members cached)",
            guild.name,
            guild.channels.len(),
            guild.members.len(),
            guild.member_count
        );

        if (guild.members.len() as u64) < guild.member_count {
            debug!("Requesting member chunks for '{}'", guild.name);
            ctx.shard
                .chunk_guild(guild.id, None, false, ChunkGuildFilter::None, None);
        }

        if let Some(snapshot) = snapshot_from_cache(&ctx.cache, guild.id) {
            let missing = GuildContext::resolve(&snapshot, &self.layout).missing_entities();
            for error in &missing {
                warn!("Guild '{}': {}", guild.name, error);
            }
        }
    }

    /// Handle an incoming message.
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) {
        // Ignore bots, including ourselves
        if msg.author.bot {
            return;
        }

        // Only handle guild (server) messages
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let Some(command) = BotCommand::parse(&msg.content, self.command_handler.prefix()) else {
            return;
        };

        let Some(snapshot) = snapshot_from_cache(&ctx.cache, guild_id) else {
            warn!("Guild {} is not cached, ignoring !{}", guild_id, command.name());
            return;
        };

        if !is_control_channel(&snapshot, msg.channel_id, &self.layout) {
            debug!("Ignoring !{} outside the control channel", command.name());
            return;
        }

        let invocation = Invocation {
            author: msg.author.id,
            channel_id: msg.channel_id,
            message_id: msg.id,
            content: msg.content.clone(),
        };
        let platform = DiscordPlatform::new(ctx.http.clone(), guild_id);

        if self.dispatch(&platform, &snapshot, &invocation, &command).await.is_ok() {
            info!("!{} from {} completed", command.name(), msg.author.name);
        }
    }

    /// Run a command and report any failure to its author.
    pub async fn dispatch(
        &self,
        platform: &dyn GuildPlatform,
        snapshot: &GuildSnapshot,
        invocation: &Invocation,
        command: &BotCommand,
    ) -> CommandResult<()> {
        info!(
            "!{} command from {} in guild {}",
            command.name(),
            invocation.author,
            snapshot.guild_id
        );

        let session = CommandSession::new(platform, snapshot, invocation, &self.layout);
        let result = self.command_handler.execute(&session, command).await;

        if let Err(ref e) = result {
            warn!("!{} failed: {}", command.name(), e);
            report_to_author(platform, invocation, e).await;
        }
        result
    }
}

/// Whether `channel_id` is a channel named like the control channel. Any channel
/// kind counts, including a voice channel's chat and threads.
pub fn is_control_channel(snapshot: &GuildSnapshot, channel_id: ChannelId, layout: &LayoutConfig) -> bool {
    snapshot
        .channels
        .iter()
        .any(|c| c.id == channel_id && c.name == layout.control_channel)
}
