//! Discord bot commands (!currgame, !night, !evil, etc).
//!
//! Handles command parsing and execution. Each command works on one guild snapshot
//! and returns a typed result; reporting failures to the author is the caller's job.

use tracing::{debug, error, info};

use crate::common::{CommandError, CommandResult, GuildSnapshot, Invocation};
use crate::config::LayoutConfig;
use crate::discord::platform::GuildPlatform;
use crate::game::{assign_cottages, plan_role_sync, reset, EvilArgs, EvilTeam};
use crate::guild::GuildContext;

/// Commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Sync the current-game role with voice occupancy (!currgame).
    CurrGame,
    /// Fake evil info to the lunatic only (!lunatic).
    Lunatic,
    /// Evil info to demon and minions (!evil).
    Evil,
    /// Seat players in the night cottages (!night).
    Night,
    /// Bring everyone back from the cottages (!day).
    Day,
    /// Bring everyone to Town Square to vote (!vote).
    Vote,
    /// List commands, or describe one (!help [command]).
    Help { topic: Option<String> },
}

/// Name and help text for every command, in listing order.
const COMMAND_HELP: [(&str, &str); 7] = [
    (
        "currgame",
        "Set the current users in all standard BotC voice channels as players in a current game, granting them roles to see channels associated with the game.",
    ),
    (
        "day",
        "Move users from Cottages back to Town Square",
    ),
    (
        "evil",
        "Send evil info to evil team. Format is `!evil <demon> <minion> <minion> <minion>`",
    ),
    (
        "help",
        "Shows this message",
    ),
    (
        "lunatic",
        "Send fake evil info to the Lunatic. Format is `!lunatic <Lunatic> <fake minion> <fake minion> <fake minion>`",
    ),
    (
        "night",
        "Move users to Cottages in the BotC - Nighttime category",
    ),
    (
        "vote",
        "Move users from other channels back to Town Square",
    ),
];

impl BotCommand {
    /// Parse a message into a command. Returns `None` for anything that is not one
    /// of ours. Extra arguments to commands that take none are ignored.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.trim_end().strip_prefix(prefix)?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next()?;
        let args = parts.next().map(str::trim).filter(|s| !s.is_empty());

        match name {
            "currgame" => Some(Self::CurrGame),
            "lunatic" => Some(Self::Lunatic),
            "evil" => Some(Self::Evil),
            "night" => Some(Self::Night),
            "day" => Some(Self::Day),
            "vote" => Some(Self::Vote),
            "help" => Some(Self::Help {
                topic: args.and_then(|a| a.split_whitespace().next()).map(str::to_string),
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrGame => "currgame",
            Self::Lunatic => "lunatic",
            Self::Evil => "evil",
            Self::Night => "night",
            Self::Day => "day",
            Self::Vote => "vote",
            Self::Help { .. } => "help",
        }
    }
}

/// Everything one command invocation works with.
pub struct CommandSession<'a> {
    pub platform: &'a dyn GuildPlatform,
    pub snapshot: &'a GuildSnapshot,
    pub invocation: &'a Invocation,
    pub guild: GuildContext<'a>,
}

impl<'a> CommandSession<'a> {
    pub fn new(
        platform: &'a dyn GuildPlatform,
        snapshot: &'a GuildSnapshot,
        invocation: &'a Invocation,
        layout: &'a LayoutConfig,
    ) -> Self {
        Self {
            platform,
            snapshot,
            invocation,
            guild: GuildContext::resolve(snapshot, layout),
        }
    }

    /// Post a status message in the channel the command came from.
    async fn reply(&self, content: &str) -> CommandResult<()> {
        self.platform.say(self.invocation.channel_id, content).await
    }
}

/// Send a failure privately to the author of the command.
///
/// Delivery problems are logged and otherwise ignored.
pub async fn report_to_author(platform: &dyn GuildPlatform, invocation: &Invocation, error: &CommandError) {
    let content = format!("{} (from message `{}`)", error, invocation.content);
    if let Err(e) = platform.send_dm(invocation.author, &content).await {
        error!("Failed to report error to {}: {}", invocation.author, e);
    }
}

/// Command handler for Discord bot.
pub struct CommandHandler {
    prefix: String,
}

impl CommandHandler {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Execute a parsed command.
    pub async fn execute(&self, session: &CommandSession<'_>, command: &BotCommand) -> CommandResult<()> {
        debug!("Executing command: {:?}", command);

        match command {
            BotCommand::CurrGame => self.handle_currgame(session).await,
            BotCommand::Lunatic => self.handle_evil_info(session, false).await,
            BotCommand::Evil => self.handle_evil_info(session, true).await,
            BotCommand::Night => self.handle_night(session).await,
            BotCommand::Day => self.handle_day(session).await,
            BotCommand::Vote => self.handle_vote(session).await,
            BotCommand::Help { topic } => self.handle_help(session, topic.as_deref()).await,
        }
    }

    /// Handle !currgame command.
    async fn handle_currgame(&self, session: &CommandSession<'_>) -> CommandResult<()> {
        let plan = plan_role_sync(session.snapshot, &session.guild)?;
        if plan.is_empty() {
            debug!("{} role already matches the game channels", plan.role.name);
            return Ok(());
        }

        if let Some(message) = plan.removed_message() {
            for member in &plan.to_remove {
                info!("Removing {} from {}", plan.role.name, member.display_name);
                session.platform.remove_role(member.id, plan.role.id).await?;
            }
            session.reply(&message).await?;
        }

        if let Some(message) = plan.added_message() {
            for member in &plan.to_add {
                info!("Adding {} to {}", plan.role.name, member.display_name);
                session.platform.add_role(member.id, plan.role.id).await?;
            }
            session.reply(&message).await?;
        }

        Ok(())
    }

    /// Handle !evil (`inform_minions`) and !lunatic.
    async fn handle_evil_info(&self, session: &CommandSession<'_>, inform_minions: bool) -> CommandResult<()> {
        let town_square = session.guild.town_square()?;
        let roster = session.snapshot.members_in(town_square.id);

        // Role assignments must not stay visible in the channel history.
        session
            .platform
            .delete_message(session.invocation.channel_id, session.invocation.message_id)
            .await?;

        let args = EvilArgs::parse(&session.invocation.content)?;
        let team = EvilTeam::resolve(&roster, &args)?;

        info!(
            "Sending {} info to {} ({} minions)",
            if inform_minions { "evil" } else { "lunatic" },
            team.demon.display_name,
            team.minions.len()
        );
        session.platform.send_dm(team.demon.id, &team.demon_message()).await?;

        if inform_minions {
            for (minion, message) in team.minion_messages() {
                session.platform.send_dm(minion.id, &message).await?;
            }
            session.reply("The Evil team has been informed...").await?;
        }

        Ok(())
    }

    /// Handle !night command.
    async fn handle_night(&self, session: &CommandSession<'_>) -> CommandResult<()> {
        // A failed role sync is reported but does not stop the seating.
        if let Err(e) = self.handle_currgame(session).await {
            report_to_author(session.platform, session.invocation, &e).await;
        }

        session.reply("Moving users to Cottages!").await?;

        let storyteller = session.invocation.author;
        let role = session.guild.storyteller_role()?;
        session.platform.add_role(storyteller, role.id).await?;

        let town_square = session.guild.town_square()?;
        let roster = session.snapshot.members_in(town_square.id);
        let cottages = session.guild.night_channels()?;

        for seat in assign_cottages(&roster, cottages) {
            info!(
                "Moving {} to {} {}",
                seat.member.username, seat.cottage.name, seat.cottage.id
            );
            if seat.member.id != storyteller {
                session.platform.remove_role(seat.member.id, role.id).await?;
            }
            session.platform.move_member(seat.member.id, seat.cottage.id).await?;
        }

        Ok(())
    }

    /// Handle !day command.
    async fn handle_day(&self, session: &CommandSession<'_>) -> CommandResult<()> {
        session.reply("Moving users from Cottages to Town Square.").await?;

        let town_square = session.guild.town_square()?;
        let members = reset::night_occupants(session.snapshot, &session.guild)?;
        info!("Moving {} users from Cottages to {}", members.len(), town_square.name);

        for member in members {
            session.platform.move_member(member.id, town_square.id).await?;
        }
        Ok(())
    }

    /// Handle !vote command.
    async fn handle_vote(&self, session: &CommandSession<'_>) -> CommandResult<()> {
        session.reply("Moving users from other areas to Town Square.").await?;

        let town_square = session.guild.town_square()?;
        let members = reset::outlying_day_occupants(session.snapshot, &session.guild)?;
        info!("Moving {} users from other areas to {}", members.len(), town_square.name);

        for member in members {
            session.platform.move_member(member.id, town_square.id).await?;
        }
        Ok(())
    }

    /// Handle !help command.
    async fn handle_help(&self, session: &CommandSession<'_>, topic: Option<&str>) -> CommandResult<()> {
        let text = match topic {
            Some(topic) => {
                let topic = topic.strip_prefix(self.prefix.as_str()).unwrap_or(topic);
                match COMMAND_HELP.iter().find(|(name, _)| *name == topic) {
                    Some((name, help)) => format!("`{}{}` - {}", self.prefix, name, help),
                    None => format!("No command called \"{}\" found.", topic),
                }
            }
            None => self.help_listing(),
        };

        session.reply(&text).await
    }

    fn help_listing(&self) -> String {
        let mut text = String::from("**Commands:**\n");
        for (name, help) in COMMAND_HELP {
            text.push_str(&format!("• `{}{}` - {}\n", self.prefix, name, help));
        }
        text.push_str(&format!(
            "Type `{}help <command>` for more info on a command.",
            self.prefix
        ));
        text
    }
}
