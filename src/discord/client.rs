//! Discord bot client abstraction.
//!
//! Provides a high-level interface for creating and running the Discord bot,
//! hiding serenity implementation details from the rest of the application.
//!
//! Gateway events are forwarded into a channel and handled one at a time by a single
//! loop, so commands run strictly in the order they were received.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use backon::BackoffBuilder;
use serenity::async_trait;
use serenity::gateway::ShardManager;
use serenity::http::HttpBuilder;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::common::error::AppError;
use crate::config::Config;
use crate::discord::handler::MoverHandler;

#[derive(Debug, Clone)]
pub enum DiscordBotEvent {
    /// Bot connected and ready.
    Ready(Ready),
    /// Guild data received.
    GuildCreate { context: Context, guild: Guild },
    /// Message received.
    Message { context: Context, message: Message },
    Disconnected,
}

struct DiscordBotEvents {
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
}

impl DiscordBotEvents {
    fn new(discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>) -> Self {
        Self { discord_events_tx }
    }
}

#[async_trait]
impl EventHandler for DiscordBotEvents {
    async fn ready(&self, _context: Context, ready: Ready) {
        if let Err(error) = self.discord_events_tx.send(DiscordBotEvent::Ready(ready)) {
            warn!("Failed to process discord event: {}", error);
        }
    }

    async fn guild_create(&self, context: Context, guild: Guild, _is_new: Option<bool>) {
        if let Err(error) = self
            .discord_events_tx
            .send(DiscordBotEvent::GuildCreate { context, guild })
        {
            warn!("Failed to process discord event: {}", error);
        }
    }

    async fn message(&self, context: Context, message: Message) {
        if let Err(error) = self
            .discord_events_tx
            .send(DiscordBotEvent::Message { context, message })
        {
            warn!("Failed to process discord event: {}", error);
        }
    }
}

/// Builder for creating the Discord bot.
pub struct DiscordBotBuilder {
    config: Config,
    shutdown_rx: watch::Receiver<bool>,
}

impl DiscordBotBuilder {
    /// Create a new Discord bot builder.
    pub fn new(config: Config, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            config,
            shutdown_rx,
        }
    }

    /// Build the Discord bot.
    pub async fn build(self) -> Result<DiscordBot, AppError> {
        let (discord_events_tx, discord_events_rx) = mpsc::unbounded_channel::<DiscordBotEvent>();

        let token = self.config.discord.token.clone();
        let client = build_client(&token, discord_events_tx.clone()).await?;
        let handler = MoverHandler::new(&self.config);

        info!(
            "Watching '{}' for commands with prefix '{}'",
            self.config.layout.control_channel, self.config.discord.command_prefix
        );

        Ok(DiscordBot {
            client: Some(client),
            token,
            handler,
            discord_events_rx,
            discord_events_tx,
            shutdown_rx: self.shutdown_rx,
        })
    }
}

async fn build_client(
    token: &str,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES;

    // Build a custom reqwest client with timeout settings
    let reqwest_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    // Build the Serenity HTTP client with our custom reqwest client
    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let events = DiscordBotEvents::new(discord_events_tx);
    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(events)
        .await?;
    Ok(client)
}

/// Create an exponential backoff iterator for Discord reconnection.
/// 5s initial, 5min max, factor 1.1, with jitter, unlimited retries.
fn discord_backoff() -> impl Iterator<Item = Duration> {
    backon::ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(5))
        .with_max_delay(Duration::from_secs(300))
        .with_factor(1.1)
        .with_jitter()
        .without_max_times()
        .build()
}

pub struct DiscordBot {
    client: Option<Client>,
    token: String,
    handler: MoverHandler,
    discord_events_rx: mpsc::UnboundedReceiver<DiscordBotEvent>,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Shard manager of the client that is currently connected. Replaced on every
/// client rebuild so shutdown always reaches the live gateway.
#[derive(Clone, Default)]
struct ShardManagerSlot(Arc<Mutex<Option<Arc<ShardManager>>>>);

impl ShardManagerSlot {
    fn set(&self, manager: Arc<ShardManager>) {
        if let Ok(mut current) = self.0.lock() {
            *current = Some(manager);
        }
    }

    fn get(&self) -> Option<Arc<ShardManager>> {
        self.0.lock().ok().and_then(|current| current.clone())
    }
}

impl DiscordBot {
    pub async fn run(mut self) {
        let shard_manager = ShardManagerSlot::default();
        let mut shutdown_rx = self.shutdown_rx.clone();

        let connection = Self::run_connection(
            &mut self.client,
            &self.token,
            &self.discord_events_tx,
            &shard_manager,
        );
        tokio::pin!(connection);

        let shutdown_requested = tokio::select! {
            _ = &mut connection => false,
            _ = Self::process_events(&mut self.discord_events_rx, &self.handler) => false,
            _ = wait_for_shutdown(&mut shutdown_rx) => true,
        };

        if shutdown_requested {
            info!("Shutdown signal received, stopping event processing");

            // Gracefully shutdown Discord gateway
            if let Some(manager) = shard_manager.get() {
                info!("Initiating graceful Discord shutdown...");
                manager.shutdown_all().await;
                info!("Discord shutdown complete");
            }

            if tokio::time::timeout(Duration::from_secs(3), &mut connection)
                .await
                .is_err()
            {
                warn!("Discord client did not stop after shutdown");
            }
        }
        info!("Discord task ended");
    }

    async fn run_connection(
        client: &mut Option<Client>,
        token: &str,
        discord_events_tx: &mpsc::UnboundedSender<DiscordBotEvent>,
        shard_manager: &ShardManagerSlot,
    ) {
        let mut backoff = discord_backoff();

        loop {
            info!("Connecting to Discord...");

            let mut client = match client.take() {
                Some(client) => client,
                None => {
                    // serenity mostly handles reconnections itself.
                    match build_client(token, discord_events_tx.clone()).await {
                        Ok(client) => {
                            backoff = discord_backoff();
                            client
                        }
                        Err(e) => {
                            error!("Failed to rebuild Discord client: {}", e);
                            let delay = backoff.next().unwrap_or(Duration::from_secs(300));
                            warn!("Retrying in {:.1}s...", delay.as_secs_f64());
                            sleep(delay).await;
                            continue;
                        }
                    }
                }
            };
            shard_manager.set(client.shard_manager.clone());

            match client.start().await {
                Ok(()) => {
                    info!("Discord client disconnected normally");
                    if let Err(error) = discord_events_tx.send(DiscordBotEvent::Disconnected) {
                        warn!("Failed to process discord event: {}", error);
                    }
                    break;
                }
                Err(e) => {
                    error!("Discord client error: {}", e);
                    let delay = backoff.next().unwrap_or(Duration::from_secs(300));
                    warn!(
                        "Discord disconnected. Reconnecting in {:.1}s...",
                        delay.as_secs_f64(),
                    );
                    if let Err(error) = discord_events_tx.send(DiscordBotEvent::Disconnected) {
                        warn!("Failed to process discord event: {}", error);
                    }
                    sleep(delay).await;
                }
            }
        }
    }

    /// Handle events one at a time until the channel closes. Shutdown is handled by
    /// `run`, so a command that has started is never cut short here.
    async fn process_events(
        discord_events_rx: &mut mpsc::UnboundedReceiver<DiscordBotEvent>,
        handler: &MoverHandler,
    ) {
        while let Some(event) = discord_events_rx.recv().await {
            match event {
                DiscordBotEvent::Ready(ready) => handler.handle_ready(&ready),
                DiscordBotEvent::GuildCreate { context, guild } => {
                    handler.handle_guild_create(&context, &guild);
                }
                DiscordBotEvent::Message { context, message } => {
                    handler.handle_message(&context, &message).await;
                }
                DiscordBotEvent::Disconnected => {
                    warn!("Discord connection lost");
                }
            }
        }
        debug!("Discord events channel closed.");
    }
}

/// Resolve once `true` is sent, or once the sender is gone.
async fn wait_for_shutdown(shutdown_rx: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow_and_update() {
            return;
        }
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}
