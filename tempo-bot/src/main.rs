use std::sync::Arc;

use tracing::{error, info};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use tempo_commands::{handle_interaction, handle_message};
use tempo_core::{Config, Context};
use tempo_spotify::{CredentialStore, SpotifyAuth, SpotifyClient, SpotifyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.discord_token.clone()));

    let spotify_config = SpotifyConfig::new(
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
        config.spotify_redirect_uri.clone(),
    );
    let store = CredentialStore::new(&config.token_dir);
    let spotify = Arc::new(SpotifyAuth::new(SpotifyClient::new(spotify_config), store));
    info!(token_dir = %config.token_dir.display(), "credential store ready");

    let ctx = Context::new(Arc::clone(&http), spotify);

    // Declare which intents the bot has
    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), config.discord_token, intents);

    info!("Tempo is connecting...");

    // Our ears, listens for stuff to do
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                info!("Tempo has successfully awoken!");
            }

            Event::MessageCreate(msg) => {
                // Handler failures are per-event; the dispatcher keeps going.
                if let Err(source) = handle_message(ctx.clone(), msg).await {
                    error!(?source, "message handler failed");
                }
            }
            Event::InteractionCreate(interaction) => {
                if let Err(source) = handle_interaction(ctx.clone(), interaction).await {
                    error!(?source, "interaction handler failed");
                }
            }
            _ => {} // Ignore unused events
        }
    }
    Ok(()) // Return Success, shutdown cleanly
}
