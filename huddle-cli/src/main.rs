mod input;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use huddle_client::{
    Coordinator, CoordinatorConfig, CoordinatorHandle, IdentitySource, MediaSource, NoMediaSource,
    RetryPolicy, SignalingEndpoint, SyntheticMediaSource, TransportConfig, WebRtcSessionFactory,
};
use huddle_core::utils::DEFAULT_RECONNECT_INTERVAL_MS;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::input::Input;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Terminal participant for huddle video rooms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a room and chat from the terminal.
    Join {
        #[arg(
            long,
            env = "HUDDLE_SERVER",
            default_value = "ws://localhost:8080/video-conference/ws"
        )]
        server: String,

        #[arg(long, env = "HUDDLE_ROOM")]
        room: String,

        #[arg(long, env = "HUDDLE_USER_ID")]
        user_id: Option<String>,

        #[arg(long, env = "HUDDLE_NAME")]
        name: Option<String>,

        #[arg(long, env = "HUDDLE_AVATAR")]
        avatar: Option<String>,

        /// Access credential; also used to derive the user id when none is given.
        #[arg(long, env = "HUDDLE_TOKEN")]
        token: Option<String>,

        #[arg(long = "ice-server", env = "HUDDLE_ICE_SERVERS", value_delimiter = ',')]
        ice_servers: Vec<String>,

        #[arg(long, env = "HUDDLE_RETRY_MS", default_value_t = DEFAULT_RECONNECT_INTERVAL_MS)]
        retry_ms: u64,

        /// Join without local audio or video.
        #[arg(long)]
        no_media: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Join {
            server,
            room,
            user_id,
            name,
            avatar,
            token,
            ice_servers,
            retry_ms,
            no_media,
        } => {
            let mut config = CoordinatorConfig::new(
                SignalingEndpoint::new(server, room.clone()),
                IdentitySource {
                    id: user_id.map(Into::into),
                    display_name: name,
                    avatar_url: avatar,
                    access_credential: token,
                },
            );
            config.retry = RetryPolicy::fixed(Duration::from_millis(retry_ms));
            if !ice_servers.is_empty() {
                config.transport = TransportConfig { ice_servers };
            }

            let media_source: Arc<dyn MediaSource> = if no_media {
                Arc::new(NoMediaSource)
            } else {
                Arc::new(SyntheticMediaSource::new())
            };

            let handle = Coordinator::start(config, Arc::new(WebRtcSessionFactory), media_source)
                .context("Failed to start coordinator")?;

            println!("{} {}", "Joined room".green().bold(), room.bold());
            println!("{}", input::HELP.dimmed());

            tokio::spawn(render::follow(handle.subscribe()));
            run_prompt(&handle).await?;

            handle
                .shutdown()
                .await
                .context("Failed to leave the room")?;
            println!("{}", "Left the room.".green());
        }
    }

    Ok(())
}

async fn run_prompt(handle: &CoordinatorHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            return Ok(());
        };

        let Some(input) = Input::parse(&line) else {
            continue;
        };

        match input {
            Input::Chat(text) => {
                handle.send_chat(text).await?;
            }
            Input::Pin(id) => report_toggle("pin", &id, handle.toggle_pin(id.clone().into()).await?),
            Input::Audio(id) => {
                report_toggle("audio", &id, handle.toggle_audio(id.clone().into()).await?)
            }
            Input::Video(id) => {
                report_toggle("video", &id, handle.toggle_video(id.clone().into()).await?)
            }
            Input::Share => match handle.toggle_screen_share().await {
                Ok(true) => println!("{}", "Sharing screen.".cyan()),
                Ok(false) => println!("{}", "Back to camera.".cyan()),
                Err(e) => println!("{} {}", "Screen share failed:".red(), e),
            },
            Input::Who => render::print_roster(&handle.snapshot()),
            Input::Help => println!("{}", input::HELP.dimmed()),
            Input::Quit => return Ok(()),
        }
    }
}

fn report_toggle(what: &str, id: &str, found: bool) {
    if !found {
        println!("{} {}", "No participant".yellow(), id);
        return;
    }
    println!("Toggled {} for {}", what, id.bold());
}
