use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::preset::DEFAULT_RESOLUTION;

#[derive(Parser, Debug)]
#[command(name = "tubemux")]
#[command(author, version, about = "Telegram bot that downloads YouTube videos and muxes them with ffmpeg", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot
    Run {
        /// Use webhook mode (WEBHOOK_URL/BOT_TOKEN on 0.0.0.0:PORT) instead of long polling
        #[arg(long)]
        webhook: bool,
    },

    /// Download and mux one video locally, without Telegram
    Fetch {
        /// YouTube URL
        url: String,

        /// Video resolution, e.g. 720p
        #[arg(short, long, default_value = DEFAULT_RESOLUTION)]
        resolution: String,

        /// Directory to copy the muxed file into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
