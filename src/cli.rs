use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chanbot")]
#[command(author, version, about = "Telegram bot with an admin-curated channel directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling
    Run,

    /// Inspect or edit the channel directory without starting the bot
    Channels {
        #[command(subcommand)]
        action: ChannelCommands,
    },
}

#[derive(Subcommand)]
pub enum ChannelCommands {
    /// Print every stored channel
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a channel
    Add {
        /// Display name
        name: String,

        /// Channel URL (http or https)
        link: String,

        /// Optional thumbnail URL
        #[arg(short, long)]
        thumbnail: Option<String>,
    },

    /// Remove a channel by id (no error if it does not exist)
    Remove {
        /// Channel id as shown by `channels list`
        id: i64,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
