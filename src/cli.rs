//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  kolosal                           Start an interactive chat session
  kolosal -p \"hello\"                Send one message, print the reply
  kolosal -c work -p \"hello\"        Same, into the chat named 'work'
  kolosal preset list               List saved model presets
  kolosal preset new creative --temperature 1.2
  kolosal preset export default out/default.json
  kolosal chat list                 List saved chats
  kolosal config                    Show storage paths and status
  kolosal completions bash          Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Chat client core: model presets and chat sessions",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single message then exit (without opening the interactive session)
    #[arg(
        short = 'p',
        long,
        help = "Send one message and print the assistant reply"
    )]
    pub prompt: Option<String>,

    /// Chat to resume or create (defaults to 'New Chat')
    #[arg(short = 'c', long)]
    pub chat: Option<String>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage model presets
    Preset {
        #[command(subcommand)]
        subcommand: PresetSubcommand,
    },
    /// Manage saved chats
    Chat {
        #[command(subcommand)]
        subcommand: ChatSubcommand,
    },
    /// Show storage paths and counts
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum PresetSubcommand {
    /// List presets, most recently modified first
    List {
        /// Filter by name or system prompt
        #[arg(long)]
        query: Option<String>,
    },
    /// Show a preset's parameters (defaults to the current selection)
    Show { name: Option<String> },
    /// Create a preset; a taken name gets a numeric suffix
    New {
        name: String,
        #[command(flatten)]
        params: PresetParams,
    },
    /// Edit and save an existing preset
    Set {
        name: String,
        #[command(flatten)]
        params: PresetParams,
    },
    /// Delete a preset and its file
    Delete { name: String },
    /// Export a preset as JSON outside the store
    Export { name: String, path: PathBuf },
}

/// Sampling parameters accepted by `preset new` and `preset set`.
/// Unset flags keep the existing (or default) value.
#[derive(clap::Args)]
pub struct PresetParams {
    #[arg(long)]
    pub system_prompt: Option<String>,
    #[arg(long)]
    pub temperature: Option<f32>,
    #[arg(long)]
    pub top_p: Option<f32>,
    #[arg(long)]
    pub top_k: Option<f32>,
    #[arg(long)]
    pub random_seed: Option<i32>,
    #[arg(long)]
    pub min_length: Option<f32>,
    #[arg(long)]
    pub max_new_tokens: Option<f32>,
}

#[derive(Subcommand)]
pub enum ChatSubcommand {
    /// List saved chats
    List {
        /// Maximum number of chats to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Rename a saved chat
    Rename { name: String, new_name: String },
    /// Delete a saved chat
    Delete { name: String },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
