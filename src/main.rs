//! # Kolosal - chat client core
//!
//! CLI entry point for the Kolosal chat client core: model preset
//! management, saved chats, and an interactive session with a placeholder
//! assistant.
//!
//! ## Features
//! - Single message mode with `-p` or `--prompt`
//! - Interactive line-based chat session (default)
//! - Preset and chat management subcommands

mod cli;
mod core;
mod run;

use clap::Parser;
use dotenv::dotenv;

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    // Completions need no configuration or storage
    if let Some(cli::Commands::Completions { shell }) = &args.command {
        run::print_completions(*shell);
        return;
    }

    // Load application configuration (print user-friendly message; exit uses Display not Debug)
    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = match &args.command {
        Some(cli::Commands::Preset { subcommand }) => run::preset_command(subcommand, &config),
        Some(cli::Commands::Chat { subcommand }) => run::chat_command(subcommand, &config),
        Some(cli::Commands::Config) => run::show_config(&config),
        // Handled above
        Some(cli::Commands::Completions { .. }) => Ok(()),
        None if args.prompt.is_some() => run::run_single_prompt(&args, &config),
        None => run::run_interactive(&args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
