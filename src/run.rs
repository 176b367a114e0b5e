//! Application run modes: logger init, CLI commands, interactive session.

use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{Local, TimeZone};

use crate::cli::{Args, ChatSubcommand, PresetSubcommand};
use crate::core;
use crate::core::chat::{ChatManager, Role};
use crate::core::config::Config;
use crate::core::presets::{self, ModelPreset, PresetStore};

/// Initialize env_logger. In interactive mode, writes to a file under the
/// cache directory to keep the prompt clean.
pub fn init_logger(args: &Args) {
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()));

    if args.command.is_none() && args.prompt.is_none() {
        let log_path = core::paths::cache_dir().map(|d| d.join(format!("{}.log", core::app::NAME)));
        if let Some(path) = log_path
            && let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Print a shell completion script to stdout.
pub fn print_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    crate::cli::generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Send one message into a chat and print the assistant reply.
pub fn run_single_prompt(args: &Args, config: &Config) -> Result<(), Box<dyn Error>> {
    let prompt = args.prompt.as_deref().unwrap_or_default().trim().to_string();
    if prompt.is_empty() {
        return Err("empty prompt".into());
    }

    let mut manager = open_session_chat(args, config)?;
    let reply = manager.send_message(&prompt)?;
    println!("{}", reply);
    Ok(())
}

/// Interactive line-based chat session. Reads messages from stdin until
/// EOF or `/quit`; every exchange is persisted as it happens.
pub fn run_interactive(args: &Args, config: &Config) -> Result<(), Box<dyn Error>> {
    let store = PresetStore::open(&config.presets_dir)?;
    let mut manager = open_session_chat(args, config)?;

    let chat_name = manager
        .current_chat()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let preset_name = store
        .current_preset()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "(none)".to_string());
    println!(
        "{} {} -- chat '{}', preset '{}'. /quit to exit.",
        core::app::NAME,
        core::app::VERSION,
        chat_name,
        preset_name
    );

    // Replay what is already in the chat when resuming
    if let Some(chat) = manager.current_chat() {
        for msg in &chat.messages {
            let speaker = match msg.role {
                Role::User => "you",
                Role::Assistant => "assistant",
            };
            println!("[{}] {}: {}", msg.formatted_timestamp(), speaker, msg.content);
        }
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }
        let reply = manager.send_message(input)?;
        println!("{}", reply);
    }
    Ok(())
}

/// Resume the chat named by `-c` (or "New Chat"), creating it if absent.
fn open_session_chat(args: &Args, config: &Config) -> Result<ChatManager, Box<dyn Error>> {
    let mut manager = ChatManager::open(&config.chats_dir)?;
    let name = args.chat.as_deref().unwrap_or("New Chat");
    match manager.find_chat(name) {
        Some(index) => manager.switch_chat(index),
        None => {
            manager.create_chat(name)?;
        }
    }
    Ok(manager)
}

/// Run a `preset` subcommand against the configured store.
pub fn preset_command(sub: &PresetSubcommand, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut store = PresetStore::open(&config.presets_dir)?;

    match sub {
        PresetSubcommand::List { query } => {
            let query = query.as_deref().unwrap_or("");
            for preset in presets::filter_presets(store.presets(), query) {
                println!(
                    "{:>3}  {:<24}  modified {}",
                    preset.id,
                    preset.name,
                    format_unix(preset.last_modified)
                );
            }
        }
        PresetSubcommand::Show { name } => {
            let preset = match name {
                Some(name) => store
                    .presets()
                    .iter()
                    .find(|p| &p.name == name)
                    .ok_or_else(|| format!("no preset named '{}'", name))?,
                None => store.current_preset().ok_or("no preset selected")?,
            };
            print_preset(preset);
        }
        PresetSubcommand::New { name, params } => {
            let mut preset = store.default_preset().clone();
            preset.name = name.clone();
            apply_params(&mut preset, params);
            let saved = store.save_preset(&preset, true)?;
            println!("Saved preset '{}'", saved);
        }
        PresetSubcommand::Set { name, params } => {
            let Some(index) = store.presets().iter().position(|p| &p.name == name) else {
                return Err(format!("no preset named '{}'; use `preset new`", name).into());
            };
            store.switch_preset(index);
            store.update_current_preset(|p| apply_params(p, params));
            let Some(edited) = store.current_preset().cloned() else {
                return Err("no preset selected".into());
            };
            store.save_preset(&edited, false)?;
            println!("Saved preset '{}'", edited.name);
        }
        PresetSubcommand::Delete { name } => {
            store.delete_preset(name)?;
            println!("Deleted preset '{}'", name);
        }
        PresetSubcommand::Export { name, path } => {
            let Some(preset) = store.presets().iter().find(|p| &p.name == name) else {
                return Err(format!("no preset named '{}'", name).into());
            };
            store.save_preset_to_path(preset, path)?;
            println!("Exported '{}' to {}", name, path.display());
        }
    }
    Ok(())
}

/// Run a `chat` subcommand against the configured chats directory.
pub fn chat_command(sub: &ChatSubcommand, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut manager = ChatManager::open(&config.chats_dir)?;

    match sub {
        ChatSubcommand::List { limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            for chat in manager.chats().iter().take(limit) {
                println!(
                    "{:<24}  {:>4} messages  updated {}",
                    chat.name,
                    chat.messages.len(),
                    format_unix(chat.updated_at)
                );
            }
        }
        ChatSubcommand::Rename { name, new_name } => {
            let index = manager
                .find_chat(name)
                .ok_or_else(|| format!("no chat named '{}'", name))?;
            manager.switch_chat(index);
            manager.rename_current_chat(new_name)?;
            let renamed = manager
                .current_chat()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            println!("Renamed '{}' to '{}'", name, renamed);
        }
        ChatSubcommand::Delete { name } => {
            manager.delete_chat(name)?;
            println!("Deleted chat '{}'", name);
        }
    }
    Ok(())
}

/// Show storage paths and counts without creating anything.
pub fn show_config(config: &Config) -> Result<(), Box<dyn Error>> {
    println!("presets dir: {}", config.presets_dir.display());
    println!("  presets:   {}", describe_count(&config.presets_dir));
    println!("chats dir:   {}", config.chats_dir.display());
    println!("  chats:     {}", describe_count(&config.chats_dir));
    let config_dir = core::paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("config dir:  {}", config_dir);
    let cache = core::paths::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("cache dir:   {}", cache);
    Ok(())
}

fn describe_count(dir: &Path) -> String {
    match count_json_files(dir) {
        Some(n) => n.to_string(),
        None => "(not created yet)".to_string(),
    }
}

fn count_json_files(dir: &Path) -> Option<usize> {
    let entries = fs::read_dir(dir).ok()?;
    Some(
        entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
            .count(),
    )
}

fn print_preset(preset: &ModelPreset) {
    println!("name:           {}", preset.name);
    println!("system prompt:  {}", preset.system_prompt);
    println!("temperature:    {}", preset.temperature);
    println!("top_p:          {}", preset.top_p);
    println!("top_k:          {}", preset.top_k);
    println!("random_seed:    {}", preset.random_seed);
    println!("min_length:     {}", preset.min_length);
    println!("max_new_tokens: {}", preset.max_new_tokens);
    println!("modified:       {}", format_unix(preset.last_modified));
}

fn apply_params(preset: &mut ModelPreset, params: &crate::cli::PresetParams) {
    if let Some(v) = &params.system_prompt {
        preset.system_prompt = v.clone();
    }
    if let Some(v) = params.temperature {
        preset.temperature = v;
    }
    if let Some(v) = params.top_p {
        preset.top_p = v;
    }
    if let Some(v) = params.top_k {
        preset.top_k = v;
    }
    if let Some(v) = params.random_seed {
        preset.random_seed = v;
    }
    if let Some(v) = params.min_length {
        preset.min_length = v;
    }
    if let Some(v) = params.max_new_tokens {
        preset.max_new_tokens = v;
    }
}

fn format_unix(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => secs.to_string(),
    }
}
