//! tl - terminal task list
//!
//! CLI entry point: opens the interactive list, or runs one subcommand and
//! prints the resulting list.

use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use tasklist::animator::Started;
use tasklist::cli::{Cli, Command, ThemeAction};
use tasklist::config::Config;
use tasklist::confirm::{AssumeYes, Confirm, TerminalConfirm};
use tasklist::domain::TaskId;
use tasklist::print::format_list;
use tasklist::render::{EditEnd, TextInput};
use tasklist::session::Session;
use tasklist::storage::{FileStore, MemoryStore, Persistence};
use tasklist::tui;

fn setup_logging(log_dir: &Path, cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("tasklist.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The log directory lives under the data dir, so config loads first and
    // holds its warnings until a subscriber exists
    let (mut config, skipped) = Config::load_collecting(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    setup_logging(
        &config.storage.data_dir.join("logs"),
        cli.log_level.as_deref(),
        config.log_level.as_deref(),
    )
    .context("Failed to setup logging")?;
    for message in &skipped {
        warn!("{}", message);
    }

    let persistence = if cli.ephemeral {
        info!("Using in-memory storage");
        Persistence::new(MemoryStore::new())
    } else {
        let store = FileStore::open(&config.storage.data_dir)
            .context(format!("Failed to open storage at {}", config.storage.data_dir.display()))?;
        info!(path = %store.path().display(), "Using file storage");
        Persistence::new(store)
    };
    let mut session = Session::open(persistence, config.ui.exit_delay());

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => tui::run(session, &config.ui).await,
        Some(Command::List) => cmd_list(&mut session),
        Some(Command::Add { text }) => cmd_add(&mut session, &text.join(" ")),
        Some(Command::Toggle { id }) => cmd_toggle(&mut session, &id),
        Some(Command::Edit { id, text }) => cmd_edit(&mut session, &id, &text.join(" ")),
        Some(Command::Remove { id }) => cmd_remove(&mut session, &id),
        Some(Command::ClearCompleted) => cmd_clear_completed(&mut session),
        Some(Command::ClearAll { yes }) => {
            if yes {
                cmd_clear_all(&mut session, &mut AssumeYes)
            } else {
                cmd_clear_all(&mut session, &mut TerminalConfirm)
            }
        }
        Some(Command::Theme { action }) => cmd_theme(&mut session, action),
    }
}

/// Resolve an ID or unique prefix to a task
fn resolve(session: &Session, reference: &str) -> Result<TaskId> {
    match session.store().resolve(reference) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(eyre!("No task matches '{}'", reference)),
        Err(candidates) => {
            let ids: Vec<&str> = candidates.iter().map(|id| id.as_str()).collect();
            Err(eyre!("'{}' is ambiguous: {}", reference, ids.join(", ")))
        }
    }
}

fn print_list(session: &mut Session) {
    session.render();
    print!("{}", format_list(session.view()));
}

fn cmd_list(session: &mut Session) -> Result<()> {
    print_list(session);
    Ok(())
}

fn cmd_add(session: &mut Session, text: &str) -> Result<()> {
    debug!(%text, "cmd_add: called");
    match session.add(text) {
        Some(id) => info!(%id, "Added task"),
        None => println!("{}", "Nothing to add: task text is blank".yellow()),
    }
    print_list(session);
    Ok(())
}

fn cmd_toggle(session: &mut Session, reference: &str) -> Result<()> {
    let id = resolve(session, reference)?;
    session.toggle(&id);
    print_list(session);
    Ok(())
}

fn cmd_edit(session: &mut Session, reference: &str, text: &str) -> Result<()> {
    let id = resolve(session, reference)?;
    let mut edit = session
        .start_edit(&id)
        .ok_or_else(|| eyre!("No task matches '{}'", reference))?;
    edit.input = TextInput::with_value(text);
    if !session.finish_edit(edit, EditEnd::Enter) {
        debug!(%id, "cmd_edit: text unchanged");
    }
    print_list(session);
    Ok(())
}

fn cmd_remove(session: &mut Session, reference: &str) -> Result<()> {
    let id = resolve(session, reference)?;
    let started = session.delete(&id, Instant::now());
    debug!(?started, "cmd_remove: done");
    print_list(session);
    Ok(())
}

fn cmd_clear_completed(session: &mut Session) -> Result<()> {
    let started = session.clear_completed(Instant::now());
    debug!(?started, "cmd_clear_completed: done");
    print_list(session);
    Ok(())
}

fn cmd_clear_all(session: &mut Session, confirm: &mut dyn Confirm) -> Result<()> {
    if session.store().is_empty() {
        print_list(session);
        return Ok(());
    }
    if session.clear_all(confirm, Instant::now()) == Started::Nothing {
        debug!("cmd_clear_all: declined");
        return Ok(());
    }
    print_list(session);
    Ok(())
}

fn cmd_theme(session: &mut Session, action: ThemeAction) -> Result<()> {
    let theme = match action {
        ThemeAction::Show => session.root().applied_theme(),
        ThemeAction::Toggle => session.toggle_theme(),
    };
    println!("{}", theme);
    Ok(())
}
