//! `ctfboard` - CLI for the CTF scoreboard
//!
//! This binary registers teams, edits scores and shows the participant list
//! and leaderboard, either one command at a time or in an interactive shell.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use ctfboard::cli::{
    Cli, Command, ConfigCommand, DeleteCommand, ListCommand, OutputFormat, ScoreCommand,
};
use ctfboard::controller::confirmation_prompt;
use ctfboard::render::{render_leaderboard, render_participants, RowAction, Table};
use ctfboard::{init_logging, session, Config, Controller, Records, Scoreboard, SqliteStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(database) = cli.database {
        config.storage.database_path = Some(database);
    }

    match cli.command {
        Command::Register(cmd) => {
            let mut board = open_board(&config)?;
            let team = cmd.team.clone();
            let id = board.register(cmd.into())?;
            println!("Team \"{team}\" registered successfully! (ID {id})");
            Ok(())
        }
        Command::Score(cmd) => handle_score(&config, cmd),
        Command::Delete(cmd) => handle_delete(&config, cmd),
        Command::Participants(cmd) => {
            let board = open_board(&config)?;
            let table = render_participants(board.participants());
            print_table(table, &cmd, board.participants(), |p| p.id.as_str())
        }
        Command::Leaderboard(cmd) => {
            let board = open_board(&config)?;
            let table = render_leaderboard(board.results());
            print_table(table, &cmd, board.results(), |r| r.id.as_str())
        }
        Command::Shell => handle_shell(&config),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_board(config: &Config) -> Result<Scoreboard<SqliteStore>> {
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    let board = Scoreboard::load(Records::from_config(store, &config.storage))?;
    Ok(board)
}

fn handle_score(config: &Config, cmd: ScoreCommand) -> Result<()> {
    let mut board = open_board(config)?;
    match board.update_score(&cmd.id, cmd.field.into(), &cmd.value)? {
        Some(result) => {
            println!("Score updated successfully!");
            println!(
                "{}: defence {}, attack {}, uptime {}, total {}",
                result.team_name,
                result.defence_score,
                result.attack_score,
                result.uptime,
                result.total_score
            );
        }
        None => println!("No result with ID {}", cmd.id),
    }
    Ok(())
}

fn handle_delete(config: &Config, cmd: DeleteCommand) -> Result<()> {
    let (action, yes) = match cmd {
        DeleteCommand::Participant { id, yes } => (RowAction::DeleteParticipant(id), yes),
        DeleteCommand::Result { id, yes } => (RowAction::DeleteResult(id), yes),
    };

    if !yes && !confirm(confirmation_prompt(&action))? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut board = open_board(config)?;
    let (deleted, what) = match &action {
        RowAction::DeleteParticipant(id) => (board.delete_participant(id)?, "Participant"),
        RowAction::DeleteResult(id) => (board.delete_result(id)?, "Result"),
    };

    if deleted {
        println!("{what} deleted successfully!");
    } else {
        println!("No {} with ID {}", what.to_lowercase(), action.id());
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Print `table`, or in JSON mode the records whose rows survive the filter,
/// in table order.
fn print_table<T: Serialize>(
    mut table: Table,
    cmd: &ListCommand,
    records: &[T],
    id_of: impl Fn(&T) -> &str,
) -> Result<()> {
    if let Some(query) = &cmd.filter {
        table.apply_filter(query);
    }

    match cmd.format {
        OutputFormat::Plain => print!("{table}"),
        OutputFormat::Json => {
            let selected = table.visible_records(records, id_of);
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
    }
    Ok(())
}

fn handle_shell(config: &Config) -> Result<()> {
    let board = open_board(config)?;
    let mut controller = Controller::new(board, config.ui.default_screen, config.status_timeout());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(session::run(
        &mut controller,
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ))?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let board = open_board(config)?;
    let stats = board.records().store().stats()?;
    let path = config.database_path();

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "participants": board.participants().len(),
            "results": board.results().len(),
            "record_count": stats.record_count,
            "last_write": stats.last_write,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("ctfboard status");
        println!("---------------");
        println!("Database:      {}", path.display());
        println!("Participants:  {}", board.participants().len());
        println!("Results:       {}", board.results().len());
        println!("Records:       {}", stats.record_count);
        println!("Size:          {} bytes", stats.db_size_bytes);
        match stats.last_write {
            Some(at) => println!("Last write:    {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last write:    never"),
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Participants key:   {}", config.storage.participants_key);
                println!("  Results key:        {}", config.storage.results_key);
                println!();
                println!("[UI]");
                println!("  Status timeout:     {} ms", config.ui.status_timeout_ms);
                println!("  Default screen:     {}", config.ui.default_screen);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
