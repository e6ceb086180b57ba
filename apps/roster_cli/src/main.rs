use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{HttpStudentDirectory, RosterController, RosterEvent, RosterRow, RosterSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{parse_command, RosterCommand, RowRef, HELP};
use config::{load_settings, DEFAULT_CONFIG_FILE};

/// Attendance roster entry against a running teacher server.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    session_cookie: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(cookie) = args.session_cookie {
        settings.session_cookie = Some(cookie);
    }

    let mut directory =
        HttpStudentDirectory::with_timeout(&settings.server_url, settings.request_timeout())
            .context("failed to set up student lookup")?;
    if let Some(cookie) = &settings.session_cookie {
        directory = directory.with_session_cookie(cookie);
    }
    info!(
        server_url = %settings.server_url,
        rows = settings.rows,
        "roster ready; type 'help' for commands"
    );

    let session = RosterSession::new(
        RosterController::with_rows(settings.rows, settings.controller_config()),
        Arc::new(directory),
    );
    tokio::spawn(report_events(session.subscribe_events()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if let Err(err) = run_command(&session, command.clone()).await {
            println!("{err:#}");
        }
        if command == RosterCommand::Quit {
            break;
        }
    }
    Ok(())
}

async fn run_command(session: &Arc<RosterSession>, command: RosterCommand) -> Result<()> {
    match command {
        RosterCommand::Type { row, text } => {
            match row {
                RowRef::Position(n) => session.filter_changed(n - 1, &text).await?,
                RowRef::Field(field) => session.filter_changed_by_field(&field, &text).await?,
            };
        }
        RosterCommand::Pick { row, value } => {
            let index = match row {
                RowRef::Position(n) => n - 1,
                RowRef::Field(field) => session.row_index(&field).await?,
            };
            if let Some(student) = session.suggestion_picked(index, &value).await? {
                println!("picked {} ({})", student.name, student.id);
            }
        }
        RosterCommand::Show => {
            for (index, row) in session.snapshot().await.iter().enumerate() {
                if !row.is_hidden() {
                    println!("{}", render_row(index, row));
                }
            }
        }
        RosterCommand::Submit => {
            for (name, value) in session.form_fields().await {
                println!("{name}={value}");
            }
        }
        RosterCommand::Help => println!("{HELP}"),
        RosterCommand::Quit => {}
    }
    Ok(())
}

fn render_row(index: usize, row: &RosterRow) -> String {
    let id = row.hidden_id_value();
    let mut line = format!(
        "{:>3} {} [{}] {}",
        index + 1,
        row.field(),
        if id.is_empty() { "-" } else { id.as_str() },
        row.visible_text()
    );
    if !row.suggestions().is_empty() {
        let options: Vec<String> = row
            .suggestions()
            .iter()
            .map(|s| format!("{}={}", s.id, s.name))
            .collect();
        line.push_str(&format!("  <{}>", options.join(", ")));
    }
    line
}

async fn report_events(mut events: tokio::sync::broadcast::Receiver<RosterEvent>) {
    use tokio::sync::broadcast::error::RecvError;

    loop {
        match events.recv().await {
            Ok(RosterEvent::DuplicateRejected { message, .. }) => println!("!! {message}"),
            Ok(RosterEvent::SelectionConfirmed { row, student }) => {
                println!("row {}: {} ({})", row + 1, student.name, student.id);
            }
            Ok(RosterEvent::SuggestionsUpdated { row, count }) => {
                println!("row {}: {count} suggestion(s)", row + 1);
            }
            Ok(RosterEvent::LookupFailed { .. }) | Ok(RosterEvent::VisibilityChanged { .. }) => {}
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "event reporter lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
