//! Line commands typed at the roster prompt.

use anyhow::{anyhow, bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    /// 1-based position in the table.
    Position(usize),
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterCommand {
    Type { row: RowRef, text: String },
    Pick { row: RowRef, value: String },
    Show,
    Submit,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <row> <text>        type text into a row (row = 1-based number or N-xxxx name)
  <row>               clear a row
  pick <row> <value>  pick an entry from the row's suggestion list
  show                print the roster
  submit              print the hidden id fields as they would be submitted
  help                this text
  quit";

pub fn parse_command(line: &str) -> Result<RosterCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (head, rest) = line
        .trim_start()
        .split_once(' ')
        .unwrap_or((line.trim_start(), ""));

    match head {
        "" => bail!("empty command"),
        "show" => Ok(RosterCommand::Show),
        "submit" => Ok(RosterCommand::Submit),
        "help" | "?" => Ok(RosterCommand::Help),
        "quit" | "exit" => Ok(RosterCommand::Quit),
        "pick" => {
            let (row, value) = rest
                .trim()
                .split_once(' ')
                .ok_or_else(|| anyhow!("usage: pick <row> <value>"))?;
            Ok(RosterCommand::Pick {
                row: parse_row(row)?,
                value: value.trim().to_string(),
            })
        }
        row => Ok(RosterCommand::Type {
            row: parse_row(row)?,
            text: rest.to_string(),
        }),
    }
}

fn parse_row(raw: &str) -> Result<RowRef> {
    if raw.starts_with(client_core::form::NAME_PREFIX) {
        return Ok(RowRef::Field(raw.to_string()));
    }
    match raw.parse::<usize>() {
        Ok(0) => bail!("rows are numbered from 1"),
        Ok(n) => Ok(RowRef::Position(n)),
        Err(_) => bail!("unknown command or row '{raw}' (try 'help')"),
    }
}
