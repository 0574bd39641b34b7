//! Chat-style command surface.
//!
//! Parses `/name [args]` text into a [`Command`], runs it through the
//! [`QueryService`] and always produces a [`Reply`]. Errors become user
//! messages here; unexpected ones are logged first.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error};

use crate::aggregate::{ChartStats, Mode};
use crate::error::{QueryError, Result};
use crate::format;
use crate::query::QueryService;
use crate::select::parse_date;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Latest,
    Daily { mode: Mode, date: NaiveDate },
    Chart { date: NaiveDate },
}

/// Reply sent back to the user. `chart` is set only for the chart command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    // ---
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartStats>,
}

impl Reply {
    fn text(reply: String) -> Self {
        Self { reply, chart: None }
    }
}

/// Parse command text. Argument checks happen here, before any data access.
///
/// The leading `/` is optional and a `@botname` suffix is ignored. Spanish
/// aliases (`/actual`, `/promedio`, `/maximo`, `/minimo`, `/grafico`) work too.
pub fn parse_command(text: &str) -> Result<Command> {
    // ---
    let mut tokens = text.split_whitespace();
    let Some(head) = tokens.next() else {
        return Err(QueryError::usage("Empty command. Send /help for the list."));
    };
    let args: Vec<&str> = tokens.collect();

    let name = head.trim_start_matches('/');
    let name = name.split('@').next().unwrap_or(name).to_ascii_lowercase();

    match name.as_str() {
        "start" | "help" => Ok(Command::Help),
        "latest" | "actual" => Ok(Command::Latest),
        "mean" | "promedio" => dated_command(&name, &args, |date| Command::Daily {
            mode: Mode::Mean,
            date,
        }),
        "max" | "maximo" => dated_command(&name, &args, |date| Command::Daily {
            mode: Mode::Max,
            date,
        }),
        "min" | "minimo" => dated_command(&name, &args, |date| Command::Daily {
            mode: Mode::Min,
            date,
        }),
        "chart" | "grafico" => dated_command(&name, &args, |date| Command::Chart { date }),
        _ => Err(QueryError::usage(format!(
            "Unknown command /{name}. Send /help for the list."
        ))),
    }
}

/// Commands taking exactly one `YYYY-MM-DD` argument.
fn dated_command(name: &str, args: &[&str], build: fn(NaiveDate) -> Command) -> Result<Command> {
    // ---
    if args.len() != 1 {
        return Err(QueryError::usage(format!("Usage: /{name} YYYY-MM-DD")));
    }
    parse_date(args[0]).map(build)
}

/// Run command text end to end.
pub async fn execute(service: &QueryService, text: &str) -> Reply {
    // ---
    let result = match parse_command(text) {
        Ok(command) => run(service, command).await,
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        if e.is_internal() {
            error!("Command '{}' failed: {:#}", text.trim(), e);
        } else {
            debug!("Command '{}' rejected: {}", text.trim(), e);
        }
        Reply::text(format::error_text(&e))
    })
}

async fn run(service: &QueryService, command: Command) -> Result<Reply> {
    // ---
    let reply = match command {
        Command::Help => Reply::text(format::help_text()),
        Command::Latest => Reply::text(format::latest_text(&service.latest().await?)),
        Command::Daily { mode, date } => {
            let stats = service.daily(mode, date).await?;
            Reply::text(format::daily_text(mode, date, &stats))
        }
        Command::Chart { date } => Reply {
            reply: format::chart_title(date),
            chart: Some(service.chart(date).await?),
        },
    };
    Ok(reply)
}
