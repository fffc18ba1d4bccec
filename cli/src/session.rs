//! Line-driven interactive front ends: the roster session and the counter.

use roster_core::{Counter, ListSynchronizer, StudentId, Transport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::CliError;
use crate::render;

const SESSION_HELP: &str = "commands: add <name> | rm <id> | refresh | dismiss | quit\n";
const COUNTER_HELP: &str = "commands: + | - | quit\n";

#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Add(String),
    Remove(StudentId),
    Refresh,
    Dismiss,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb {
        "add" | "a" => Ok(SessionCommand::Add(rest.to_string())),
        "rm" | "remove" | "delete" => {
            if rest.is_empty() {
                return Err("rm needs a student id".to_string());
            }
            rest.parse()
                .map(SessionCommand::Remove)
                .map_err(|e| format!("bad id: {e}"))
        }
        "refresh" | "r" | "" => Ok(SessionCommand::Refresh),
        "dismiss" => Ok(SessionCommand::Dismiss),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}

/// Run the roster session until `quit` or end of input.
///
/// Operation failures are not errors here: they land in the snapshot's
/// notice and are rendered like everything else.
pub async fn run_session<T, R, W>(
    sync: &ListSynchronizer<T>,
    input: R,
    mut output: W,
) -> Result<(), CliError>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let _ = sync.refresh().await;
    output.write_all(render::roster(&sync.snapshot()).as_bytes()).await?;
    output.write_all(SESSION_HELP.as_bytes()).await?;
    output.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(SessionCommand::Quit) => break,
            Ok(SessionCommand::Help) => {
                output.write_all(SESSION_HELP.as_bytes()).await?;
                continue;
            }
            Ok(command) => execute(sync, command).await,
            Err(message) => {
                output.write_all(format!("{message}\n{SESSION_HELP}").as_bytes()).await?;
                continue;
            }
        }
        output.write_all(render::roster(&sync.snapshot()).as_bytes()).await?;
        output.flush().await?;
    }

    sync.teardown();
    output.flush().await?;
    Ok(())
}

async fn execute<T: Transport>(sync: &ListSynchronizer<T>, command: SessionCommand) {
    match command {
        SessionCommand::Add(name) => {
            sync.set_draft(&name);
            let _ = sync.submit_draft().await;
        }
        SessionCommand::Remove(id) => {
            let _ = sync.remove(&id).await;
        }
        SessionCommand::Refresh => {
            let _ = sync.refresh().await;
        }
        SessionCommand::Dismiss => {
            sync.dismiss_notice();
        }
        SessionCommand::Help | SessionCommand::Quit => {}
    }
}

/// Run the counter until `quit` or end of input.
pub async fn run_counter<R, W>(input: R, mut output: W) -> Result<Counter, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut counter = Counter::new();
    output.write_all(render::counter(counter).as_bytes()).await?;
    output.write_all(COUNTER_HELP.as_bytes()).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        counter = match line.trim() {
            "+" => counter.increment(),
            "-" => counter.decrement(),
            "quit" | "exit" | "q" => break,
            _ => {
                output.write_all(COUNTER_HELP.as_bytes()).await?;
                continue;
            }
        };
        output.write_all(render::counter(counter).as_bytes()).await?;
    }
    output.flush().await?;
    Ok(counter)
}
