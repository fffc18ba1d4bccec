mod error;
mod logging;
mod render;
mod session;
mod transport;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use roster_core::config::{BASE_URL_ENV, DEFAULT_BASE_URL};
use roster_core::{ApiError, ClientConfig, ListSynchronizer, StudentClient, StudentId};
use tokio::io::BufReader;

use crate::error::CliError;
use crate::transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Client for the student roster API")]
struct Cli {
    /// Base URL of the student API.
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print all students.
    List,
    /// Add a student and print the updated list.
    Add { name: String },
    /// Delete a student by id and print the updated list.
    Remove { id: StudentId },
    /// Interactive roster session on stdin.
    Session,
    /// Interactive counter on stdin.
    Counter,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // The rendered roster already carries the notice.
        Err(CliError::Api(_)) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Counter => {
            session::run_counter(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
            Ok(())
        }
        Command::Session => {
            let sync = connect(&cli.base_url)?;
            session::run_session(&sync, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
        }
        command => {
            let sync = connect(&cli.base_url)?;
            let outcome = one_shot(&sync, command).await;
            print!("{}", render::roster(&sync.snapshot()));
            sync.teardown();
            Ok(outcome?)
        }
    }
}

fn connect(base_url: &str) -> Result<ListSynchronizer<UreqTransport>, CliError> {
    let config = ClientConfig::new(base_url)?;
    Ok(ListSynchronizer::new(
        StudentClient::new(config.base_url()),
        UreqTransport::new(),
    ))
}

/// Load the roster, then apply a single command to it.
async fn one_shot(sync: &ListSynchronizer<UreqTransport>, command: Command) -> Result<(), ApiError> {
    sync.refresh().await?;
    match command {
        Command::Add { name } => {
            sync.set_draft(&name);
            sync.submit_draft().await.map(drop)
        }
        Command::Remove { id } => sync.remove(&id).await,
        Command::List | Command::Session | Command::Counter => Ok(()),
    }
}
