mod cmd;
mod modules;

use crate::cmd::{
    archives::{self, ArchivesArgs},
    compare::{self, CompareArgs},
    matched::{self, MatchedArgs},
    server::{self, ServerArgs},
    unmatched::{self, UnmatchedArgs},
    HubArgs,
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, process::ExitCode, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "companion_hub")]
#[command(about = "Receive problems from Competitive Companion and manage their sample tests")]
struct Cli {
    #[command(flatten)]
    hub: HubArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP receiver
    Server(ServerArgs),
    /// Compare sample outputs with the outputs of the last run
    Compare(CompareArgs),
    /// List archived problems
    Archives(ArchivesArgs),
    /// Inspect or edit the matched test set
    Matched(MatchedArgs),
    /// List sample inputs that have not matched yet
    Unmatched(UnmatchedArgs),
}

fn main() -> ExitCode {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_str(&log_level).unwrap_or(LevelFilter::INFO).into())
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().expect("couldn't determine local time offset"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let runtime = match Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Server(args) => runtime.block_on(server::run(args, cli.hub)),
        Commands::Compare(args) => runtime.block_on(compare::run(args, cli.hub)),
        Commands::Archives(args) => runtime.block_on(archives::run(args, cli.hub)),
        Commands::Matched(args) => runtime.block_on(matched::run(args, cli.hub)),
        Commands::Unmatched(args) => runtime.block_on(unmatched::run(args, cli.hub)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("command failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
