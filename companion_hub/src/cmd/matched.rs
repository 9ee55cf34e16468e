use crate::cmd::HubArgs;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MatchedArgs {
    #[command(subcommand)]
    action: MatchedAction,
}

#[derive(Debug, Subcommand)]
enum MatchedAction {
    /// Print the tests whose last output matched
    List,
    /// Forget every matched test
    Clear,
    /// Forget a single matched test, e.g. `2.txt`
    Unmark { name: String },
}

pub async fn run(args: MatchedArgs, hub_args: HubArgs) -> Result<()> {
    let hub = hub_args.open()?;
    let tracker = &hub.tracker;

    match args.action {
        MatchedAction::List => {
            for name in tracker.matched() {
                println!("{}", name);
            }
        }
        MatchedAction::Clear => {
            tracker
                .clear_all(false)
                .context("failed to clear matched tests")?;
        }
        MatchedAction::Unmark { name } => {
            let removed = tracker
                .unmark(&name)
                .with_context(|| format!("failed to unmark {}", name))?;
            if !removed {
                tracing::warn!("{} was not marked as matched", name);
            }
        }
    }

    Ok(())
}
