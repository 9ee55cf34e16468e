use crate::cmd::HubArgs;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct UnmatchedArgs {}

pub async fn run(_args: UnmatchedArgs, hub_args: HubArgs) -> Result<()> {
    let hub = hub_args.open()?;
    let workspace = &hub.workspace;

    let inputs = workspace
        .list_numbered_files(&workspace.sample_input_dir())
        .context("failed to list sample inputs")?
        .into_iter()
        .map(|(_, path)| path)
        .collect();

    for path in hub.tracker.filter_unmatched(inputs) {
        println!("{}", path.display());
    }

    Ok(())
}
