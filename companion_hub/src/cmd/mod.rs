pub mod archives;
pub mod compare;
pub mod matched;
pub mod server;
pub mod unmatched;

use anyhow::{Context, Result};
use clap::Args;
use companion_hub_libs::CompanionHub;
use std::{env, path::PathBuf};

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct HubArgs {
    /// Directory holding sample/, output/ and archives/ [env: COMPANION_HUB_WORKSPACE]
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,
    /// Solution source, relative to the workspace [env: COMPANION_HUB_SOLUTION]
    #[arg(long, global = true)]
    solution: Option<PathBuf>,
}

impl HubArgs {
    fn workspace(&self) -> Result<PathBuf> {
        if let Some(workspace) = &self.workspace {
            return Ok(workspace.clone());
        }
        match env::var("COMPANION_HUB_WORKSPACE") {
            Ok(workspace) => Ok(PathBuf::from(workspace)),
            Err(_) => env::current_dir().with_context(|| {
                let message = "couldn't determine the current directory";
                tracing::error!(message);
                message
            }),
        }
    }

    fn solution(&self) -> PathBuf {
        self.solution.clone().unwrap_or_else(|| {
            env::var("COMPANION_HUB_SOLUTION")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("src/main.rs"))
        })
    }

    /// Build the service object for the resolved workspace.
    pub fn open(&self) -> Result<CompanionHub> {
        let workspace = self.workspace()?;
        let solution = self.solution();
        tracing::info!(
            "workspace: {} (solution: {})",
            workspace.display(),
            solution.display()
        );
        Ok(CompanionHub::new(&workspace, &solution))
    }
}
