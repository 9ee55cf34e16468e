use crate::cmd::HubArgs;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Print every differing line instead of a per-file summary
    #[arg(long)]
    verbose: bool,
}

pub async fn run(args: CompareArgs, hub_args: HubArgs) -> Result<()> {
    let hub = hub_args.open()?;
    let result = hub.comparator.compare().with_context(|| {
        let message = "failed to compare outputs";
        tracing::error!(message);
        message
    })?;

    for comparison in result.comparisons.iter() {
        let mark = if comparison.matched { "OK" } else { "NG" };
        println!("[{}] {}: {}", mark, comparison.file_name, comparison.message);
        if args.verbose {
            for difference in comparison.differences.iter() {
                println!(
                    "    line {}: expected {:?}, actual {:?}",
                    difference.line_number, difference.expected, difference.actual
                );
            }
        }
    }
    println!("{}/{} matched", result.matched_files, result.total_files);

    Ok(())
}
