use crate::cmd::HubArgs;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ArchivesArgs {}

pub async fn run(_args: ArchivesArgs, hub_args: HubArgs) -> Result<()> {
    let hub = hub_args.open()?;
    let listing = hub.archives.list();

    for group in listing.groups.iter() {
        println!("{} ({})", group.group_name, group.problem_count);
        for problem in group.problems.iter() {
            println!(
                "    {}  {}  tests={}  archived={}",
                problem.id, problem.name, problem.test_count, problem.archived_at
            );
        }
    }
    println!(
        "{} problem(s) in {} group(s)",
        listing.total_problems, listing.total_groups
    );

    Ok(())
}
