//! Command dispatch for mdtriage

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use mdtriage_core::config::TriageConfig;
use mdtriage_core::error::Result;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if cli.verbose {
        eprintln!("resolve_root: {:?}", start.elapsed());
    }

    let config = TriageConfig::load(&root)?;

    match &cli.command {
        None | Some(Commands::Run { .. }) => {
            let (dry_run, no_archive, output_dir) = match &cli.command {
                Some(Commands::Run {
                    dry_run,
                    no_archive,
                    output_dir,
                }) => (*dry_run, *no_archive, output_dir.clone()),
                _ => (false, false, None),
            };
            commands::run::execute(cli, &root, config, dry_run, no_archive, output_dir, start)
        }
        Some(Commands::Classify) => commands::classify::execute(cli, &root, &config),
        Some(Commands::Groups) => commands::groups::execute(cli, &root, &config),
        Some(Commands::Freshness) => commands::freshness::execute(cli, &root, &config),
        Some(Commands::Outdated) => commands::outdated::execute(cli, &root, &config),
    }
}
