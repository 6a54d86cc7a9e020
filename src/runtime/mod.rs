use std::env;

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Cli, Commands};
use crate::jobs::{self, JobOptions};
use crate::library::Context;

mod cleanup;
mod copy;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = settings::load_settings(cli.config.as_deref());
    let ctx = Context::new(settings);
    let root = env::current_dir()?;
    let options = JobOptions {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Extract => {
            let jobs = jobs::extract_jobs(&root, &ctx.settings.extract, options);
            report("archives", jobs.len(), jobs::run_jobs(&jobs, cli.seq_exec, cli.verbose));
        }
        Commands::Convert => {
            let jobs = jobs::convert_jobs(&root, &ctx.settings.convert, options);
            report("files", jobs.len(), jobs::run_jobs(&jobs, cli.seq_exec, cli.verbose));
        }
        Commands::Cleanup { skip_complete } => {
            cleanup::run(&ctx, &root, cli.copy_target, cli.dry_run, skip_complete)?;
        }
        Commands::Copy => {
            let copied = copy::run(&ctx, &root, cli.copy_target, options)?;
            info!("{copied} albums copied");
        }
    }
    Ok(())
}

fn report(what: &str, total: usize, failed: usize) {
    if failed == 0 {
        info!("{total} {what} processed");
    } else {
        warn!("{failed} of {total} {what} failed");
    }
}
