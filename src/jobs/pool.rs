use std::fmt;
use std::num::NonZeroUsize;
use std::thread;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{error, warn};

use crate::error::JobError;

/// A unit of extract or convert work. `Display` names it for listings.
pub trait Job: fmt::Display + Send + Sync {
    fn run(&self, verbose: bool) -> Result<(), JobError>;
}

/// Whether jobs should run one after another.
pub fn use_sequential(requested: bool, cpus: usize, jobs: usize) -> bool {
    requested || cpus < 2 || jobs < 2
}

fn run_one<J: Job>(job: &J, verbose: bool) -> bool {
    match job.run(verbose) {
        Ok(()) => true,
        Err(e) => {
            error!("{job}: {e}");
            false
        }
    }
}

/// Run every job and return how many failed. A failing job never stops the
/// others. Parallel runs list the jobs, silence per-job output and show a
/// progress bar.
pub fn run_jobs<J: Job>(jobs: &[J], sequential: bool, verbose: bool) -> usize {
    let cpus = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    if use_sequential(sequential, cpus, jobs.len()) {
        return jobs.iter().filter(|job| !run_one(*job, verbose)).count();
    }

    let pool = match ThreadPoolBuilder::new().num_threads(cpus).build() {
        Ok(pool) => pool,
        Err(e) => {
            warn!("falling back to sequential execution: {e}");
            return jobs.iter().filter(|job| !run_one(*job, verbose)).count();
        }
    };

    for job in jobs {
        println!("{job}");
    }
    let bar = ProgressBar::new(jobs.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}]") {
        bar.set_style(style);
    }

    let failed = pool.install(|| {
        jobs.par_iter()
            .filter(|job| {
                let ok = run_one(*job, false);
                bar.inc(1);
                !ok
            })
            .count()
    });
    bar.finish_and_clear();
    failed
}
