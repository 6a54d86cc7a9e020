use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use super::{Job, JobOptions, find_files, move_file, resolve};
use crate::config::ExtractSettings;
use crate::error::JobError;

/// Unpack one archive with the external extractor, then move the archive
/// into the archive folder.
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub archive: PathBuf,
    pub extract_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub program: String,
    pub dry_run: bool,
}

impl fmt::Display for ExtractJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extracting {}", self.archive.display())
    }
}

impl Job for ExtractJob {
    fn run(&self, verbose: bool) -> Result<(), JobError> {
        if !self.archive.exists() {
            return Err(JobError::Missing(self.archive.clone()));
        }
        if verbose {
            info!("{self}");
        }
        if self.dry_run {
            return Ok(());
        }

        let status = Command::new(&self.program)
            .arg("x")
            .arg(format!("-o{}", self.extract_dir.display()))
            .arg("-y")
            .arg(&self.archive)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| JobError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(JobError::Program {
                program: self.program.clone(),
                path: self.archive.clone(),
                status,
            });
        }

        let name = self
            .archive
            .file_name()
            .ok_or_else(|| JobError::Missing(self.archive.clone()))?;
        move_file(&self.archive, &self.archive_dir.join(name))?;
        Ok(())
    }
}

/// One job per archive under `root`, skipping the archive folder itself.
pub fn extract_jobs(root: &Path, settings: &ExtractSettings, options: JobOptions) -> Vec<ExtractJob> {
    let archive_dir = resolve(root, &settings.archive);
    let extract_dir = resolve(root, &settings.extract);
    find_files(root, &settings.supported_formats, Some(&archive_dir))
        .into_iter()
        .map(|archive| ExtractJob {
            archive,
            extract_dir: extract_dir.clone(),
            archive_dir: archive_dir.clone(),
            program: settings.program.clone(),
            dry_run: options.dry_run,
        })
        .collect()
}
