//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while opening or writing a tag container.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("Unsupported Format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Unable to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
    #[error("Unable to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TagError {
    pub(crate) fn read(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// True when the file exists but its container could not be parsed; the
    /// file (and its album) must be left out of the run.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Io(_))
    }
}

/// Failures while working on albums and their files.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error("{0} is missing")]
    MissingField(&'static str),
    #[error("{} already exists", .0.display())]
    Exists(PathBuf),
}

/// Failures of a single extract or convert job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("unable to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} failed on {}: {status}", path.display())]
    Program {
        program: String,
        path: PathBuf,
        status: std::process::ExitStatus,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tag(#[from] TagError),
}
