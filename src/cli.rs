use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::library::CopyTarget;

#[derive(Debug, Parser)]
#[command(name = "audiotag", version)]
#[command(about = "Prepare downloaded albums for the music library", long_about = None)]
pub struct Cli {
    /// Show what would be done without touching any file
    #[arg(short, long, global = true)]
    pub dry_run: bool,
    /// Run extract and convert jobs one after another
    #[arg(short, long, global = true)]
    pub seq_exec: bool,
    /// Print debug info
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Library folder albums are copied into
    #[arg(short = 't', long, value_enum, default_value_t = CopyTarget::Flac, global = true)]
    pub copy_target: CopyTarget,
    /// Configuration file (overrides AUDIOTAG_CONFIG_PATH)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract compressed archives
    Extract,
    /// Convert audio files to .flac
    Convert,
    /// Review and fix the tags of every album
    Cleanup {
        /// Skip albums that are already ready to copy
        #[arg(short = 'k', long)]
        skip_complete: bool,
    },
    /// Copy complete albums to the library
    Copy,
}
