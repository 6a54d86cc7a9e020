//! Albums on disk: files grouped by album directory, consensus metadata and
//! readiness for the library.

mod album;
mod audio_file;
mod destination;
mod display;
mod scan;

use std::sync::Arc;

use crate::config::Settings;
use crate::text::Sanitizer;

pub use album::Album;
pub use audio_file::{AudioFile, format_of};
pub use destination::{CopyTarget, VARIOUS_ARTISTS};
pub use display::{render_album, render_summary, render_table};
pub use scan::{Albums, load_albums};

/// Settings plus the sanitizer built from them, shared by every album of a
/// run.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    pub sanitizer: Sanitizer,
}

impl Context {
    pub fn new(settings: Settings) -> Arc<Self> {
        let sanitizer = Sanitizer::new(&settings.cleanup);
        Arc::new(Self {
            settings,
            sanitizer,
        })
    }
}
