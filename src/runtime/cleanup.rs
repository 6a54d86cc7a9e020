use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::LibraryError;
use crate::jobs;
use crate::library::{Context, CopyTarget, load_albums, render_summary};
use crate::review::{ReviewOptions, Session};

pub fn run(
    ctx: &Arc<Context>,
    root: &Path,
    copy_target: CopyTarget,
    dry_run: bool,
    skip_complete: bool,
) -> Result<(), LibraryError> {
    let options = ReviewOptions {
        dry_run,
        skip_complete,
    };
    let stdin = io::stdin();
    review(ctx, root, copy_target, options, stdin.lock(), io::stdout())?;
    Ok(())
}

/// Scan `root`, print the summary, review every album and print the summary
/// again.
fn review<R: BufRead, W: Write>(
    ctx: &Arc<Context>,
    root: &Path,
    copy_target: CopyTarget,
    options: ReviewOptions,
    input: R,
    mut out: W,
) -> Result<W, LibraryError> {
    let cleanup = &ctx.settings.cleanup;
    let finished = jobs::resolve(root, &cleanup.finished_albums);
    let mut albums = load_albums(
        root,
        ctx,
        &cleanup.supported_formats,
        Some(&cleanup.finished_albums),
        copy_target,
    )?;
    info!("{} albums found under {}", albums.len(), root.display());

    write!(out, "{}", render_summary(albums.values()))?;
    let mut session = Session::new(input, out, options, finished);
    session.run(&mut albums)?;

    let mut out = session.into_output();
    write!(out, "{}", render_summary(albums.values()))?;
    out.flush()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::config::Settings;
    use crate::tags::fixtures;

    fn setup() -> (tempfile::TempDir, Arc<Context>) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.library.location = dir.path().join("Library");
        (dir, Context::new(settings))
    }

    fn complete_album(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fixtures::write_flac_tagged(
            &dir.join("01 Be My Husband.flac"),
            &[
                ("TRACKNUMBER", "1"),
                ("TITLE", "Be My Husband"),
                ("ARTIST", "Nina Simone"),
                ("ALBUM", "Pastel Blues"),
                ("ALBUMARTIST", "Nina Simone"),
            ],
            true,
        );
    }

    #[test]
    fn next_moves_a_ready_album_into_the_finished_folder() {
        let (dir, ctx) = setup();
        let root = dir.path().join("incoming");
        complete_album(&root.join("Nina Simone - Pastel Blues"));

        let out = review(
            &ctx,
            &root,
            CopyTarget::Flac,
            ReviewOptions::default(),
            "n\n".as_bytes(),
            Vec::new(),
        )
        .unwrap();

        let finished = root.join("Finished").join("Nina Simone - Pastel Blues");
        assert!(finished.join("01 Be My Husband.flac").exists());
        assert!(!root.join("Nina Simone - Pastel Blues").exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pastel Blues"));
    }

    #[test]
    fn finished_albums_are_not_scanned_again() {
        let (dir, ctx) = setup();
        let root = dir.path().join("incoming");
        complete_album(&root.join("Finished").join("Nina Simone - Pastel Blues"));

        let out = review(
            &ctx,
            &root,
            CopyTarget::Flac,
            ReviewOptions::default(),
            "".as_bytes(),
            Vec::new(),
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Pastel Blues"));
    }

    #[test]
    fn dry_run_reads_no_commands() {
        let (dir, ctx) = setup();
        let root = dir.path().join("incoming");
        complete_album(&root.join("Nina Simone - Pastel Blues"));

        let options = ReviewOptions {
            dry_run: true,
            skip_complete: false,
        };
        review(&ctx, &root, CopyTarget::Flac, options, "d\ny\n".as_bytes(), Vec::new()).unwrap();

        assert!(root.join("Nina Simone - Pastel Blues").exists());
    }
}
