use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::error::LibraryError;
use crate::jobs::JobOptions;
use crate::library::{Context, CopyTarget, load_albums};

pub fn run(
    ctx: &Arc<Context>,
    root: &Path,
    copy_target: CopyTarget,
    options: JobOptions,
) -> Result<usize, LibraryError> {
    copy_albums(ctx, root, copy_target, options, io::stdout())
}

/// Copy every album under `root` that is ready into its library folder.
/// Returns how many albums were copied (or would be, on a dry run).
fn copy_albums<W: Write>(
    ctx: &Arc<Context>,
    root: &Path,
    copy_target: CopyTarget,
    options: JobOptions,
    mut out: W,
) -> Result<usize, LibraryError> {
    let albums = load_albums(root, ctx, &ctx.settings.copy.supported_formats, None, copy_target)?;

    let mut copied = 0;
    for album in albums.values() {
        if !album.ready_to_copy() {
            debug!("not ready: {}", album.path().display());
            continue;
        }
        let Some(dst) = album.destination() else {
            warn!("no destination for {}", album.path().display());
            continue;
        };
        if options.verbose || options.dry_run {
            writeln!(out, "Copy \"{}\" to \"{}\"", album.path().display(), dst.display())?;
        }
        if options.dry_run {
            copied += 1;
            continue;
        }
        match copy_tree(album.path(), &dst) {
            Ok(()) => copied += 1,
            Err(e) => error!("copying {} failed: {e}", album.path().display()),
        }
    }
    Ok(copied)
}

/// Recursively copy the contents of `src` into `dst`.
fn copy_tree(src: &Path, dst: &Path) -> Result<(), LibraryError> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Settings;
    use crate::tags::fixtures;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        library: PathBuf,
        ctx: Arc<Context>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("incoming");
        let library = dir.path().join("Library");
        let mut settings = Settings::default();
        settings.library.location = library.clone();

        let album = root.join("Nina Simone - Pastel Blues");
        fs::create_dir_all(&album).unwrap();
        fixtures::write_flac_tagged(
            &album.join("01 Be My Husband.flac"),
            &[
                ("TRACKNUMBER", "1"),
                ("TITLE", "Be My Husband"),
                ("ARTIST", "Nina Simone"),
                ("ALBUM", "Pastel Blues"),
                ("ALBUMARTIST", "Nina Simone"),
            ],
            true,
        );
        fs::write(album.join("cover.jpg"), fixtures::PNG).unwrap();

        let untagged = root.join("Unknown");
        fs::create_dir_all(&untagged).unwrap();
        fixtures::write_flac(&untagged.join("01 track.flac"));

        Fixture {
            ctx: Context::new(settings),
            root,
            library,
            _dir: dir,
        }
    }

    fn destination(library: &Path) -> PathBuf {
        library
            .join("flac")
            .join("N")
            .join("Nina Simone")
            .join("Nina Simone - Pastel Blues")
    }

    #[test]
    fn ready_albums_are_copied_with_their_extras() {
        let fx = fixture();
        let copied = copy_albums(&fx.ctx, &fx.root, CopyTarget::Flac, JobOptions::default(), Vec::new()).unwrap();

        assert_eq!(copied, 1);
        let dst = destination(&fx.library);
        assert!(dst.join("01 Be My Husband.flac").exists());
        assert!(dst.join("cover.jpg").exists());
        assert!(fx.root.join("Nina Simone - Pastel Blues").exists());
    }

    #[test]
    fn dry_run_only_prints() {
        let fx = fixture();
        let options = JobOptions {
            dry_run: true,
            verbose: false,
        };
        let mut out = Vec::new();
        let copied = copy_albums(&fx.ctx, &fx.root, CopyTarget::Flac, options, &mut out).unwrap();

        assert_eq!(copied, 1);
        assert!(!fx.library.exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Copy \""));
        assert!(text.contains("Nina Simone - Pastel Blues\" to \""));
    }

    #[test]
    fn albums_already_in_the_library_are_skipped() {
        let fx = fixture();
        fs::create_dir_all(destination(&fx.library)).unwrap();

        let copied = copy_albums(&fx.ctx, &fx.root, CopyTarget::Flac, JobOptions::default(), Vec::new()).unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn copy_tree_keeps_nested_folders() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("CD1")).unwrap();
        fs::write(src.join("CD1").join("01.flac"), b"fLaC").unwrap();
        fs::write(src.join("scan.pdf"), b"%PDF").unwrap();

        let dst = dir.path().join("dst");
        copy_tree(&src, &dst).unwrap();
        assert_eq!(fs::read(dst.join("CD1").join("01.flac")).unwrap(), b"fLaC");
        assert!(dst.join("scan.pdf").exists());
    }
}
