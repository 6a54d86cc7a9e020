use std::fmt::Write as _;

use super::album::Album;
use super::audio_file::AudioFile;

/// Plain column layout: every column padded to its widest cell, two spaces
/// between columns, trailing blanks trimmed.
pub fn render_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.as_ref().chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    let mut line = |cells: Vec<&str>| {
        let mut text = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                text.push_str("  ");
            }
            let pad = widths[i].saturating_sub(cell.chars().count());
            text.push_str(cell);
            text.extend(std::iter::repeat_n(' ', pad));
        }
        out.push_str(text.trim_end());
        out.push('\n');
    };

    if !headers.is_empty() {
        line(headers.to_vec());
    }
    for row in rows {
        line(row.iter().map(AsRef::as_ref).collect());
    }
    out
}

fn or_none(value: Option<&str>) -> String {
    value.unwrap_or("None").to_string()
}

fn file_row(file: &AudioFile) -> Vec<String> {
    vec![
        if file.track == 0 {
            "None".to_string()
        } else {
            file.track.to_string()
        },
        or_none(file.artist.as_deref()),
        or_none(file.title.as_deref()),
        file.has_album_art.to_string(),
        file.file_name(),
    ]
}

const TRACK_HEADERS: [&str; 5] = ["Track", "Artist", "Title", "Cover", "Filename"];

/// Folder, consensus values, warnings and the track table of one album.
pub fn render_album(album: &Album) -> String {
    let mut out = String::new();
    let readiness = album.readiness();

    let _ = writeln!(out);
    let _ = writeln!(out, "Folder : {}", album.folder_name());
    let _ = writeln!(out, "Album Artist : {}", or_none(album.album_artist().as_deref()));
    let _ = writeln!(out, "Album : {}", or_none(album.album_name().as_deref()));
    let warnings = readiness.warnings();
    if !warnings.is_empty() {
        let quoted: Vec<String> = warnings.iter().map(|w| format!("\"{w}\"")).collect();
        let _ = writeln!(out, "Warning : {}", quoted.join(", "));
    }
    let _ = writeln!(out, "Ready to copy : {}", readiness.is_ready());
    let _ = writeln!(out, "Copy target : {}", album.copy_target());

    let discs = album.discs();
    if discs.len() > 1 {
        for (disc, files) in discs {
            let found = ["CD", "Disc "]
                .iter()
                .any(|prefix| album.path().join(format!("{prefix}{disc}")).exists());
            if found {
                let _ = writeln!(out, "Disc {disc}");
            } else {
                let _ = writeln!(out, "Disc {disc} NOT FOUND");
            }
            let rows: Vec<Vec<String>> = files.into_iter().map(file_row).collect();
            out.push_str(&render_table(&TRACK_HEADERS, &rows));
        }
    } else {
        let mut files: Vec<&AudioFile> = album.files().iter().collect();
        files.sort_by_key(|f| f.track);
        let rows: Vec<Vec<String>> = files.into_iter().map(file_row).collect();
        out.push_str(&render_table(&TRACK_HEADERS, &rows));
    }
    out
}

/// Complete albums, then incomplete albums with the failing checks.
pub fn render_summary<'a>(albums: impl IntoIterator<Item = &'a Album>) -> String {
    let mut complete = Vec::new();
    let mut incomplete = Vec::new();
    for album in albums {
        let artist = or_none(album.album_artist().as_deref());
        let name = or_none(album.album_name().as_deref());
        let readiness = album.readiness();
        if readiness.is_ready() {
            complete.push(vec![artist, name]);
        } else {
            incomplete.push(vec![
                artist,
                name,
                readiness.has_all_tags.to_string(),
                readiness.has_album_art.to_string(),
                readiness.no_unwanted_files.to_string(),
                readiness.not_in_library.to_string(),
            ]);
        }
    }

    let mut out = render_table(&["Album Artist", "Album"], &complete);
    out.push('\n');
    if !incomplete.is_empty() {
        out.push_str(&render_table(
            &[
                "Album Artist",
                "Album",
                "Has All Tags",
                "Has Album Art",
                "No Unwanted Files",
                "Not In Library",
            ],
            &incomplete,
        ));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns_and_trims_line_ends() {
        let rows = vec![vec!["1", "Intro"], vec!["10", "A"]];
        let out = render_table(&["No", "Title"], &rows);
        assert_eq!(out, "No  Title\n1   Intro\n10  A\n");
    }

    #[test]
    fn table_counts_characters_not_bytes() {
        let rows = vec![vec!["Björk", "x"]];
        let out = render_table(&["Name", "V"], &rows);
        assert_eq!(out, "Name   V\nBjörk  x\n");
    }
}
