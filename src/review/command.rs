/// One parsed line of the review prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Move on without saving.
    Continue,
    /// Save, archive when ready, move on.
    Next,
    Refresh,
    Save,
    Show,
    Delete,
    Capitalize,
    Print,
    /// Album artist into every track artist.
    CopyAlbumArtist,
    /// Folder `Artist - Album` into album artist and name.
    FolderToAlbum,
    /// File name into every title.
    FileToTitle,
    Renumber,
    Help,
    SetAlbum(String),
    SetAlbumArtist(String),
    /// `ta <range> <artist>`
    TrackArtist(String),
    /// `tt <range> <title>`
    TrackTitle(String),
    /// `rea <regex>`: keep capture group 1 of every artist.
    RetainArtist(String),
    /// `ret <regex>`: keep capture group 1 of every title.
    RetainTitle(String),
    /// `ref <pattern>` with `%{track}`, `%{artist}`, `%{title}` placeholders.
    FilePattern(String),
    /// `ted <range|*> "<src>" "<dst>"`
    TitleEdit(String),
    Unknown(String),
}

type Build = fn(String) -> Command;

/// Whole-line commands, checked first.
pub const EXACT: &[(&[&str], Command, &str)] = &[
    (&["q", "quit"], Command::Quit, "quit"),
    (&["c", "cont", ""], Command::Continue, "continue without saving"),
    (&["n", "next"], Command::Next, "save and continue"),
    (&["r", "refresh"], Command::Refresh, "refresh the content of this album"),
    (&["s", "save"], Command::Save, "save changes"),
    (&["sh", "show"], Command::Show, "show the album content"),
    (&["d", "delete"], Command::Delete, "delete the album from the filesystem"),
    (&["k", "capitalize"], Command::Capitalize, "capitalize all text fields"),
    (&["p", "print"], Command::Print, "print the absolute path of the album"),
    (&["cp", "copy"], Command::CopyAlbumArtist, "copy the album artist to the artist in all files"),
    (&["fo", "folder"], Command::FolderToAlbum, "use the folder name to set the album artist and album name"),
    (&["fi", "file"], Command::FileToTitle, "copy the file name to the title of all files"),
    (&["tr", "track"], Command::Renumber, "renumber the tracks of each disc"),
    (&["h", "help"], Command::Help, "show this help"),
];

/// Prefix commands, tried in order; the rest of the line is the argument.
pub const PREFIX: &[(&[&str], Build, &str)] = &[
    (&["atva"], |_| Command::SetAlbumArtist(crate::library::VARIOUS_ARTISTS.to_string()), "set the album artist to Various Artists"),
    (&["album", "ab"], Command::SetAlbum, "set the album name: ab <name>"),
    (&["artist", "at"], Command::SetAlbumArtist, "set the album artist: at <name>"),
    (&["ta"], Command::TrackArtist, "set the artist of tracks: ta 1-3/2 <artist>"),
    (&["tt"], Command::TrackTitle, "set the title of tracks: tt 4 <title>"),
    (&["rea"], Command::RetainArtist, r"retain part of every artist: rea (.*) feat\..*"),
    (&["ret"], Command::RetainTitle, r"retain part of every title: ret \d* - (.*) \(.*"),
    (&["ref"], Command::FilePattern, "set tags from the file name: ref %{track} %{artist} - %{title}"),
    (&["ted"], Command::TitleEdit, r#"edit titles: ted 1-3/2 "%{first} - %{second}" "%{second} - %{first}""#),
];

impl Command {
    pub fn parse(line: &str) -> Self {
        for (keys, command, _) in EXACT {
            if keys.contains(&line) {
                return command.clone();
            }
        }
        for (keys, build, _) in PREFIX {
            for key in *keys {
                if let Some(rest) = line.strip_prefix(key) {
                    let rest = rest.strip_prefix(' ').unwrap_or(rest);
                    return build(rest.to_string());
                }
            }
        }
        Self::Unknown(line.to_string())
    }
}

/// Keywords listed in the prompt.
pub fn prompt_keys() -> String {
    EXACT
        .iter()
        .filter_map(|(keys, _, _)| keys.first().copied())
        .chain(PREFIX.iter().flat_map(|(keys, _, _)| keys.iter().copied()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Rows of the help table.
pub fn help_rows() -> Vec<Vec<String>> {
    EXACT
        .iter()
        .map(|(keys, _, desc)| (*keys, *desc))
        .chain(PREFIX.iter().map(|(keys, _, desc)| (*keys, *desc)))
        .map(|(keys, desc)| {
            let keys: Vec<&str> = keys.iter().map(|k| if k.is_empty() { "''" } else { *k }).collect();
            vec![keys.join(", "), desc.to_string()]
        })
        .collect()
}
