use std::sync::LazyLock;

use regex::Regex;

/// Inclusive run of track numbers on one disc.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrackRange {
    pub start: u32,
    pub stop: u32,
    pub disc: u32,
}

/// Tracks addressed by a command: every file, or a range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Range(TrackRange),
}

// (pattern, has stop, has disc), most specific first.
static FORMS: LazyLock<Vec<(Regex, bool, bool)>> = LazyLock::new(|| {
    [
        (r"^(\d+)-(\d+)/(\d+)$", true, true),
        (r"^(\d+)/(\d+)$", false, true),
        (r"^(\d+)-(\d+)$", true, false),
        (r"^(\d+)$", false, false),
    ]
    .into_iter()
    .map(|(re, stop, disc)| (Regex::new(re).expect("valid regex"), stop, disc))
    .collect()
});

impl TrackRange {
    /// Parse `start-stop/disc`, `start/disc`, `start-stop` or `start`. The
    /// disc defaults to 1; `start > stop` is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        FORMS.iter().find_map(|(re, has_stop, has_disc)| {
            let caps = re.captures(text)?;
            let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
            let start = num(1)?;
            let stop = if *has_stop { num(2)? } else { start };
            let disc = match (*has_stop, *has_disc) {
                (true, true) => num(3)?,
                (false, true) => num(2)?,
                _ => 1,
            };
            (start <= stop).then_some(Self { start, stop, disc })
        })
    }

    pub fn tracks(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.stop
    }
}

impl Selection {
    pub fn parse(text: &str) -> Option<Self> {
        if text == "*" {
            return Some(Self::All);
        }
        TrackRange::parse(text).map(Self::Range)
    }
}
