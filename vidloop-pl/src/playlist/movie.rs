//! Movie: one playable item
//!
//! Identity (source, display name, title, repeat limit) is fixed at
//! construction; only the play count changes during a run.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use vidloop_common::config::MovieEntry;

/// One playable target plus its play count for the current repeat cycle
#[derive(Debug, Clone)]
pub struct Movie {
    /// Playable target (path or URI)
    source: String,

    /// Base filename of `source`, used for name lookups and display
    display_name: String,

    /// Optional human label
    title: Option<String>,

    /// Consecutive plays before rotation advances past this movie (>= 1)
    repeat_limit: u32,

    /// Plays in the current repeat cycle
    play_count: u32,
}

impl Movie {
    /// Create a movie; a repeat limit of 0 is raised to 1
    pub fn new(source: impl Into<String>, title: Option<String>, repeat_limit: u32) -> Self {
        let source = source.into();
        let display_name = Path::new(&source)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.clone());

        Self {
            source,
            display_name,
            title,
            repeat_limit: repeat_limit.max(1),
            play_count: 0,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn repeat_limit(&self) -> u32 {
        self.repeat_limit
    }

    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Record one completed playback
    ///
    /// Single-repeat movies pin the count at 1 so a player looping for days
    /// never grows the counter.
    pub fn was_played(&mut self) {
        if self.repeat_limit > 1 {
            self.play_count = self.play_count.saturating_add(1);
        } else {
            self.play_count = 1;
        }
    }

    pub fn clear_playcount(&mut self) {
        self.play_count = 0;
    }

    /// Mark as exhausted until the next reset
    pub fn finish_playing(&mut self) {
        self.play_count = self.repeat_limit.saturating_add(1);
    }

    /// True once the repeat quota for this cycle is satisfied
    pub fn is_exhausted(&self) -> bool {
        self.play_count >= self.repeat_limit
    }
}

impl From<&MovieEntry> for Movie {
    fn from(entry: &MovieEntry) -> Self {
        Movie::new(entry.path.clone(), entry.title.clone(), entry.repeats)
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Movie {}

// Name lookups: a bare string matches the display name, not the source.
impl PartialEq<str> for Movie {
    fn eq(&self, other: &str) -> bool {
        self.display_name == other
    }
}

impl PartialEq<&str> for Movie {
    fn eq(&self, other: &&str) -> bool {
        self.display_name == *other
    }
}

impl PartialEq<String> for Movie {
    fn eq(&self, other: &String) -> bool {
        self.display_name == *other
    }
}

impl PartialOrd for Movie {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Movie {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source.cmp(&other.source)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", self.display_name, title),
            None => write!(f, "{}", self.display_name),
        }
    }
}
