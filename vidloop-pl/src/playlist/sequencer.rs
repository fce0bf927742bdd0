//! Sequencer
//!
//! Decides which movie plays next over a fixed, ordered movie list.
//!
//! Selection order on every fetch:
//! 1. A pending override (set by `set_next` / `seek`) wins and is consumed
//! 2. Random mode picks any position
//! 3. Sequential mode advances by one, wrapping, optionally resuming from
//!    and persisting to a resume record
//!
//! Any manual selection also resets play counts and marks the movie being
//! left behind as finished, so rotation never bounces straight back to it.

use super::buttons::{self, ButtonToken};
use super::movie::Movie;
use super::random::{EntropyRandom, RandomSource};
use super::resume::{FileResumeStore, ResumeStore};
use crate::error::{Error, Result};
use tracing::{debug, info, warn};
use vidloop_common::config::DEFAULT_RESUME_FILE;

/// What `set_next` should schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextTarget<'a> {
    /// A movie equal (by source) to one in the list
    Movie(&'a Movie),
    /// Display name, `+n`/`-n` relative offset, or button keyword
    Token(&'a str),
    /// Absolute position
    Index(usize),
    /// Drop any pending override
    Clear,
}

impl<'a> From<&'a Movie> for NextTarget<'a> {
    fn from(movie: &'a Movie) -> Self {
        NextTarget::Movie(movie)
    }
}

impl<'a> From<&'a str> for NextTarget<'a> {
    fn from(token: &'a str) -> Self {
        NextTarget::Token(token)
    }
}

impl<'a> From<&'a String> for NextTarget<'a> {
    fn from(token: &'a String) -> Self {
        NextTarget::Token(token.as_str())
    }
}

impl From<usize> for NextTarget<'_> {
    fn from(index: usize) -> Self {
        NextTarget::Index(index)
    }
}

impl<'a, T: Into<NextTarget<'a>>> From<Option<T>> for NextTarget<'a> {
    fn from(target: Option<T>) -> Self {
        target.map_or(NextTarget::Clear, Into::into)
    }
}

/// Stateful chooser of the next movie
///
/// Owns the movie list for the whole playback session. All mutation goes
/// through `&mut self`; callers with several input sources must funnel them
/// into one owner (see `control::ControlLoop`).
pub struct Sequencer {
    /// Fixed, ordered movie list
    movies: Vec<Movie>,

    /// Last served position (None before the first fetch)
    index: Option<usize>,

    /// One-shot override consumed by the next fetch
    pending: Option<usize>,

    resume_store: Box<dyn ResumeStore + Send>,
    random: Box<dyn RandomSource + Send>,
}

impl Sequencer {
    /// Create a sequencer with a file resume record in the working
    /// directory and an entropy-seeded random source
    pub fn new(movies: Vec<Movie>) -> Self {
        info!("Sequencer created with {} movies", movies.len());
        Self {
            movies,
            index: None,
            pending: None,
            resume_store: Box::new(FileResumeStore::new(DEFAULT_RESUME_FILE)),
            random: Box::new(EntropyRandom::new()),
        }
    }

    /// Replace the resume record backend
    pub fn with_resume_store(mut self, store: impl ResumeStore + Send + 'static) -> Self {
        self.resume_store = Box::new(store);
        self
    }

    /// Replace the random source
    pub fn with_random(mut self, random: impl RandomSource + Send + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Get the next movie; loops to the start after the end
    ///
    /// Returns None only for an empty list. With `resume`, sequential
    /// fetches read the record once (starting one past the stored index)
    /// and overwrite it on every fetch. Random fetches and overrides are
    /// never persisted.
    pub fn get_next(&mut self, is_random: bool, resume: bool) -> Option<&Movie> {
        if self.movies.is_empty() {
            debug!("get_next on empty playlist");
            return None;
        }

        if let Some(next) = self.pending.take() {
            debug!(index = next, "Serving pending override");
            self.index = Some(next);
            return self.movies.get(next);
        }

        let len = self.movies.len();
        let index = if is_random {
            self.random.below(len)
        } else {
            let last = self.index;
            let mut index = match last {
                Some(current) => current + 1,
                None if resume => self.restore_index(),
                None => 0,
            };
            if index >= len {
                index = 0;
            }
            if resume {
                self.persist_index(index);
            }
            index
        };

        self.index = Some(index);
        self.movies.get(index)
    }

    /// Repeat-aware rotation
    ///
    /// Replays the current movie until its repeat quota is satisfied, then
    /// clears its count and fetches the next one. A pending override always
    /// rotates immediately.
    pub fn advance(&mut self, is_random: bool, resume: bool) -> Option<&Movie> {
        if self.pending.is_none() {
            if let Some(current) = self.index {
                if !self.movies[current].is_exhausted() {
                    debug!(index = current, "Repeat quota not met, replaying");
                    return self.movies.get(current);
                }
            }
        }

        if let Some(current) = self.index.and_then(|i| self.movies.get_mut(i)) {
            current.clear_playcount();
        }
        self.get_next(is_random, resume)
    }

    /// Schedule the next movie manually
    ///
    /// Returns whether an override was scheduled. Unknown tokens and
    /// out-of-range indices schedule nothing. On every call, matched or not,
    /// all play counts are cleared and the current movie is marked finished.
    ///
    /// A `NextTarget::Movie` must not borrow from this sequencer; pass a
    /// clone of an entry from `movies()`.
    pub fn set_next<'a>(&mut self, target: impl Into<NextTarget<'a>>) -> bool {
        let target = target.into();
        let resolved = match target {
            NextTarget::Movie(movie) => self.movies.iter().position(|m| m == movie),
            NextTarget::Index(index) => (index < self.movies.len()).then_some(index),
            NextTarget::Token(token) => self.resolve_token(token),
            NextTarget::Clear => {
                self.pending = None;
                None
            }
        };

        match resolved {
            Some(position) => {
                debug!(?target, index = position, "Override scheduled");
                self.pending = Some(position);
            }
            None if target != NextTarget::Clear => {
                debug!(?target, "Override target not matched");
            }
            None => debug!("Override cleared"),
        }

        self.clear_all_playcounts();
        if let Some(current) = self.index.and_then(|i| self.movies.get_mut(i)) {
            current.finish_playing();
        }

        resolved.is_some()
    }

    /// Schedule the movie `amount` positions from the current one
    pub fn seek(&mut self, amount: i64) -> Result<bool> {
        if self.movies.is_empty() {
            return Err(Error::EmptyPlaylist);
        }
        let current = self.index.ok_or(Error::NotStarted)?;
        let target = wrap_offset(current, amount, self.movies.len());
        Ok(self.set_next(NextTarget::Index(target)))
    }

    /// Record that the current movie finished playing
    pub fn mark_current_played(&mut self) {
        if let Some(current) = self.index.and_then(|i| self.movies.get_mut(i)) {
            current.was_played();
        }
    }

    pub fn clear_all_playcounts(&mut self) {
        for movie in &mut self.movies {
            movie.clear_playcount();
        }
    }

    /// Number of movies
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// Movie at the last served position
    pub fn current(&self) -> Option<&Movie> {
        self.index.and_then(|i| self.movies.get(i))
    }

    /// Position scheduled for the next fetch, if any
    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    fn resolve_token(&mut self, token: &str) -> Option<usize> {
        let candidate = ButtonToken::parse(token)
            .and_then(|button| buttons::candidate_for(button, self.random.as_mut()));

        if let Some(position) = self.position_by_name(token) {
            return Some(position);
        }
        if let Some(position) = self.resolve_relative(token) {
            return Some(position);
        }
        candidate.and_then(|name| self.position_by_name(&name))
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.movies.iter().position(|m| m == name)
    }

    fn resolve_relative(&self, token: &str) -> Option<usize> {
        if !token.starts_with(['+', '-']) {
            return None;
        }
        let offset: i64 = match token.parse() {
            Ok(offset) => offset,
            Err(_) => {
                debug!(token, "Not a relative offset");
                return None;
            }
        };
        let Some(current) = self.index else {
            warn!(token, "Relative override before playback started, ignored");
            return None;
        };
        Some(wrap_offset(current, offset, self.movies.len()))
    }

    fn restore_index(&mut self) -> usize {
        match self.resume_store.load() {
            Ok(Some(last)) => {
                info!(last, "Resuming after stored index");
                last.saturating_add(1)
            }
            Ok(None) => {
                debug!("No resume record, starting at 0");
                0
            }
            Err(e) => {
                warn!("Resume record unreadable, starting at 0: {}", e);
                0
            }
        }
    }

    fn persist_index(&mut self, index: usize) {
        if let Err(e) = self.resume_store.store(index) {
            warn!(index, "Failed to persist resume index: {}", e);
        }
    }
}

/// `(current + offset) mod len`, always non-negative; `len` must be > 0
///
/// Summed in i128 so any i64 offset is exact.
fn wrap_offset(current: usize, offset: i64, len: usize) -> usize {
    let len = len as i128;
    (current as i128 + offset as i128).rem_euclid(len) as usize
}
