//! Playlist core
//!
//! - `movie`: one playable item and its play count
//! - `sequencer`: next-movie selection and manual overrides
//! - `buttons`: category button tokens that synthesise movie names
//! - `resume`: persisted sequential position
//! - `random`: injectable randomness

pub mod buttons;
pub mod movie;
pub mod random;
pub mod resume;
pub mod sequencer;

pub use movie::Movie;
pub use random::{EntropyRandom, RandomSource};
#[cfg(any(test, feature = "test-util"))]
pub use random::ScriptedRandom;
pub use resume::{FileResumeStore, MemoryResumeStore, ResumeStore};
pub use sequencer::{NextTarget, Sequencer};
