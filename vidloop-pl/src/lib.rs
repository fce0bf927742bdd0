//! # vidloop Playlist Library (vidloop-pl)
//!
//! Decides which movie a looping video player shows next.
//!
//! **Purpose:** Sequential, random and manually overridden selection over a
//! fixed movie list, repeat quotas per movie, and a persisted resume
//! position. Rendering, file discovery and button hardware live elsewhere.

pub mod control;
pub mod error;
pub mod playlist;

pub use error::{Error, Result};
pub use playlist::{Movie, NextTarget, Sequencer};
