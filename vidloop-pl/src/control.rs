//! Control loop
//!
//! Owns the `Sequencer` for the whole session. Input (stdin, buttons) runs
//! on other tasks and reaches the loop only through an mpsc channel, so
//! every sequencer mutation happens in one place.
//!
//! Playback itself is external; the loop models it as a fixed-length
//! timer. Each expiry counts as one completed play.

use crate::playlist::{Movie, NextTarget, Sequencer};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Input delivered to the control loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stop the current movie and move one position forward
    Skip,
    /// Current movie finished playing
    Played,
    /// Jump relative to the current position
    Seek(i64),
    /// Jump to an absolute position
    Goto(usize),
    /// Drop any scheduled override
    Clear,
    /// Movie name, `+n`/`-n` or button keyword
    Select(String),
    /// Leave the loop
    Quit,
}

impl Command {
    /// Parse one input line; blank lines and malformed numbers yield None
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "next" | "skip" if rest.is_empty() => Some(Command::Skip),
            "played" if rest.is_empty() => Some(Command::Played),
            "clear" if rest.is_empty() => Some(Command::Clear),
            "quit" | "exit" if rest.is_empty() => Some(Command::Quit),
            "seek" => match rest.parse() {
                Ok(amount) => Some(Command::Seek(amount)),
                Err(_) => {
                    warn!("seek needs a signed integer, got {:?}", rest);
                    None
                }
            },
            "goto" => match rest.parse() {
                Ok(index) => Some(Command::Goto(index)),
                Err(_) => {
                    warn!("goto needs an index, got {:?}", rest);
                    None
                }
            },
            _ => Some(Command::Select(line.to_string())),
        }
    }
}

/// Selection policy and simulated play length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    pub random: bool,
    pub resume: bool,
    pub play_duration: Duration,
}

/// What a handled command did to playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// State may have changed; current movie keeps playing
    Continue,
    /// A new movie started; restart the playback timer
    Started,
    /// Leave the loop
    Stop,
}

/// Single owner of the sequencer
pub struct ControlLoop {
    sequencer: Sequencer,
    options: PlaybackOptions,
}

impl ControlLoop {
    pub fn new(sequencer: Sequencer, options: PlaybackOptions) -> Self {
        Self { sequencer, options }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Rotate to whatever should play now and announce it
    pub fn play_next(&mut self) -> Option<&Movie> {
        let movie = self
            .sequencer
            .advance(self.options.random, self.options.resume)?;
        info!(movie = %movie, source = movie.source(), "Playing");
        Some(movie)
    }

    /// Count the current play and rotate
    pub fn playback_finished(&mut self) -> Option<&Movie> {
        self.sequencer.mark_current_played();
        self.play_next()
    }

    /// Apply one command
    pub fn handle(&mut self, command: Command) -> Flow {
        debug!(?command, "Command received");
        let interrupt = match command {
            Command::Quit => return Flow::Stop,
            Command::Played => {
                return match self.playback_finished() {
                    Some(_) => Flow::Started,
                    None => Flow::Continue,
                };
            }
            Command::Skip => {
                if self.sequencer.current_index().is_some() {
                    self.seek(1)
                } else {
                    true
                }
            }
            Command::Seek(amount) => self.seek(amount),
            Command::Goto(index) => self.sequencer.set_next(NextTarget::Index(index)),
            Command::Select(token) => self.sequencer.set_next(token.as_str()),
            Command::Clear => {
                self.sequencer.set_next(NextTarget::Clear);
                false
            }
        };

        if !interrupt {
            return Flow::Continue;
        }
        match self.play_next() {
            Some(_) => Flow::Started,
            None => Flow::Continue,
        }
    }

    fn seek(&mut self, amount: i64) -> bool {
        match self.sequencer.seek(amount) {
            Ok(scheduled) => scheduled,
            Err(e) => {
                warn!(amount, "Seek rejected: {}", e);
                false
            }
        }
    }

    /// Run until `Quit`
    ///
    /// Returns immediately for an empty playlist. A closed input channel
    /// leaves the timer-driven rotation running.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Self {
        if self.play_next().is_none() {
            warn!("Playlist is empty, nothing to play");
            return self;
        }

        let period = self.options.play_duration;
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut input_open = true;

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.playback_finished();
                }
                command = commands.recv(), if input_open => match command {
                    Some(command) => match self.handle(command) {
                        Flow::Stop => break,
                        Flow::Started => timer.reset(),
                        Flow::Continue => {}
                    },
                    None => {
                        info!("Input closed, continuing timed playback");
                        input_open = false;
                    }
                },
            }
        }

        info!("Control loop stopped");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::random::ScriptedRandom;
    use crate::playlist::MemoryResumeStore;

    fn control(repeats: &[u32]) -> ControlLoop {
        let movies = repeats
            .iter()
            .enumerate()
            .map(|(i, &r)| Movie::new(format!("/media/usb/m{}.mp4", i), None, r))
            .collect();
        let sequencer = Sequencer::new(movies)
            .with_resume_store(MemoryResumeStore::new())
            .with_random(ScriptedRandom::default());
        ControlLoop::new(
            sequencer,
            PlaybackOptions {
                random: false,
                resume: false,
                play_duration: Duration::from_secs(3600),
            },
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("next"), Some(Command::Skip));
        assert_eq!(Command::parse("  skip "), Some(Command::Skip));
        assert_eq!(Command::parse("played"), Some(Command::Played));
        assert_eq!(Command::parse("seek -3"), Some(Command::Seek(-3)));
        assert_eq!(Command::parse("seek +2"), Some(Command::Seek(2)));
        assert_eq!(Command::parse("goto 4"), Some(Command::Goto(4)));
        assert_eq!(Command::parse("clear"), Some(Command::Clear));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(
            Command::parse("button2"),
            Some(Command::Select("button2".to_string()))
        );
        assert_eq!(Command::parse("-1"), Some(Command::Select("-1".to_string())));
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("seek far"), None);
        assert_eq!(Command::parse("goto -1"), None);
    }

    #[test]
    fn test_repeat_quota_then_rotate() {
        let mut control = control(&[2, 1]);
        assert_eq!(control.play_next().map(Movie::display_name), Some("m0.mp4"));

        // First completed play: quota of 2 not yet met
        let movie = control.playback_finished().map(|m| m.display_name().to_string());
        assert_eq!(movie.as_deref(), Some("m0.mp4"));

        let movie = control.playback_finished().map(|m| m.display_name().to_string());
        assert_eq!(movie.as_deref(), Some("m1.mp4"));
        assert_eq!(control.sequencer().movies()[0].play_count(), 0);
    }

    #[test]
    fn test_select_interrupts_playback() {
        let mut control = control(&[1, 1, 1, 1]);
        control.play_next();
        assert_eq!(control.handle(Command::Select("m3.mp4".to_string())), Flow::Started);
        assert_eq!(control.sequencer().current_index(), Some(3));
    }

    #[test]
    fn test_override_leaves_repeating_movie() {
        let mut control = control(&[5, 1, 1]);
        control.play_next();
        control.playback_finished();
        assert_eq!(control.sequencer().current_index(), Some(0));

        assert_eq!(control.handle(Command::Goto(2)), Flow::Started);
        assert_eq!(control.sequencer().current_index(), Some(2));
        // Finished sentinel forced the rotation; rotating clears it
        assert_eq!(control.sequencer().movies()[0].play_count(), 0);
    }

    #[test]
    fn test_unmatched_select_keeps_playing() {
        let mut control = control(&[1, 1]);
        control.play_next();
        assert_eq!(control.handle(Command::Select("nope.mp4".to_string())), Flow::Continue);
        assert_eq!(control.sequencer().current_index(), Some(0));
    }

    #[test]
    fn test_skip_and_seek() {
        let mut control = control(&[3, 1, 1]);
        assert_eq!(control.handle(Command::Skip), Flow::Started);
        assert_eq!(control.sequencer().current_index(), Some(0));

        assert_eq!(control.handle(Command::Skip), Flow::Started);
        assert_eq!(control.sequencer().current_index(), Some(1));

        assert_eq!(control.handle(Command::Seek(-2)), Flow::Started);
        assert_eq!(control.sequencer().current_index(), Some(2));
    }

    #[test]
    fn test_seek_before_start_is_rejected() {
        let mut control = control(&[1, 1]);
        assert_eq!(control.handle(Command::Seek(1)), Flow::Continue);
        assert_eq!(control.sequencer().current_index(), None);
    }

    #[tokio::test]
    async fn test_run_processes_commands_until_quit() {
        let control = control(&[1, 1, 1]);
        let (tx, rx) = mpsc::channel(8);
        tx.send(Command::Goto(2)).await.unwrap();
        tx.send(Command::Clear).await.unwrap();
        tx.send(Command::Quit).await.unwrap();

        let control = control.run(rx).await;
        assert_eq!(control.sequencer().current_index(), Some(2));
        assert_eq!(control.sequencer().pending(), None);
    }

    #[tokio::test]
    async fn test_run_returns_for_empty_playlist() {
        let sequencer = Sequencer::new(Vec::new()).with_resume_store(MemoryResumeStore::new());
        let control = ControlLoop::new(
            sequencer,
            PlaybackOptions {
                random: false,
                resume: false,
                play_duration: Duration::from_secs(1),
            },
        );
        let (_tx, rx) = mpsc::channel(1);
        let control = control.run(rx).await;
        assert_eq!(control.sequencer().current_index(), None);
    }
}
