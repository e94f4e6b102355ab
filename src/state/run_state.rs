//! Crawl run state definitions
//!
//! A single BFS engine instance moves through these states exactly once.

use crate::WeaveError;
use std::fmt;

/// Represents the lifecycle stage of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Engine constructed, frontier not yet seeded
    Init,

    /// Frontier seeded and being drained
    Running,

    /// Frontier empty; the crawl result is frozen
    Done,
}

impl RunState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is the single legal successor of this state
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Running) | (Self::Running, Self::Done)
        )
    }

    /// Performs a checked transition
    pub fn transition(&mut self, next: RunState) -> Result<(), WeaveError> {
        if !self.can_transition_to(next) {
            return Err(WeaveError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// Short lowercase label used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
