//! Word-by-word matching for a single round.
//!
//! A round splits its quote on single spaces and the player types one word at
//! a time. Each change to the input is judged against the current word only:
//! exact equality completes it, a prefix is still on track, anything else is
//! an error. Targets are the bare words; a separator the player types is
//! dropped by the caller and never reaches the session.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};

/// Identifies one round. Every call to `start_round` hands out a new one,
/// and evaluations carrying an older id are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundId(u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Status {
    InProgress,
    Error,
    WordComplete,
    RoundComplete,
}

/// Outcome of judging one input change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub status: Status,
    /// Index of the word the player should be typing after this evaluation.
    /// Equals the word count once the round is complete.
    pub active_index: usize,
    /// Only present on `RoundComplete`
    pub elapsed: Option<Duration>,
}

impl Evaluation {
    pub fn elapsed_millis(&self) -> Option<u128> {
        self.elapsed.map(|e| e.as_millis())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no round has been started")]
    NotStarted,
    #[error("round {stale} was replaced by round {current}")]
    StaleRound { stale: RoundId, current: RoundId },
    #[error("round {0} is already complete")]
    RoundComplete(RoundId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress(usize),
    Complete,
}

/// The one live round: its words, the word in progress and when it began
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    clock: C,
    words: Vec<String>,
    current_word: usize,
    started_at: Option<Instant>,
    generation: u64,
}

impl Session<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            words: Vec::new(),
            current_word: 0,
            started_at: None,
            generation: 0,
        }
    }

    /// Replace whatever round was live with a fresh one on `quote`.
    pub fn start_round(&mut self, quote: &str) -> (RoundId, &[String]) {
        self.generation += 1;
        self.words = quote.split(' ').map(str::to_string).collect();
        self.current_word = 0;
        self.started_at = Some(self.clock.now());

        debug!(
            round = self.generation,
            words = self.words.len(),
            "round started"
        );

        (RoundId(self.generation), &self.words)
    }

    /// Judge the full current contents of the input against the word in
    /// progress. Only a completed word moves the round forward.
    pub fn evaluate_input(
        &mut self,
        round: RoundId,
        current: &str,
    ) -> Result<Evaluation, SessionError> {
        let Some(started_at) = self.started_at else {
            return Err(SessionError::NotStarted);
        };

        let live = RoundId(self.generation);
        if round != live {
            return Err(SessionError::StaleRound {
                stale: round,
                current: live,
            });
        }

        let Some(target) = self.words.get(self.current_word) else {
            return Err(SessionError::RoundComplete(live));
        };

        if current == target {
            self.current_word += 1;

            if self.current_word == self.words.len() {
                let elapsed = self.clock.now().saturating_duration_since(started_at);
                info!(
                    round = self.generation,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "round complete"
                );
                return Ok(Evaluation {
                    status: Status::RoundComplete,
                    active_index: self.current_word,
                    elapsed: Some(elapsed),
                });
            }

            debug!(
                round = self.generation,
                next = self.current_word,
                "word complete"
            );
            return Ok(self.evaluation(Status::WordComplete));
        }

        let status = if target.starts_with(current) {
            Status::InProgress
        } else {
            Status::Error
        };
        Ok(self.evaluation(status))
    }

    fn evaluation(&self, status: Status) -> Evaluation {
        Evaluation {
            status,
            active_index: self.current_word,
            elapsed: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.started_at {
            None => Phase::NotStarted,
            Some(_) if self.current_word >= self.words.len() => Phase::Complete,
            Some(_) => Phase::InProgress(self.current_word),
        }
    }

    /// Id of the live round, if any round was ever started
    pub fn round(&self) -> Option<RoundId> {
        self.started_at.map(|_| RoundId(self.generation))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn current_word(&self) -> usize {
        self.current_word
    }

    pub fn target(&self) -> Option<&str> {
        match self.phase() {
            Phase::InProgress(idx) => Some(self.words[idx].as_str()),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }
}
