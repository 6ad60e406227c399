use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::warn;

use crate::{
    clock::{Clock, SystemClock},
    quotes::{check_quote, QuoteError, QuoteSource},
    session::{Evaluation, RoundId, Session, Status},
    word_units::{highlight_word, word_units, WordUnit},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Nothing started yet; waiting for the player to ask for a quote
    Idle,
    Typing,
    Finished,
}

/// Owns the live round and everything the screen shows about it
#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub source: QuoteSource,
    pub state: AppState,
    /// Current contents of the input line
    pub input: String,
    /// Set while the input is not a prefix of the current word
    pub error: bool,
    pub message: Option<String>,
    pub units: Vec<WordUnit>,
    /// A word was just completed and nothing has been typed since
    awaiting_separator: bool,
    session: Session<C>,
    round: Option<RoundId>,
    quote: Option<String>,
    rng: StdRng,
}

impl App<SystemClock> {
    pub fn new(source: QuoteSource, seed: Option<u64>) -> Self {
        Self::with_clock(source, seed, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(source: QuoteSource, seed: Option<u64>, clock: C) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            source,
            state: AppState::Idle,
            input: String::new(),
            error: false,
            message: None,
            units: Vec::new(),
            awaiting_separator: false,
            session: Session::with_clock(clock),
            round: None,
            quote: None,
            rng,
        }
    }

    /// Start a round on a freshly picked quote
    pub fn new_quote(&mut self) {
        let quote = self.source.pick_quote_with(&mut self.rng).to_string();
        self.begin(quote);
    }

    /// Start over on the current quote, or pick one if there is none yet
    pub fn restart(&mut self) {
        match self.quote.clone() {
            Some(quote) => self.begin(quote),
            None => self.new_quote(),
        }
    }

    /// Start a round on `quote`, discarding whatever round was live. The
    /// quote is held to the same rules as a user corpus.
    pub fn start_with(&mut self, quote: String) -> Result<(), QuoteError> {
        check_quote(0, &quote)?;
        self.begin(quote);
        Ok(())
    }

    fn begin(&mut self, quote: String) {
        let (round, words) = self.session.start_round(&quote);
        self.units = word_units(words);
        highlight_word(&mut self.units, 0);

        self.round = Some(round);
        self.quote = Some(quote);
        self.input.clear();
        self.error = false;
        self.awaiting_separator = false;
        self.message = None;
        self.state = AppState::Typing;
    }

    pub fn type_char(&mut self, c: char) {
        if self.state != AppState::Typing {
            return;
        }
        // the space shown after a completed word may be typed; it is consumed
        // rather than judged against the next word
        if std::mem::take(&mut self.awaiting_separator) && c == ' ' {
            return;
        }
        self.input.push(c);
        self.on_input_changed();
    }

    pub fn backspace(&mut self) {
        if self.state != AppState::Typing || self.input.pop().is_none() {
            return;
        }
        self.awaiting_separator = false;
        self.on_input_changed();
    }

    fn on_input_changed(&mut self) {
        let Some(round) = self.round else {
            return;
        };

        match self.session.evaluate_input(round, &self.input) {
            Ok(evaluation) => self.apply(evaluation),
            Err(err) => warn!(%err, "input ignored"),
        }
    }

    fn apply(&mut self, evaluation: Evaluation) {
        match evaluation.status {
            Status::InProgress => self.error = false,
            Status::Error => self.error = true,
            Status::WordComplete => {
                self.input.clear();
                self.error = false;
                self.awaiting_separator = true;
                highlight_word(&mut self.units, evaluation.active_index);
            }
            Status::RoundComplete => {
                self.input.clear();
                self.error = false;
                highlight_word(&mut self.units, evaluation.active_index);
                self.message = evaluation.elapsed.map(completion_message);
                self.state = AppState::Finished;
            }
        }
    }

    pub fn quote(&self) -> Option<&str> {
        self.quote.as_deref()
    }

    pub fn round(&self) -> Option<RoundId> {
        self.round
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Index of the word being typed; equals the unit count once finished
    pub fn active_index(&self) -> usize {
        self.session.current_word()
    }
}

pub fn completion_message(elapsed: Duration) -> String {
    format!(
        "CONGRATULATIONS! You finished in {} seconds.",
        elapsed.as_millis() as f64 / 1000.0
    )
}
