use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;
use thiserror::Error;

static CORPUS_DIR: Dir = include_dir!("src/corpus");

/// Name of the corpus shipped inside the binary
pub const DEFAULT_CORPUS: &str = "holmes";

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("corpus `{0}` not found")]
    UnknownCorpus(String),
    #[error("corpus `{name}` is not valid utf-8")]
    NotUtf8 { name: String },
    #[error("corpus `{name}` is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("corpus `{0}` has no quotes")]
    EmptyCorpus(String),
    #[error("quote {index} has an empty word (check for leading, trailing or doubled spaces): {quote:?}")]
    EmptyWord { index: usize, quote: String },
}

#[derive(Deserialize, Clone, Debug)]
struct CorpusFile {
    name: String,
    quotes: Vec<String>,
}

/// A fixed, non-empty set of quotes to pick rounds from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteSource {
    name: String,
    quotes: Vec<String>,
}

impl QuoteSource {
    /// The embedded corpus. It is validated by the test suite, so failing
    /// to load it is a build defect rather than a runtime condition.
    pub fn builtin() -> Self {
        Self::load(DEFAULT_CORPUS).expect("embedded corpus is valid")
    }

    /// Load an embedded corpus by name (`<name>.json` under `src/corpus`)
    pub fn load(name: &str) -> Result<Self, QuoteError> {
        let file = CORPUS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| QuoteError::UnknownCorpus(name.to_string()))?;

        let contents = file.contents_utf8().ok_or_else(|| QuoteError::NotUtf8 {
            name: name.to_string(),
        })?;

        let corpus: CorpusFile = from_str(contents).map_err(|source| QuoteError::Malformed {
            name: name.to_string(),
            source,
        })?;

        Self::from_quotes(corpus.name, corpus.quotes)
    }

    /// Build a corpus from user supplied text, rejecting anything a round
    /// could not be played on.
    pub fn from_quotes<I, S>(name: impl Into<String>, quotes: I) -> Result<Self, QuoteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let quotes: Vec<String> = quotes.into_iter().map(Into::into).collect();

        if quotes.is_empty() {
            return Err(QuoteError::EmptyCorpus(name));
        }

        for (index, quote) in quotes.iter().enumerate() {
            check_quote(index, quote)?;
        }

        Ok(Self { name, quotes })
    }

    /// A corpus holding exactly one quote, used for `--prompt`
    pub fn single(quote: impl Into<String>) -> Result<Self, QuoteError> {
        Self::from_quotes("prompt", [quote.into()])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn pick_quote(&self) -> &str {
        self.pick_quote_with(&mut rand::thread_rng())
    }

    /// Uniform pick using the caller's rng
    pub fn pick_quote_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.quotes[rng.gen_range(0..self.quotes.len())]
    }
}

impl Default for QuoteSource {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A quote is playable when splitting it on single spaces yields no empty word
pub fn check_quote(index: usize, quote: &str) -> Result<(), QuoteError> {
    if quote.split(' ').any(str::is_empty) {
        return Err(QuoteError::EmptyWord {
            index,
            quote: quote.to_string(),
        });
    }
    Ok(())
}
