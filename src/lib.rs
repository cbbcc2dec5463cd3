//! A small grep engine.
//!
//! Patterns support literals, escapes (`\t \n \\ \. \* \| \( \) \" \'`),
//! the wildcard `.`, grouping `()`, alternation `|` and the Kleene star `*`.
//! A pattern is parsed into a [`Node`] tree, normalized, and compiled into a
//! position [`Automaton`]; searching simulates that automaton over a byte
//! stream and yields leftmost-longest, non-overlapping [`Match`]es.
//!
//! ```
//! use posgrep::Regex;
//!
//! let regex = Regex::new("ab*c").unwrap();
//! let found: Vec<_> = regex
//!     .find_all("ac abc abbbc")
//!     .iter()
//!     .map(|m| m.start_offset())
//!     .collect();
//! assert_eq!(found, vec![0, 3, 7]);
//! ```

use std::io::{self, Read};
use std::str::FromStr;

pub mod compiler;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod found;
pub mod normalize;
pub mod parser;

pub use compiler::{Automaton, PositionId, Predicate, compile};
pub use cursor::InputCursor;
pub use engine::{Matches, search};
pub use error::{PatternError, PatternErrorKind};
pub use found::Match;
pub use normalize::normalize;
pub use parser::{Node, parse};

/// A compiled pattern, reusable across any number of inputs.
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    automaton: Automaton,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Regex, PatternError> {
        let tree = normalize(&parse(pattern)?);
        Ok(Regex {
            pattern: pattern.to_owned(),
            automaton: compile(&tree),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Search a stream. Each call starts from a fresh cursor.
    pub fn search<R: Read>(&self, source: R) -> Matches<'_, R> {
        search(&self.automaton, InputCursor::new(source))
    }

    /// All matches in an in-memory string.
    pub fn find_all(&self, text: &str) -> Vec<Match> {
        // reading from a byte slice cannot fail
        self.search(text.as_bytes())
            .collect::<io::Result<Vec<_>>>()
            .unwrap_or_default()
    }
}

impl FromStr for Regex {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Regex::new(s)
    }
}
