use thiserror::Error;

/// What went wrong while reading a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    #[error("empty pattern")]
    EmptyPattern,
    #[error("unterminated escape sequence")]
    UnterminatedEscape,
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    #[error("'*' has nothing to repeat")]
    DanglingStar,
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("empty branch in alternation")]
    EmptyAlternativeBranch,
}

/// A rejected pattern, with the place in the pattern where the problem was found.
///
/// `offset` counts characters from the start of the pattern; `line` and
/// `column` are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at ({line}, {column})")]
pub struct PatternError {
    pub kind: PatternErrorKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}
