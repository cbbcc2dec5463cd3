use std::borrow::Cow;

use bytes::Bytes;

/// One occurrence of a pattern in the input, plus the text around it on the
/// line where it starts.
///
/// Offsets are byte offsets into the input (`end_offset` exclusive); lines and
/// columns are 1-based. `end_line`/`end_col` locate the last matched byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    start_offset: usize,
    end_offset: usize,
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
    matched_text: Bytes,
    context_before: Bytes,
    context_after: Bytes,
}

impl Match {
    pub(crate) fn new(
        (start_offset, start_line, start_col): (usize, usize, usize),
        (end_line, end_col): (usize, usize),
        matched_text: Bytes,
        context_before: Bytes,
        context_after: Bytes,
    ) -> Self {
        Match {
            start_offset,
            end_offset: start_offset + matched_text.len(),
            start_line,
            start_col,
            end_line,
            end_col,
            matched_text,
            context_before,
            context_after,
        }
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn start_col(&self) -> usize {
        self.start_col
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn end_col(&self) -> usize {
        self.end_col
    }

    pub fn matched_text(&self) -> &Bytes {
        &self.matched_text
    }

    /// Same line, before the match.
    pub fn context_before(&self) -> &Bytes {
        &self.context_before
    }

    /// Rest of the line the match ends on. Empty when the match itself ends
    /// with a newline.
    pub fn context_after(&self) -> &Bytes {
        &self.context_after
    }

    /// The matched text, with invalid UTF-8 replaced.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.matched_text)
    }
}
