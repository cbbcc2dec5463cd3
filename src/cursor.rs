//! Byte cursor over a readable stream with line/column bookkeeping.
//!
//! Bytes pulled from the source but not yet consumed stay in a lookahead
//! buffer, so a match attempt can read ahead with [`InputCursor::peek_at`] and
//! the next attempt starts again from the cursor's offset without seeking.

use std::io::{self, Read};

use bytes::{Buf, Bytes, BytesMut};

const CHUNK_SIZE: usize = 8 * 1024;

pub struct InputCursor<R> {
    source: R,
    exhausted: bool,
    // read from `source`, not yet consumed
    lookahead: BytesMut,
    // consumed bytes of the current line
    line_prefix: BytesMut,
    offset: usize,
    line: usize,
    column: usize,
    last_line: usize,
    last_column: usize,
}

impl<R: Read> InputCursor<R> {
    pub fn new(source: R) -> Self {
        InputCursor {
            source,
            exhausted: false,
            lookahead: BytesMut::with_capacity(CHUNK_SIZE),
            line_prefix: BytesMut::new(),
            offset: 0,
            line: 1,
            column: 1,
            last_line: 1,
            last_column: 0,
        }
    }

    /// Byte offset of the next byte to be consumed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line of the next byte to be consumed.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the next byte to be consumed.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Line and column of the most recently consumed byte. A newline sits at
    /// the end of the line it terminates. Before anything is consumed this
    /// is `(1, 0)`.
    pub fn last_position(&self) -> (usize, usize) {
        (self.last_line, self.last_column)
    }

    /// Bytes consumed so far on the current line.
    pub fn line_prefix(&self) -> &[u8] {
        &self.line_prefix
    }

    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        self.peek_at(0)
    }

    /// The byte `distance` places after the cursor, without consuming anything.
    pub fn peek_at(&mut self, distance: usize) -> io::Result<Option<u8>> {
        if self.fill(distance + 1)? {
            Ok(Some(self.lookahead[distance]))
        } else {
            Ok(None)
        }
    }

    pub fn advance(&mut self) -> io::Result<Option<u8>> {
        if !self.fill(1)? {
            return Ok(None);
        }
        let byte = self.lookahead.get_u8();
        self.record(byte);
        Ok(Some(byte))
    }

    /// Consume up to `len` bytes and hand them back as one buffer.
    pub fn advance_by(&mut self, len: usize) -> io::Result<Bytes> {
        self.fill(len)?;
        let len = len.min(self.lookahead.len());
        let taken = self.lookahead.split_to(len).freeze();
        for &byte in taken.iter() {
            self.record(byte);
        }
        Ok(taken)
    }

    /// The rest of the line starting at absolute byte `offset`, without the
    /// terminating newline. Only reads ahead as far as the end of that line
    /// and consumes nothing. Offsets behind the cursor are clamped to it.
    pub fn line_suffix_from(&mut self, offset: usize) -> io::Result<Bytes> {
        let start = offset.saturating_sub(self.offset);
        let mut end = start;
        while let Some(byte) = self.peek_at(end)? {
            if byte == b'\n' {
                break;
            }
            end += 1;
        }
        if end <= start {
            return Ok(Bytes::new());
        }
        Ok(Bytes::copy_from_slice(&self.lookahead[start..end]))
    }

    fn record(&mut self, byte: u8) {
        self.last_line = self.line;
        self.last_column = self.column;
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
            self.line_prefix.clear();
        } else {
            self.column += 1;
            self.line_prefix.extend_from_slice(&[byte]);
        }
    }

    /// Make sure at least `wanted` bytes are buffered. Returns false when the
    /// source ran dry first.
    fn fill(&mut self, wanted: usize) -> io::Result<bool> {
        while self.lookahead.len() < wanted && !self.exhausted {
            let filled = self.lookahead.len();
            self.lookahead.resize(filled + CHUNK_SIZE, 0);
            match self.source.read(&mut self.lookahead[filled..]) {
                Ok(0) => {
                    self.lookahead.truncate(filled);
                    self.exhausted = true;
                }
                Ok(n) => self.lookahead.truncate(filled + n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    self.lookahead.truncate(filled);
                }
                Err(e) => {
                    self.lookahead.truncate(filled);
                    return Err(e);
                }
            }
        }
        Ok(self.lookahead.len() >= wanted)
    }
}
