//! Leftmost-longest search driven by the position automaton.
//!
//! An attempt starting at the cursor keeps the set of positions that may
//! match the next byte. Each byte is read once per attempt and the set never
//! holds more than `automaton.len()` entries, so there is no backtracking.

use std::io::{self, Read};

use bytes::Bytes;

use crate::compiler::{Automaton, PositionId};
use crate::cursor::InputCursor;
use crate::found::Match;

/// Lazily yields the non-overlapping matches in `cursor`, left to right.
pub fn search<R: Read>(automaton: &Automaton, cursor: InputCursor<R>) -> Matches<'_, R> {
    Matches {
        automaton,
        cursor,
        active: PositionSet::new(automaton.len()),
        next: PositionSet::new(automaton.len()),
        done: false,
    }
}

pub struct Matches<'a, R> {
    automaton: &'a Automaton,
    cursor: InputCursor<R>,
    active: PositionSet,
    next: PositionSet,
    done: bool,
}

impl<R: Read> Matches<'_, R> {
    /// Length of the longest non-empty match starting at the cursor.
    fn longest_at_cursor(&mut self) -> io::Result<Option<usize>> {
        self.active.clear();
        for &id in self.automaton.first() {
            self.active.insert(id);
        }
        let mut longest = None;
        let mut read = 0;
        while !self.active.is_empty() {
            let Some(byte) = self.cursor.peek_at(read)? else {
                break;
            };
            read += 1;
            self.next.clear();
            let mut stepped = false;
            let mut accepted = false;
            for &id in self.active.iter() {
                if !self.automaton.predicate(id).matches(byte) {
                    continue;
                }
                stepped = true;
                accepted |= self.automaton.is_last(id);
                for &follower in self.automaton.follow(id) {
                    self.next.insert(follower);
                }
            }
            if !stepped {
                break;
            }
            if accepted {
                longest = Some(read);
            }
            std::mem::swap(&mut self.active, &mut self.next);
        }
        Ok(longest)
    }

    fn take_match(&mut self, len: usize) -> io::Result<Match> {
        let start = (
            self.cursor.offset(),
            self.cursor.line(),
            self.cursor.column(),
        );
        let context_before = Bytes::copy_from_slice(self.cursor.line_prefix());
        let context_after = if self.cursor.peek_at(len - 1)? == Some(b'\n') {
            Bytes::new()
        } else {
            self.cursor.line_suffix_from(start.0 + len)?
        };
        let matched_text = self.cursor.advance_by(len)?;
        Ok(Match::new(
            start,
            self.cursor.last_position(),
            matched_text,
            context_before,
            context_after,
        ))
    }
}

impl<R: Read> Iterator for Matches<'_, R> {
    type Item = io::Result<Match>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let step = match self.cursor.peek() {
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Ok(Some(_)) => self.longest_at_cursor(),
                Err(e) => Err(e),
            };
            let found = match step {
                Ok(Some(len)) => self.take_match(len),
                Ok(None) => match self.cursor.advance() {
                    Ok(_) => continue,
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            if found.is_err() {
                self.done = true;
            }
            return Some(found);
        }
        None
    }
}

/// Set of positions with O(1) insert, membership and clear, iterated in
/// insertion order.
struct PositionSet {
    dense: Vec<PositionId>,
    sparse: Vec<usize>,
}

impl PositionSet {
    fn new(capacity: usize) -> Self {
        PositionSet {
            dense: Vec::with_capacity(capacity),
            sparse: vec![0; capacity],
        }
    }

    fn contains(&self, id: PositionId) -> bool {
        let slot = self.sparse[id];
        slot < self.dense.len() && self.dense[slot] == id
    }

    fn insert(&mut self, id: PositionId) {
        if !self.contains(id) {
            self.sparse[id] = self.dense.len();
            self.dense.push(id);
        }
    }

    fn clear(&mut self) {
        self.dense.clear();
    }

    fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn iter(&self) -> std::slice::Iter<'_, PositionId> {
        self.dense.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::normalize::normalize;
    use crate::parser::parse;

    fn find_all(pattern: &str, text: &str) -> Vec<Match> {
        let automaton = compile(&normalize(&parse(pattern).unwrap()));
        search(&automaton, InputCursor::new(text.as_bytes()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    fn spans(pattern: &str, text: &str) -> Vec<(usize, String)> {
        find_all(pattern, text)
            .iter()
            .map(|m| (m.start_offset(), m.as_str().into_owned()))
            .collect()
    }

    #[test]
    fn star_between_literals() {
        assert_eq!(
            spans("ab*c", "ac abc abbbc"),
            vec![
                (0, "ac".to_string()),
                (3, "abc".to_string()),
                (7, "abbbc".to_string()),
            ]
        );
    }

    #[test]
    fn alternation_takes_each_side() {
        assert_eq!(
            spans("a|b", "ab"),
            vec![(0, "a".to_string()), (1, "b".to_string())]
        );
    }

    #[test]
    fn longest_branch_wins() {
        assert_eq!(spans("a|ab", "abab"), spans("ab|a", "abab"));
        assert_eq!(
            spans("a|ab", "abab"),
            vec![(0, "ab".to_string()), (2, "ab".to_string())]
        );
    }

    #[test]
    fn wildcard_consumes_one_byte_per_match() {
        let found = spans(".", "xy\nz");
        assert_eq!(found.len(), 4);
        assert_eq!(found[2], (2, "\n".to_string()));
    }

    #[test]
    fn failed_attempt_advances_one_byte() {
        // the attempt at 0 reads "aa" then fails on 'b'
        assert_eq!(spans("aac", "aaac"), vec![(1, "aac".to_string())]);
    }

    #[test]
    fn longest_match_backs_off_to_last_accept() {
        // "abab" fails at "x", the match ends after the first "ab"
        assert_eq!(
            spans("ab(ab)*c|ab", "ababx"),
            vec![(0, "ab".to_string()), (2, "ab".to_string())]
        );
    }

    #[test]
    fn nullable_pattern_reports_only_non_empty() {
        assert_eq!(
            spans("a*", "baab"),
            vec![(1, "aa".to_string())]
        );
        assert!(spans("()", "abc").is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        assert!(spans("xyz", "abc").is_empty());
        assert!(spans("a", "").is_empty());
    }

    #[test]
    fn records_lines_and_context() {
        let found = find_all("b.d", "xx\nabcde\nbzd");
        assert_eq!(found.len(), 2);

        let m = &found[0];
        assert_eq!((m.start_offset(), m.end_offset()), (4, 7));
        assert_eq!((m.start_line(), m.start_col()), (2, 2));
        assert_eq!((m.end_line(), m.end_col()), (2, 4));
        assert_eq!(&m.context_before()[..], b"a");
        assert_eq!(&m.context_after()[..], b"e");

        let m = &found[1];
        assert_eq!((m.start_line(), m.start_col()), (3, 1));
        assert!(m.context_before().is_empty());
        assert!(m.context_after().is_empty());
    }

    #[test]
    fn newline_match_crosses_lines() {
        let found = find_all(r"c\nd", "abc\ndef");
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!((m.start_line(), m.start_col()), (1, 3));
        assert_eq!((m.end_line(), m.end_col()), (2, 1));
        assert_eq!(&m.context_before()[..], b"ab");
        assert_eq!(&m.context_after()[..], b"ef");
    }

    #[test]
    fn match_ending_in_newline_has_no_after_context() {
        let found = find_all(r"b\n", "ab\ncd");
        assert_eq!(found.len(), 1);
        assert!(found[0].context_after().is_empty());
        assert_eq!((found[0].end_line(), found[0].end_col()), (1, 3));
    }

    #[test]
    fn position_set_dedups() {
        let mut set = PositionSet::new(4);
        set.insert(2);
        set.insert(0);
        set.insert(2);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![2, 0]);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(2));
    }
}
