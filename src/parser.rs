use core::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{PatternError, PatternErrorKind};

/// Pattern syntax tree.
///
/// Leaves match one byte of input. A non-ASCII character in the pattern
/// becomes a `Concat` of its UTF-8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Literal(u8),
    Wildcard,
    Concat(Vec<Node>),
    // branches in priority order
    Alternation(Vec<Node>),
    Star(Box<Node>),
}

impl Node {
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Concat(items) => items.is_empty(),
            Node::Alternation(branches) => branches.is_empty(),
            _ => false,
        }
    }
}

pub(crate) fn write_byte(f: &mut fmt::Formatter<'_>, byte: u8) -> fmt::Result {
    match byte {
        b'\t' => write!(f, r"\t"),
        b'\n' => write!(f, r"\n"),
        b'\r' => write!(f, r"\r"),
        b'\\' | b'.' | b'*' | b'|' | b'(' | b')' | b'"' | b'\'' => {
            write!(f, "\\{}", byte as char)
        }
        0x20..=0x7e => write!(f, "{}", byte as char),
        _ => write!(f, r"\x{:02x}", byte),
    }
}

/// Renders the tree back into pattern syntax. Bytes with no pattern spelling
/// are shown as `\xNN`, so the output is a diagnostic view rather than always
/// a re-parseable pattern.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(byte) => write_byte(f, *byte),
            Node::Wildcard => write!(f, "."),
            Node::Concat(items) if items.is_empty() => write!(f, "()"),
            Node::Concat(items) => {
                for item in items {
                    if let Node::Alternation(_) = item {
                        write!(f, "({})", item)?;
                    } else {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Node::Alternation(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", branch)?;
                }
                Ok(())
            }
            Node::Star(child) => match child.as_ref() {
                Node::Literal(_) | Node::Wildcard | Node::Star(_) => write!(f, "{}*", child),
                _ => write!(f, "({})*", child),
            },
        }
    }
}

/// Parse a pattern into its syntax tree.
///
/// ```text
/// alternation := branch ('|' branch)*
/// branch      := (atom '*'*)*
/// atom        := literal | '.' | '\' escape | '(' alternation ')'
/// ```
pub fn parse(pattern: &str) -> Result<Node, PatternError> {
    let mut parser = Parser {
        chars: pattern.chars().peekable(),
        location: Location::start(),
    };
    if parser.chars.peek().is_none() {
        return Err(parser.location.error(PatternErrorKind::EmptyPattern));
    }
    let node = parser.parse_alternation()?;
    match parser.chars.peek() {
        // anything left over is a `)` with no matching `(`
        Some(_) => Err(parser.location.error(PatternErrorKind::UnbalancedParenthesis)),
        None => Ok(node),
    }
}

#[derive(Clone, Copy, Debug)]
struct Location {
    offset: usize,
    line: usize,
    column: usize,
}

impl Location {
    fn start() -> Self {
        Location {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn error(self, kind: PatternErrorKind) -> PatternError {
        PatternError {
            kind,
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    // location of the next character
    location: Location,
}

impl Parser<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.location.offset += 1;
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(c)
    }

    fn parse_alternation(&mut self) -> Result<Node, PatternError> {
        let mut branches = Vec::new();
        loop {
            let branch_start = self.location;
            let branch = self.parse_branch()?;
            let more = self.chars.peek() == Some(&'|');
            if branch.is_empty() && (more || !branches.is_empty()) {
                return Err(branch_start.error(PatternErrorKind::EmptyAlternativeBranch));
            }
            branches.push(branch);
            if !more {
                break;
            }
            self.bump();
        }
        if branches.len() == 1 {
            Ok(branches.remove(0))
        } else {
            Ok(Node::Alternation(branches))
        }
    }

    fn parse_branch(&mut self) -> Result<Node, PatternError> {
        let mut items: Vec<Node> = Vec::new();
        loop {
            match self.chars.peek() {
                None | Some('|') | Some(')') => break,
                Some('*') => {
                    let Some(atom) = items.pop() else {
                        return Err(self.location.error(PatternErrorKind::DanglingStar));
                    };
                    self.bump();
                    items.push(Node::Star(Box::new(atom)));
                }
                Some(_) => {
                    let atom = self.parse_atom()?;
                    items.push(atom);
                }
            }
        }
        Ok(Node::Concat(items))
    }

    fn parse_atom(&mut self) -> Result<Node, PatternError> {
        let start = self.location;
        match self.bump() {
            Some('.') => Ok(Node::Wildcard),
            Some('\\') => self.parse_escape(start),
            Some('(') => {
                let inner = self.parse_alternation()?;
                if self.bump() != Some(')') {
                    return Err(start.error(PatternErrorKind::UnbalancedParenthesis));
                }
                Ok(inner)
            }
            Some(c) => Ok(literal(c)),
            None => Err(start.error(PatternErrorKind::EmptyPattern)),
        }
    }

    /// The backslash at `start` has already been consumed.
    fn parse_escape(&mut self, start: Location) -> Result<Node, PatternError> {
        let c = match self.bump() {
            Some('t') => '\t',
            Some('n') => '\n',
            Some(c @ ('\\' | '.' | '*' | '|' | '(' | ')' | '"' | '\'')) => c,
            Some(c) => return Err(start.error(PatternErrorKind::UnknownEscape(c))),
            None => return Err(start.error(PatternErrorKind::UnterminatedEscape)),
        };
        Ok(literal(c))
    }
}

fn literal(c: char) -> Node {
    let mut buf = [0; 4];
    let encoded = c.encode_utf8(&mut buf).as_bytes();
    match encoded {
        [byte] => Node::Literal(*byte),
        bytes => Node::Concat(bytes.iter().map(|&b| Node::Literal(b)).collect()),
    }
}
