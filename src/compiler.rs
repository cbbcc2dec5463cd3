//! Position (Glushkov) automaton construction.
//!
//! Every leaf of the normalized tree becomes one position, numbered left to
//! right. The automaton has no epsilon transitions: after matching position
//! `p` the next input byte may only match a position in `follow(p)`.

use core::fmt;
use std::collections::BTreeSet;

use crate::parser::{Node, write_byte};

pub type PositionId = usize;

/// What a single position accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    Byte(u8),
    Any,
}

impl Predicate {
    pub fn matches(self, byte: u8) -> bool {
        match self {
            Predicate::Byte(expected) => expected == byte,
            Predicate::Any => true,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Byte(byte) => {
                write!(f, "'")?;
                write_byte(f, *byte)?;
                write!(f, "'")
            }
            Predicate::Any => write!(f, "."),
        }
    }
}

/// Read-only result of [`compile`]; one automaton serves any number of searches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    positions: Vec<Predicate>,
    first: Vec<PositionId>,
    last: Vec<PositionId>,
    // indexed by position, for O(1) acceptance checks
    accepting: Vec<bool>,
    follow: Vec<Vec<PositionId>>,
    nullable: bool,
}

impl Automaton {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn predicate(&self, id: PositionId) -> Predicate {
        self.positions[id]
    }

    /// Positions that can match the first byte of a match, ascending.
    pub fn first(&self) -> &[PositionId] {
        &self.first
    }

    /// Positions that can match the last byte of a match, ascending.
    pub fn last(&self) -> &[PositionId] {
        &self.last
    }

    pub fn is_last(&self, id: PositionId) -> bool {
        self.accepting[id]
    }

    /// Positions allowed right after `id`, ascending.
    pub fn follow(&self, id: PositionId) -> &[PositionId] {
        &self.follow[id]
    }

    /// Whether the pattern matches the empty string.
    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, set: &[PositionId]) -> fmt::Result {
    write!(f, "{{")?;
    for (i, id) in set.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", id)?;
    }
    write!(f, "}}")
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "positions: {}", self.positions.len())?;
        for (id, predicate) in self.positions.iter().enumerate() {
            write!(f, "  {}: {} -> ", id, predicate)?;
            write_set(f, &self.follow[id])?;
            writeln!(f)?;
        }
        write!(f, "first: ")?;
        write_set(f, &self.first)?;
        write!(f, "\nlast: ")?;
        write_set(f, &self.last)?;
        write!(f, "\nnullable: {}", self.nullable)
    }
}

/// Build the position automaton for a (normalized) tree.
pub fn compile(root: &Node) -> Automaton {
    let mut builder = Builder::default();
    let summary = builder.visit(root);
    let mut accepting = vec![false; builder.positions.len()];
    for &id in &summary.last {
        accepting[id] = true;
    }
    Automaton {
        positions: builder.positions,
        first: summary.first.into_iter().collect(),
        last: summary.last.into_iter().collect(),
        accepting,
        follow: builder
            .follow
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect(),
        nullable: summary.nullable,
    }
}

/// nullable/first/last of one subtree.
struct Summary {
    nullable: bool,
    first: BTreeSet<PositionId>,
    last: BTreeSet<PositionId>,
}

impl Summary {
    fn empty() -> Self {
        Summary {
            nullable: true,
            first: BTreeSet::new(),
            last: BTreeSet::new(),
        }
    }
}

#[derive(Default)]
struct Builder {
    positions: Vec<Predicate>,
    follow: Vec<BTreeSet<PositionId>>,
}

impl Builder {
    fn leaf(&mut self, predicate: Predicate) -> Summary {
        let id = self.positions.len();
        self.positions.push(predicate);
        self.follow.push(BTreeSet::new());
        Summary {
            nullable: false,
            first: BTreeSet::from([id]),
            last: BTreeSet::from([id]),
        }
    }

    fn link(&mut self, from: &BTreeSet<PositionId>, to: &BTreeSet<PositionId>) {
        for &p in from {
            self.follow[p].extend(to.iter().copied());
        }
    }

    fn visit(&mut self, node: &Node) -> Summary {
        match node {
            Node::Literal(byte) => self.leaf(Predicate::Byte(*byte)),
            Node::Wildcard => self.leaf(Predicate::Any),
            Node::Concat(items) => {
                // `acc` summarizes the items seen so far, so its `last`
                // already reaches back across nullable items.
                let mut acc = Summary::empty();
                for item in items {
                    let next = self.visit(item);
                    self.link(&acc.last, &next.first);
                    if acc.nullable {
                        acc.first.extend(next.first.iter().copied());
                    }
                    acc.last = if next.nullable {
                        acc.last.union(&next.last).copied().collect()
                    } else {
                        next.last
                    };
                    acc.nullable &= next.nullable;
                }
                acc
            }
            Node::Alternation(branches) => {
                let mut acc = Summary {
                    nullable: false,
                    ..Summary::empty()
                };
                for branch in branches {
                    let next = self.visit(branch);
                    acc.nullable |= next.nullable;
                    acc.first.extend(next.first);
                    acc.last.extend(next.last);
                }
                acc
            }
            Node::Star(child) => {
                let inner = self.visit(child);
                self.link(&inner.last, &inner.first);
                Summary {
                    nullable: true,
                    ..inner
                }
            }
        }
    }
}
