//! Canonical form for parsed patterns.
//!
//! Grouping leaves behind wrapper nodes: `(ab)c` parses as a concat holding
//! another concat, `(a)` as a one-item concat. Normalizing splices nested
//! concats (and nested alternations) into their parent, replaces one-child
//! wrappers by the child and drops empty groups from concats. None of this
//! changes what the pattern matches.

use crate::parser::Node;

pub fn normalize(node: &Node) -> Node {
    match node {
        Node::Literal(_) | Node::Wildcard => node.clone(),
        Node::Star(child) => {
            let child = normalize(child);
            if child.is_empty() {
                // repeating nothing is still nothing
                child
            } else {
                Node::Star(Box::new(child))
            }
        }
        Node::Concat(items) => {
            let mut flat = Vec::with_capacity(items.len());
            for item in items {
                match normalize(item) {
                    Node::Concat(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            collapse(flat, Node::Concat)
        }
        Node::Alternation(branches) => {
            let mut flat = Vec::with_capacity(branches.len());
            for branch in branches {
                match normalize(branch) {
                    Node::Alternation(inner) => flat.extend(inner),
                    // an empty branch still matches the empty string, keep it
                    other => flat.push(other),
                }
            }
            if flat.is_empty() {
                return Node::Concat(Vec::new());
            }
            collapse(flat, Node::Alternation)
        }
    }
}

fn collapse(mut nodes: Vec<Node>, wrap: fn(Vec<Node>) -> Node) -> Node {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        wrap(nodes)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::parser::parse;

    fn normalized(pattern: &str) -> Node {
        normalize(&parse(pattern).unwrap())
    }

    #[test]
    fn single_literal_unwraps() {
        assert_eq!(normalized("a"), Node::Literal(b'a'));
        assert_eq!(normalized("((a))"), Node::Literal(b'a'));
    }

    #[test]
    fn groups_are_spliced_into_parent() {
        assert_eq!(
            normalized("(ab)c"),
            Node::Concat(vec![
                Node::Literal(b'a'),
                Node::Literal(b'b'),
                Node::Literal(b'c'),
            ])
        );
    }

    #[test]
    fn alternation_branches_unwrap() {
        assert_eq!(
            normalized("a|(b|c)"),
            Node::Alternation(vec![
                Node::Literal(b'a'),
                Node::Literal(b'b'),
                Node::Literal(b'c'),
            ])
        );
    }

    #[test]
    fn star_keeps_its_group() {
        assert_eq!(
            normalized("(ab)*"),
            Node::Star(Box::new(Node::Concat(vec![
                Node::Literal(b'a'),
                Node::Literal(b'b'),
            ])))
        );
    }

    #[test]
    fn empty_groups_disappear() {
        assert_eq!(normalized("a()b"), normalized("ab"));
        assert_eq!(normalized("a()*"), Node::Literal(b'a'));
        assert!(normalized("()").is_empty());
    }

    #[test]
    fn empty_alternative_is_kept() {
        assert_eq!(
            normalized("a|()"),
            Node::Alternation(vec![Node::Literal(b'a'), Node::Concat(vec![])])
        );
    }

    proptest! {
        #[test]
        fn normalizing_twice_changes_nothing(pattern in r"[ab.|()*]{1,16}") {
            if let Ok(tree) = parse(&pattern) {
                let once = normalize(&tree);
                prop_assert_eq!(normalize(&once), once);
            }
        }
    }
}
