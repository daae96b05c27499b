//! Non-cyclic topology builder.
//!
//! Expands the compact bifurcation language into a tree rooted at switch 0.
//! Two parallel `;`-separated streams describe the tree:
//!
//! - the branch stream, one signed integer per bifurcation: `k > 0` creates
//!   `k` child switches and descends into each of them in turn, `-k` hangs
//!   `k` end systems on the current switch and closes the branch, and `0`
//!   turns the current switch itself into an end system;
//! - the link stream, one `<w|x><speed>` token per physical link.
//!
//! Link tokens are not in depth-first order. The `k` children of a positive
//! bifurcation take `k` consecutive tokens, and only then do their subtrees
//! consume tokens, one subtree after the other. The traversal below keeps an
//! explicit stack of [`Frame`]s so that the consumption order can be followed
//! and tested directly.

use std::cmp::Ordering;
use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use super::graph::NetworkGraph;
use super::types::{LinkKind, LinkSpec, TopologyError};

/// Physical link created while expanding a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkAssignment {
    pub parent: usize,
    pub child: usize,
    /// Position of the token in the link stream
    pub token_index: usize,
    /// Index of the `parent -> child` link; the reverse link follows it
    pub link_index: usize,
}

/// Result of a successful expansion
#[derive(Debug, Clone)]
pub struct NonCyclicExpansion {
    pub graph: NetworkGraph,
    /// Links in creation order
    pub assignments: Vec<LinkAssignment>,
}

/// Build a tree topology from a branch stream and a link stream
///
/// # Examples
/// ```
/// use ttnetgen::topology::build_non_cyclic;
///
/// let graph = build_non_cyclic("-3", "w10;w10;w10").unwrap();
/// assert_eq!(graph.node_count(), 4);
/// assert_eq!(graph.link_count(), 6);
/// ```
pub fn build_non_cyclic(description: &str, link_description: &str) -> Result<NetworkGraph, TopologyError> {
    expand_non_cyclic(description, link_description).map(|expansion| expansion.graph)
}

/// Like [`build_non_cyclic`], also returning which link token went where
pub fn expand_non_cyclic(
    description: &str,
    link_description: &str,
) -> Result<NonCyclicExpansion, TopologyError> {
    let branches = parse_branch_stream(description)?;
    let links = LinkStream::new(link_description);
    let expansion = Expander::new(&branches, &links).run()?;

    info!(
        "Built non-cyclic topology: {} switches, {} end systems, {} links",
        expansion.graph.switches().len(),
        expansion.graph.end_systems().len(),
        expansion.graph.link_count()
    );
    Ok(expansion)
}

/// Split a branch stream into its bifurcations
pub fn parse_branch_stream(description: &str) -> Result<Vec<i64>, TopologyError> {
    description
        .split(';')
        .enumerate()
        .map(|(position, token)| {
            token.trim().parse::<i64>().map_err(|_| TopologyError::InvalidBifurcation {
                position,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Match: "w100", "x54"
static LINK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([wx])([0-9]+)$").expect("Invalid link token regex"));

/// Link stream whose tokens are only interpreted when consumed
struct LinkStream<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> LinkStream<'a> {
    fn new(link_description: &'a str) -> Self {
        let tokens = if link_description.trim().is_empty() {
            Vec::new()
        } else {
            link_description.split(';').map(str::trim).collect()
        };
        Self { tokens }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn spec(&self, index: usize) -> Result<LinkSpec, TopologyError> {
        let token = self.tokens.get(index).ok_or(TopologyError::MissingLinkToken {
            index,
            available: self.tokens.len(),
        })?;
        parse_link_token(token).ok_or_else(|| TopologyError::InvalidLinkToken {
            position: index,
            token: token.to_string(),
        })?
    }
}

fn parse_link_token(token: &str) -> Option<Result<LinkSpec, TopologyError>> {
    let captures = LINK_TOKEN.captures(token)?;
    let kind = captures[1].chars().next().and_then(LinkKind::from_token_char)?;
    let speed = captures[2].parse::<u64>().ok()?;
    Some(LinkSpec::new(kind, speed))
}

/// Expansion state of one positive bifurcation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    /// Switch whose children are being created
    parent: usize,
    children: usize,
    next_child: usize,
    /// Token of child `i` is `first_link + i`
    first_link: usize,
    /// Where the next child's subtree starts consuming tokens
    resume_link: usize,
}

enum Step {
    /// The bifurcation created no switches; tokens continue at `next_link`
    Closed { next_link: usize },
    Open(Frame),
}

struct Expander<'a> {
    branches: &'a [i64],
    links: &'a LinkStream<'a>,
    graph: NetworkGraph,
    assignments: Vec<LinkAssignment>,
    /// Last branch-stream position interpreted
    call_index: usize,
}

impl<'a> Expander<'a> {
    fn new(branches: &'a [i64], links: &'a LinkStream<'a>) -> Self {
        Self {
            branches,
            links,
            graph: NetworkGraph::new(),
            assignments: Vec::new(),
            call_index: 0,
        }
    }

    fn run(mut self) -> Result<NonCyclicExpansion, TopologyError> {
        let root = self.graph.add_switch();
        let mut stack: Vec<Frame> = Vec::new();

        let mut next_link = match self.open(root, 0)? {
            Step::Closed { next_link } => next_link,
            Step::Open(frame) => {
                stack.push(frame);
                0
            }
        };

        while let Some(frame) = stack.last_mut() {
            if frame.next_child == frame.children {
                let finished = *frame;
                stack.pop();
                next_link = finished.resume_link;
                if let Some(parent) = stack.last_mut() {
                    parent.resume_link = parent.resume_link.max(finished.resume_link);
                }
                continue;
            }

            let token_index = frame.first_link + frame.next_child;
            let spec = self.links.spec(token_index)?;
            let child = self.graph.add_switch();
            self.link(frame.parent, child, token_index, spec)?;
            frame.next_child += 1;

            // Siblings never share a bifurcation
            self.call_index += 1;
            match self.open(child, frame.resume_link)? {
                Step::Closed { next_link } => {
                    frame.resume_link = frame.resume_link.max(next_link);
                }
                Step::Open(nested) => stack.push(nested),
            }
        }

        let last = self.branches.len() - 1;
        if self.call_index != last {
            return Err(TopologyError::UnusedBifurcations {
                last_used: self.call_index,
                leftover: last - self.call_index,
            });
        }
        if next_link != self.links.len() {
            return Err(TopologyError::UnusedLinkTokens {
                used: next_link,
                given: self.links.len(),
            });
        }

        Ok(NonCyclicExpansion {
            graph: self.graph,
            assignments: self.assignments,
        })
    }

    /// Interpret the bifurcation at `call_index` for `parent`, with link
    /// tokens available from `link_index` on
    fn open(&mut self, parent: usize, link_index: usize) -> Result<Step, TopologyError> {
        let position = self.call_index;
        let value = *self
            .branches
            .get(position)
            .ok_or(TopologyError::OpenBranch { position })?;
        debug!("Bifurcation {} = {} on node {} (link token {})", position, value, parent, link_index);

        match value.cmp(&0) {
            Ordering::Less => {
                let leaves = value.unsigned_abs() as usize;
                for leaf in 0..leaves {
                    let token_index = link_index + leaf;
                    let spec = self.links.spec(token_index)?;
                    let end_system = self.graph.add_end_system();
                    self.link(parent, end_system, token_index, spec)?;
                }
                Ok(Step::Closed { next_link: link_index + leaves })
            }
            Ordering::Equal => {
                self.graph.convert_to_end_system(parent)?;
                Ok(Step::Closed { next_link: link_index })
            }
            Ordering::Greater => {
                let children = value as usize;
                Ok(Step::Open(Frame {
                    parent,
                    children,
                    next_child: 0,
                    first_link: link_index,
                    resume_link: link_index + children,
                }))
            }
        }
    }

    fn link(&mut self, parent: usize, child: usize, token_index: usize, spec: LinkSpec) -> Result<(), TopologyError> {
        let (link_index, _) = self.graph.add_link_pair(parent, child, spec)?;
        self.assignments.push(LinkAssignment { parent, child, token_index, link_index });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::NodeKind;

    fn tokens(expansion: &NonCyclicExpansion) -> Vec<(usize, usize, usize)> {
        expansion
            .assignments
            .iter()
            .map(|a| (a.parent, a.child, a.token_index))
            .collect()
    }

    #[test]
    fn test_single_zero_is_one_end_system() {
        let graph = build_non_cyclic("0", "").unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.end_systems(), &[0]);
        assert!(graph.switches().is_empty());
    }

    #[test]
    fn test_star_of_end_systems() {
        let graph = build_non_cyclic("-3", "w10;w10;w10").unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.switches(), &[0]);
        assert_eq!(graph.end_systems(), &[1, 2, 3]);
        assert_eq!(graph.link_count(), 6);
        for link in graph.links() {
            assert_eq!(link.spec.kind(), LinkKind::Wired);
            assert_eq!(link.spec.speed(), 10);
        }
    }

    #[test]
    fn test_children_tokens_come_before_subtrees() {
        let expansion = expand_non_cyclic("2;-2;-2", "w1;w2;w3;w4;w5;w6").unwrap();

        // Switch 1 (token 0), its leaves 2 and 3 (tokens 2, 3),
        // switch 4 (token 1), its leaves 5 and 6 (tokens 4, 5)
        assert_eq!(
            tokens(&expansion),
            vec![(0, 1, 0), (1, 2, 2), (1, 3, 3), (0, 4, 1), (4, 5, 4), (4, 6, 5)]
        );

        let graph = &expansion.graph;
        assert_eq!(graph.switches(), &[0, 1, 4]);
        assert_eq!(graph.end_systems(), &[2, 3, 5, 6]);
        assert_eq!(graph.link(6).unwrap().spec.speed(), 2);
        assert_eq!(graph.link(6).unwrap().source, 0);
        assert_eq!(graph.link(6).unwrap().destination, 4);
    }

    #[test]
    fn test_nested_subtree_resumes_after_deepest_link() {
        // Root has two switches; the first has one switch with a leaf,
        // the second has a leaf directly.
        let expansion = expand_non_cyclic("2;1;-1;-1", "w1;w2;w3;w4;w5").unwrap();
        assert_eq!(
            tokens(&expansion),
            vec![(0, 1, 0), (1, 2, 2), (2, 3, 3), (0, 4, 1), (4, 5, 4)]
        );
        assert_eq!(expansion.graph.end_systems(), &[3, 5]);
    }

    #[test]
    fn test_zero_converts_child_switch() {
        let graph = build_non_cyclic("2;0;-1", "w100;x54;w100").unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.switches(), &[0, 2]);
        assert_eq!(graph.end_systems(), &[1, 3]);
        assert_eq!(graph.node(1).unwrap().kind, NodeKind::EndSystem);
        assert_eq!(graph.link(2).unwrap().spec.kind(), LinkKind::Wireless);
    }

    #[test]
    fn test_reciprocal_pairs() {
        let graph = build_non_cyclic("3;-1;0;2;-2;0", "w1;w1;w1;w1;w1;w1;w1;w1").unwrap();
        assert_eq!(graph.link_count() % 2, 0);
        for pair in graph.links().chunks(2) {
            assert_eq!(pair[0].source, pair[1].destination);
            assert_eq!(pair[0].destination, pair[1].source);
            assert_eq!(pair[0].spec, pair[1].spec);
        }
        // One pair per non-root node
        assert_eq!(graph.link_count(), 2 * (graph.node_count() - 1));
    }

    #[test]
    fn test_too_few_link_tokens() {
        assert_eq!(
            build_non_cyclic("-3", "w10;w10").unwrap_err(),
            TopologyError::MissingLinkToken { index: 2, available: 2 }
        );
    }

    #[test]
    fn test_unused_bifurcations() {
        assert!(matches!(
            build_non_cyclic("-2;-3", "w1;w1").unwrap_err(),
            TopologyError::UnusedBifurcations { last_used: 0, leftover: 1 }
        ));
    }

    #[test]
    fn test_open_branch() {
        assert_eq!(
            build_non_cyclic("2;-1", "w1;w1;w1").unwrap_err(),
            TopologyError::OpenBranch { position: 2 }
        );
    }

    #[test]
    fn test_unused_link_tokens() {
        assert_eq!(
            build_non_cyclic("-1", "w1;w1").unwrap_err(),
            TopologyError::UnusedLinkTokens { used: 1, given: 2 }
        );
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(
            build_non_cyclic("2;a", "w1;w1").unwrap_err(),
            TopologyError::InvalidBifurcation { position: 1, .. }
        ));
        assert!(matches!(
            build_non_cyclic("", "").unwrap_err(),
            TopologyError::InvalidBifurcation { position: 0, .. }
        ));
        assert!(matches!(
            build_non_cyclic("-1", "q10").unwrap_err(),
            TopologyError::InvalidLinkToken { position: 0, .. }
        ));
        assert_eq!(
            build_non_cyclic("-1", "w0").unwrap_err(),
            TopologyError::InvalidSpeed { speed: 0 }
        );
    }
}
