use std::collections::BTreeMap;

/// Terminator appended by [`SuffixTree::terminate`]; smaller than every
/// letter, so after termination each suffix ends in its own leaf.
const TERMINATOR: u8 = b'$';

/// Marker for an edge slot that has not been attached yet. Real edges
/// never point back at the root.
const VACANT: usize = 0;

#[derive(Clone, Copy, Debug)]
pub(crate) struct TreeEdge {
    /// Target node, or [`VACANT`].
    pub(crate) to: usize,
    /// First position in the text the edge label occurs at.
    pub(crate) first_pos: usize,
    /// Label length; leaf edges use `usize::MAX` so they keep extending to
    /// the end of the text as characters arrive.
    pub(crate) length: usize,
}

impl TreeEdge {
    const UNATTACHED: TreeEdge = TreeEdge {
        to: VACANT,
        first_pos: 0,
        length: usize::MAX,
    };
}

#[derive(Default)]
pub(crate) struct TreeNode {
    /// Suffix link; the root links to itself.
    link: usize,
    leaf_count: usize,
    /// Outgoing edges keyed (and iterated) by first character.
    pub(crate) edges: BTreeMap<u8, TreeEdge>,
}

/// An online suffix tree built by Ukkonen's algorithm.
///
/// Characters are appended one at a time; the active point, the end of
/// the longest suffix that also occurs earlier, is carried between
/// appends, so construction is amortised linear for a fixed alphabet.
///
/// # Example
/// ```rust
/// use algokit::string::SuffixTree;
///
/// let mut tree = SuffixTree::new("abra");
/// tree.push_str("cadabra");
/// assert!(tree.contains("cadab"));
/// assert!(!tree.contains("dad"));
/// assert_eq!(tree.occurrences("abra"), 2);
/// ```
pub struct SuffixTree {
    text: Vec<u8>,
    nodes: Vec<TreeNode>,
    /// Active point: the node below which the longest non-unique suffix
    /// ends, and how many characters of it lie past that node.
    active_node: usize,
    active_len: usize,
    terminated: bool,
}

impl SuffixTree {
    /// Build the tree of `text`. Further text may still be appended.
    pub fn new(text: &str) -> Self {
        let mut tree = SuffixTree {
            text: Vec::with_capacity(text.len() + 1),
            nodes: vec![TreeNode::default()],
            active_node: 0,
            active_len: 0,
            terminated: false,
        };
        tree.push_str(text);
        tree
    }

    /// Build the tree and terminate it immediately, making every suffix
    /// end at a leaf and populating the per-subtree leaf counts.
    pub fn with_terminator(text: &str) -> Self {
        let mut tree = Self::new(text);
        tree.terminate();
        tree
    }

    /// Append one character.
    pub fn push(&mut self, c: char) {
        let mut buf = [0u8; 4];
        for &b in c.encode_utf8(&mut buf).as_bytes() {
            self.push_byte(b);
        }
    }

    /// Append a string.
    pub fn push_str(&mut self, text: &str) {
        for &b in text.as_bytes() {
            self.push_byte(b);
        }
    }

    /// Append the terminator and compute subtree leaf counts. Idempotent;
    /// no further text can be appended afterwards.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.push_byte(TERMINATOR);
        self.count_leaves();
        self.terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Number of tree nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges; every node except the root hangs off exactly one.
    pub fn edge_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The tree as a 1-based edge list `(from, to, first, last)`, where
    /// `first..=last` is the label's occurrence in the text; edges are
    /// listed per node in node order, children by character.
    pub fn edge_list(&self) -> Vec<(usize, usize, usize, usize)> {
        let mut list = Vec::with_capacity(self.edge_count());
        for (from, node) in self.nodes.iter().enumerate() {
            for edge in node.edges.values() {
                let last = edge.first_pos.saturating_add(edge.length).min(self.text.len());
                list.push((from + 1, edge.to + 1, edge.first_pos + 1, last));
            }
        }
        list
    }

    /// Whether `pattern` occurs in the text: walk from the root matching
    /// the pattern against edge labels, failing on any mismatch.
    pub fn contains(&self, pattern: &str) -> bool {
        self.walk(pattern.as_bytes()).is_some()
    }

    /// Number of occurrences of `pattern` in the text, read off the
    /// cached leaf count of the node the pattern walk stops under.
    ///
    /// Terminates the tree on first use, since the leaf counts only make
    /// sense when every suffix ends at a leaf.
    pub fn occurrences(&mut self, pattern: &str) -> usize {
        self.terminate();
        match self.walk(pattern.as_bytes()) {
            Some(node) => self.nodes[node].leaf_count,
            None => 0,
        }
    }

    /// Number of distinct non-empty substrings of the current text: the
    /// total length of all edge labels (every label character spells one
    /// new substring).
    pub fn distinct_substrings(&self) -> u64 {
        let mut count = 0u64;
        for node in &self.nodes {
            for edge in node.edges.values() {
                count += self.clamped_span(edge) as u64;
            }
        }
        count
    }

    /// Walks `pattern` from the root; on success returns the node at or
    /// below the end of the match.
    fn walk(&self, pattern: &[u8]) -> Option<usize> {
        let mut node = 0usize;
        let mut matched = 0usize;
        while matched < pattern.len() {
            let edge = self.nodes[node].edges.get(&pattern[matched])?;
            let span = self.clamped_span(edge);
            let compare = span.min(pattern.len() - matched);
            let label = &self.text[edge.first_pos..edge.first_pos + compare];
            if label != &pattern[matched..matched + compare] {
                return None;
            }
            matched += compare;
            node = edge.to;
        }
        Some(node)
    }

    /// Edge label length with leaf edges cut at the current text end.
    fn clamped_span(&self, edge: &TreeEdge) -> usize {
        edge.length.min(self.text.len() - edge.first_pos)
    }

    /// Core of Ukkonen's algorithm: extend the tree with one character.
    fn push_byte(&mut self, c: u8) {
        debug_assert!(!self.terminated, "cannot extend a terminated tree");
        self.text.push(c);
        self.active_len += 1;
        let text_len = self.text.len();
        // node created in the previous step of this phase, waiting for its
        // suffix link
        let mut last = 0usize;

        while self.active_len > 0 {
            self.walk_down();
            let active = self.active_node;
            let edge_char = self.text[text_len - self.active_len];
            let edge = *self.nodes[active]
                .edges
                .entry(edge_char)
                .or_insert(TreeEdge::UNATTACHED);

            if edge.to == VACANT {
                // no way to continue: the suffix is new, grow a leaf
                let leaf = self.new_node();
                self.nodes[active].edges.insert(
                    edge_char,
                    TreeEdge {
                        to: leaf,
                        first_pos: text_len - self.active_len,
                        length: usize::MAX,
                    },
                );
                self.nodes[last].link = active;
                last = 0;
            } else {
                let edge_symbol = self.text[edge.first_pos + self.active_len - 1];
                if edge_symbol == c {
                    // the suffix already lies on this edge; this and every
                    // shorter suffix are represented, stop the phase
                    self.nodes[last].link = active;
                    return;
                }
                // mismatch inside the edge: split it
                let split = self.new_node();
                let leaf = self.new_node();
                self.nodes[split].edges.insert(
                    c,
                    TreeEdge {
                        to: leaf,
                        first_pos: text_len - 1,
                        length: usize::MAX,
                    },
                );
                let mut old = edge;
                old.first_pos += self.active_len - 1;
                if old.length != usize::MAX {
                    old.length -= self.active_len - 1;
                }
                self.nodes[split].edges.insert(edge_symbol, old);
                self.nodes[active].edges.insert(
                    edge_char,
                    TreeEdge {
                        to: split,
                        first_pos: edge.first_pos,
                        length: self.active_len - 1,
                    },
                );
                self.nodes[last].link = split;
                last = split;
            }

            // move on to the next (shorter) suffix
            if self.active_node == 0 {
                self.active_len -= 1;
            } else {
                self.active_node = self.nodes[self.active_node].link;
            }
        }
    }

    /// Canonicalise the active point: while it reaches past the current
    /// edge, step down to the edge's target.
    fn walk_down(&mut self) {
        loop {
            let symbol = self.text[self.text.len() - self.active_len];
            let edge = *self.nodes[self.active_node]
                .edges
                .entry(symbol)
                .or_insert(TreeEdge::UNATTACHED);
            if self.active_len > edge.length {
                self.active_node = edge.to;
                self.active_len -= edge.length;
            } else {
                return;
            }
        }
    }

    fn new_node(&mut self) -> usize {
        self.nodes.push(TreeNode::default());
        self.nodes.len() - 1
    }

    /// Single post-order pass filling `leaf_count` for every subtree.
    fn count_leaves(&mut self) {
        let mut stack = vec![(0usize, false)];
        while let Some((node, children_done)) = stack.pop() {
            if children_done {
                let total: usize = self.nodes[node]
                    .edges
                    .values()
                    .map(|edge| self.nodes[edge.to].leaf_count)
                    .sum();
                self.nodes[node].leaf_count = if total == 0 { 1 } else { total };
            } else {
                stack.push((node, true));
                let children: Vec<usize> =
                    self.nodes[node].edges.values().map(|edge| edge.to).collect();
                for child in children {
                    stack.push((child, false));
                }
            }
        }
    }

    // accessors for the suffix-array extraction

    pub(crate) fn text_len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn text_bytes(&self) -> &[u8] {
        &self.text
    }

    pub(crate) fn is_leaf(&self, node: usize) -> bool {
        self.nodes[node].edges.is_empty()
    }

    /// Children of `node` in character order, with the label span each
    /// edge contributes to the path depth. The terminator character of a
    /// leaf edge is not counted.
    pub(crate) fn child_spans(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes[node].edges.values().map(move |edge| {
            let span = if edge.length > self.text.len() {
                self.text.len() - edge.first_pos - 1
            } else {
                edge.length
            };
            (edge.to, span)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        let tree = SuffixTree::new("abcabx");
        for pattern in ["abc", "bca", "cab", "abx", "x", "abcabx"] {
            assert!(tree.contains(pattern), "missing {pattern}");
        }
        for pattern in ["abca?", "xa", "bb", "abcabxy"] {
            assert!(!tree.contains(pattern), "phantom {pattern}");
        }
        assert!(tree.contains(""));
    }

    #[test]
    fn online_extension() {
        let mut tree = SuffixTree::new("");
        assert!(!tree.contains("a"));
        tree.push_str("aba");
        assert!(tree.contains("ab"));
        assert!(!tree.contains("abab"));
        tree.push('b');
        assert!(tree.contains("abab"));
        tree.push_str("cababc");
        assert!(tree.contains("babcababc"));
        assert!(!tree.contains("cc"));
    }

    #[test]
    fn occurrence_counts() {
        let mut tree = SuffixTree::new("abcabcabc");
        assert_eq!(tree.occurrences("abc"), 3);
        assert_eq!(tree.occurrences("bca"), 2);
        assert_eq!(tree.occurrences("abcabcabc"), 1);
        assert_eq!(tree.occurrences("cb"), 0);
        assert_eq!(tree.occurrences(""), 10); // every suffix of text + '$'
    }

    #[test]
    fn distinct_substrings_match_known_counts() {
        assert_eq!(SuffixTree::new("ababb").distinct_substrings(), 11);
        assert_eq!(
            SuffixTree::new("abacabadabacaba").distinct_substrings(),
            85
        );
        assert_eq!(SuffixTree::new("aaaaa").distinct_substrings(), 5);
    }

    #[test]
    fn edge_list_covers_every_node() {
        let tree = SuffixTree::with_terminator("ab");
        let list = tree.edge_list();
        assert_eq!(list.len(), tree.edge_count());
        // every node except the root appears exactly once as a target
        let mut targets: Vec<usize> = list.iter().map(|&(_, to, _, _)| to).collect();
        targets.sort_unstable();
        assert_eq!(targets, (2..=tree.node_count()).collect::<Vec<_>>());
        // labels stay within the text
        for &(_, _, first, last) in &list {
            assert!(first >= 1 && first <= last && last <= 3);
        }
    }

    #[test]
    fn node_counts_for_terminated_tree() {
        // "aaa$": the root, internal nodes "a" and "aa", and one leaf per
        // suffix of "aaa$"
        let tree = SuffixTree::with_terminator("aaa");
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.edge_count(), 6);
    }
}
