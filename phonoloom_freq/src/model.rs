// Recursive conditional-frequency trie over feature-label sequences.
//
// Each corpus line is a whitespace-delimited label path ("voiced alveolar
// stop"); inserting it descends the trie one label at a time and counts the
// completed sequence at its terminal node. A node can simultaneously be a
// complete recorded sequence and a prefix of longer ones, so the node type
// is an explicit tagged union — `Leaf`, `Internal`, `Mixed` — and the
// conversions between those states are the two explicit transitions in
// `children_mut` (leaf grows children) and `bump` (internal becomes a
// recorded terminal). No other conversion exists.
//
// Conservation invariant: at every node,
// `total = own count (if any) + Σ child totals`. Queries are raw relative
// counts — no smoothing.
//
// `lookup` is strict: exact label descent only. The relaxed
// anywhere-in-the-tree scan exists solely as the separately named `search`,
// so probability queries can never silently answer from the wrong subtree.
//
// `BTreeMap` children keep iteration (and therefore serialization and
// `search` order) deterministic.

use crate::error::FreqError;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// One trie node: a recorded-sequence count, a prefix with children, or
/// both at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreqNode {
    /// A complete recorded sequence ends here; no longer sequence passes
    /// through.
    Leaf(u64),
    /// A prefix of longer sequences; nothing recorded ends exactly here.
    Internal(BTreeMap<String, FreqNode>),
    /// Both: a recorded terminal that is also a prefix.
    Mixed {
        count: u64,
        children: BTreeMap<String, FreqNode>,
    },
}

impl FreqNode {
    /// Subtree total: own count (if any) plus all child totals.
    pub fn total(&self) -> u64 {
        match self {
            FreqNode::Leaf(count) => *count,
            FreqNode::Internal(children) => children.values().map(FreqNode::total).sum(),
            FreqNode::Mixed { count, children } => {
                count + children.values().map(FreqNode::total).sum::<u64>()
            }
        }
    }

    /// The count of sequences ending exactly here, if this node is a
    /// recorded terminal.
    pub fn own_count(&self) -> Option<u64> {
        match self {
            FreqNode::Leaf(count) | FreqNode::Mixed { count, .. } => Some(*count),
            FreqNode::Internal(_) => None,
        }
    }

    /// Child nodes by label, if this node has any.
    pub fn children(&self) -> Option<&BTreeMap<String, FreqNode>> {
        match self {
            FreqNode::Internal(children) | FreqNode::Mixed { children, .. } => Some(children),
            FreqNode::Leaf(_) => None,
        }
    }

    /// Transition: give this node children, promoting `Leaf` to `Mixed`.
    fn children_mut(&mut self) -> &mut BTreeMap<String, FreqNode> {
        if let FreqNode::Leaf(count) = *self {
            *self = FreqNode::Mixed {
                count,
                children: BTreeMap::new(),
            };
        }
        match self {
            FreqNode::Internal(children) | FreqNode::Mixed { children, .. } => children,
            FreqNode::Leaf(_) => unreachable!("leaf promoted to mixed above"),
        }
    }

    /// Transition: count one completed sequence ending here, promoting
    /// `Internal` to `Mixed`.
    fn bump(&mut self) {
        match self {
            FreqNode::Leaf(count) | FreqNode::Mixed { count, .. } => *count += 1,
            FreqNode::Internal(children) => {
                let children = std::mem::take(children);
                *self = FreqNode::Mixed { count: 1, children };
            }
        }
    }

    /// Descend along `path`, creating nodes as needed, and count the
    /// terminal.
    fn record(&mut self, path: &[&str]) {
        match path.split_first() {
            None => self.bump(),
            Some((label, rest)) => {
                let child = self
                    .children_mut()
                    .entry((*label).to_string())
                    .or_insert_with(|| {
                        if rest.is_empty() {
                            FreqNode::Leaf(0)
                        } else {
                            FreqNode::Internal(BTreeMap::new())
                        }
                    });
                child.record(rest);
            }
        }
    }

    /// Add another model's counts into this node, recursively.
    fn absorb(&mut self, other: FreqNode) {
        match other {
            FreqNode::Leaf(count) => self.add_count(count),
            FreqNode::Internal(children) => self.absorb_children(children),
            FreqNode::Mixed { count, children } => {
                self.add_count(count);
                self.absorb_children(children);
            }
        }
    }

    fn add_count(&mut self, n: u64) {
        if n == 0 {
            return;
        }
        match self {
            FreqNode::Leaf(count) | FreqNode::Mixed { count, .. } => *count += n,
            FreqNode::Internal(children) => {
                let children = std::mem::take(children);
                *self = FreqNode::Mixed { count: n, children };
            }
        }
    }

    fn absorb_children(&mut self, other: BTreeMap<String, FreqNode>) {
        if other.is_empty() {
            return;
        }
        let children = self.children_mut();
        for (label, node) in other {
            match children.entry(label) {
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
                Entry::Occupied(mut slot) => slot.get_mut().absorb(node),
            }
        }
    }
}

/// A frequency model: the trie root plus insert and query operations.
///
/// Built once over a corpus snapshot, then queried immutably. Independent
/// models built from disjoint corpus shards combine with `merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreqModel {
    root: FreqNode,
}

impl Default for FreqModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FreqModel {
    /// An empty model.
    pub fn new() -> Self {
        Self {
            root: FreqNode::Internal(BTreeMap::new()),
        }
    }

    /// Record one whitespace-delimited label sequence. Lines with no
    /// labels are dropped.
    pub fn insert(&mut self, line: &str) {
        let labels: Vec<&str> = line.split_whitespace().collect();
        if labels.is_empty() {
            tracing::debug!("dropping corpus line with no labels");
            return;
        }
        self.root.record(&labels);
    }

    /// Record every line of an iterator.
    pub fn insert_all<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.insert(line.as_ref());
        }
    }

    /// The root node. An empty path `lookup` returns the same node.
    pub fn root(&self) -> &FreqNode {
        &self.root
    }

    /// Total number of recorded sequences.
    pub fn total(&self) -> u64 {
        self.root.total()
    }

    /// Strict descent by exact label at each level.
    ///
    /// Fails with `PathNotFound` naming the longest missing prefix; never
    /// falls back to searching elsewhere in the tree (that is `search`).
    pub fn lookup(&self, path: &[&str]) -> Result<&FreqNode, FreqError> {
        let mut node = &self.root;
        for (depth, label) in path.iter().enumerate() {
            node = node
                .children()
                .and_then(|children| children.get(*label))
                .ok_or_else(|| FreqError::PathNotFound(path[..=depth].join(" ")))?;
        }
        Ok(node)
    }

    /// Relative frequency of `feature_path` within `condition_path` (or
    /// within the whole corpus when no condition is given).
    ///
    /// Fails with `DivisionByZero` when the conditioning subtree has a
    /// zero total, and with `PathNotFound` when either path is absent.
    pub fn conditional_probability(
        &self,
        feature_path: &[&str],
        condition_path: Option<&[&str]>,
    ) -> Result<f64, FreqError> {
        let denominator = match condition_path {
            Some(path) => self.lookup(path)?,
            None => &self.root,
        };
        let denominator_total = denominator.total();
        if denominator_total == 0 {
            let described = condition_path.map(|p| p.join(" ")).unwrap_or_default();
            return Err(FreqError::DivisionByZero(described));
        }
        let numerator = self.lookup(feature_path)?;
        Ok(numerator.total() as f64 / denominator_total as f64)
    }

    /// Find `label` anywhere in the tree — the explicitly relaxed
    /// counterpart to `lookup`.
    ///
    /// Walks the tree in sorted label order, checking each node's direct
    /// children before descending, and returns the full path to the first
    /// match plus the node. Deterministic, but a label occurring in many
    /// subtrees only ever reports the first; prefer `lookup` whenever the
    /// full path is known.
    pub fn search(&self, label: &str) -> Option<(Vec<String>, &FreqNode)> {
        fn walk<'t>(
            children: &'t BTreeMap<String, FreqNode>,
            label: &str,
            prefix: &mut Vec<String>,
        ) -> Option<(Vec<String>, &'t FreqNode)> {
            if let Some(node) = children.get(label) {
                let mut path = prefix.clone();
                path.push(label.to_string());
                return Some((path, node));
            }
            for (key, node) in children {
                if let Some(grandchildren) = node.children() {
                    prefix.push(key.clone());
                    if let Some(found) = walk(grandchildren, label, prefix) {
                        return Some(found);
                    }
                    prefix.pop();
                }
            }
            None
        }

        let children = self.root.children()?;
        walk(children, label, &mut Vec::new())
    }

    /// Merge another model's counts into this one, recursively summing
    /// matching nodes — the reduce step for shard-parallel corpus builds.
    pub fn merge(&mut self, other: FreqModel) {
        self.root.absorb(other.root);
    }
}
