//! Prefix tree over normalized candidate keys
//!
//! Each root-to-node path spells a key prefix; a node lists the candidates
//! whose key ends exactly there. Keys sharing a prefix share the nodes (and,
//! during search, the DP columns) for that prefix.
//!
//! Nodes live in one arena and refer to their children by [`NodeId`], so a
//! very long key makes the tree deep without making building, cloning or
//! dropping it recursive.
//!
//! `depth` is the longest remaining suffix below a node. The search uses it
//! only as a pruning bound; it never affects which scores are produced.

use crate::algorithms::normalize::Unit;
use ahash::AHashMap;

/// Index of a node in the trie's arena
pub type NodeId = usize;

/// The root node's id
pub const ROOT: NodeId = 0;

/// A node in the trie
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: AHashMap<Unit, NodeId>,
    /// Longest key suffix (in units) passing through this node
    depth: usize,
    /// Candidate ids whose key terminates here
    candidates: Vec<usize>,
}

impl TrieNode {
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    pub fn children(&self) -> impl Iterator<Item = (&Unit, NodeId)> {
        self.children.iter().map(|(unit, &id)| (unit, id))
    }

    #[inline]
    pub fn child(&self, unit: &str) -> Option<NodeId> {
        self.children.get(unit).copied()
    }
}

/// Append-only trie mapping unit sequences to candidate ids
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    keys: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            keys: 0,
        }
    }
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key`, recording `candidate` at its terminal node.
    pub fn insert(&mut self, key: &[Unit], candidate: usize) {
        let mut id = ROOT;
        for (i, unit) in key.iter().enumerate() {
            let node = &mut self.nodes[id];
            node.depth = node.depth.max(key.len() - i);
            id = match node.child(unit) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes[id].children.insert(unit.clone(), child);
                    self.nodes.push(TrieNode::default());
                    child
                }
            };
        }
        self.nodes[id].candidates.push(candidate);
        self.keys += 1;
    }

    #[inline]
    pub fn root(&self) -> &TrieNode {
        &self.nodes[ROOT]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    /// Length of the longest key in the trie
    #[inline]
    pub fn depth(&self) -> usize {
        self.root().depth
    }

    /// Number of keys inserted (duplicates included)
    #[inline]
    pub fn len(&self) -> usize {
        self.keys
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Number of nodes, root included
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Candidate ids stored under exactly `key`
    #[cfg(test)]
    fn get(&self, key: &[Unit]) -> &[usize] {
        let mut id = ROOT;
        for unit in key {
            match self.node(id).child(unit) {
                Some(child) => id = child,
                None => return &[],
            }
        }
        self.node(id).candidates()
    }
}
