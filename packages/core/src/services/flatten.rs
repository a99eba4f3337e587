//! Flat uid index over a built tree
//!
//! Maps each `_uid` to its node and records parent links so ancestry can be
//! walked without re-traversing the tree. Nodes with an empty uid are skipped.
//! When a uid occurs more than once the first node in pre-order wins.

use crate::models::ContentNode;
use std::collections::HashMap;

/// Borrowed index of a content tree keyed by uid
#[derive(Debug, Clone)]
pub struct FlatIndex<'a> {
    nodes: HashMap<&'a str, &'a ContentNode>,
    parents: HashMap<&'a str, &'a str>,
    order: Vec<&'a str>,
}

impl<'a> FlatIndex<'a> {
    pub fn build(root: &'a ContentNode) -> Self {
        let mut index = Self {
            nodes: HashMap::new(),
            parents: HashMap::new(),
            order: Vec::new(),
        };
        index.visit(root, None);
        index
    }

    fn visit(&mut self, node: &'a ContentNode, parent_uid: Option<&'a str>) {
        let uid = node.uid();
        // Ancestors with no uid are transparent for parent links
        let mut next_parent = parent_uid;

        if !uid.is_empty() {
            if self.nodes.contains_key(uid) {
                tracing::debug!(uid, "Duplicate uid in tree, keeping first occurrence");
            } else {
                self.nodes.insert(uid, node);
                self.order.push(uid);
                if let Some(parent) = parent_uid {
                    self.parents.insert(uid, parent);
                }
            }
            next_parent = Some(uid);
        }

        for child in node.children() {
            self.visit(child, next_parent);
        }
    }

    pub fn get(&self, uid: &str) -> Option<&'a ContentNode> {
        self.nodes.get(uid).copied()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.nodes.contains_key(uid)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indexed nodes in pre-order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ContentNode)> + '_ {
        self.order.iter().filter_map(|uid| self.nodes.get(uid).map(|n| (*uid, *n)))
    }

    /// Nearest indexed ancestor of `uid`
    pub fn parent_of(&self, uid: &str) -> Option<&'a ContentNode> {
        self.parents.get(uid).and_then(|parent| self.get(parent))
    }

    /// Indexed ancestors of `uid`, nearest first
    pub fn ancestors(&self, uid: &str) -> Vec<&'a ContentNode> {
        let mut result = Vec::new();
        let mut current = uid;
        // Parent links always point at an earlier indexed uid, so this ends
        while let Some(&parent) = self.parents.get(current) {
            if let Some(node) = self.get(parent) {
                result.push(node);
            }
            current = parent;
        }
        result
    }
}
