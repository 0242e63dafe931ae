use serde::{Deserialize, Serialize};

use crate::model::tree::{NodeId, NodeMap};

#[derive(Copy, Clone, Debug)]
pub enum TreeEvent {
    AddedToForest(NodeId),
    AddedToParent(NodeId),
    RemovingFromParent(NodeId),
    RemovedFromForest(NodeId),
}

/// Per-container pointer to the child that most recently led to a focused
/// window.
///
/// The pointer is advisory: it never keeps a node alive, and it is repaired
/// when the recorded child leaves its parent.
#[derive(Default, Serialize, Deserialize)]
pub struct Mru {
    nodes: slotmap::SecondaryMap<NodeId, NodeId>,
}

impl Mru {
    /// The recorded child of `node`, if any.
    pub fn recorded_child(&self, node: NodeId) -> Option<NodeId> { self.nodes.get(node).copied() }

    /// The recorded child of `node`, falling back to its first child.
    pub fn most_recent_child(&self, map: &NodeMap, node: NodeId) -> Option<NodeId> {
        match self.nodes.get(node) {
            Some(&child) => {
                debug_assert_eq!(child.parent(map), Some(node));
                Some(child)
            }
            None => node.first_child(map),
        }
    }

    /// Overwrites the recorded child of `node`.
    pub fn set_recorded(&mut self, node: NodeId, child: Option<NodeId>) {
        match child {
            Some(child) => {
                self.nodes.insert(node, child);
            }
            None => {
                self.nodes.remove(node);
            }
        }
    }

    /// Marks `node` as the most recent child of every ancestor on its path to
    /// the root.
    pub fn mark(&mut self, map: &NodeMap, node: NodeId) {
        let mut node = node;
        while let Some(parent) = node.parent(map) {
            self.nodes.insert(parent, node);
            node = parent;
        }
    }

    /// Follows most-recent pointers down from `node` until reaching a node
    /// without children.
    pub fn most_recent_leaf(&self, map: &NodeMap, node: NodeId) -> NodeId {
        let mut node = node;
        while let Some(child) = self.most_recent_child(map, node) {
            node = child;
        }
        node
    }

    pub fn handle_event(&mut self, map: &NodeMap, event: TreeEvent) {
        use TreeEvent::*;
        match event {
            AddedToForest(_node) => {}
            AddedToParent(_node) => {}
            RemovingFromParent(node) => {
                let Some(parent) = node.parent(map) else { return };
                if self.nodes.get(parent) == Some(&node) {
                    if let Some(fallback) = node.next_sibling(map).or(node.prev_sibling(map)) {
                        self.nodes[parent] = fallback;
                    } else {
                        self.nodes.remove(parent);
                    }
                }
            }
            RemovedFromForest(node) => {
                self.nodes.remove(node);
            }
        }
    }
}
