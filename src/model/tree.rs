use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// N-ary tree.
///
/// Only structure lives here. Everything attached to a node (its kind, weight,
/// MRU pointer) is kept by the observer `O`, which is notified of every
/// structural change.
#[derive(Serialize, Deserialize)]
pub struct Tree<O> {
    pub map: NodeMap,
    pub data: O,
}

impl Tree<()> {
    pub fn new() -> Self { Self::with_observer(()) }
}

impl<O: Observer> Tree<O> {
    pub fn with_observer(data: O) -> Self { Tree { map: NodeMap::new(), data } }

    /// Creates a detached node. It stays a root until it is linked somewhere.
    pub fn mk_node(&mut self) -> NodeId {
        let id = self.map.map.insert(Node::default());
        self.data.added_to_forest(&self.map, id);
        id
    }

    /// Links a detached node under `parent` at `index`. An index past the end
    /// appends.
    #[track_caller]
    pub fn link(&mut self, node: NodeId, parent: NodeId, index: BindIndex) {
        assert!(
            node.parent(&self.map).is_none(),
            "link called on already linked node {node:?}"
        );
        assert!(
            !parent.ancestors(&self.map).any(|ancestor| ancestor == node),
            "cannot link {node:?} into its own subtree"
        );
        let next = match index {
            BindIndex::At(index) => parent.children(&self.map).nth(index),
            BindIndex::Last => None,
        };
        let prev = match next {
            Some(next) => next.prev_sibling(&self.map),
            None => parent.last_child(&self.map),
        };
        self.map.splice(node, parent, prev, next);
        self.data.added_to_parent(&self.map, node);
    }

    /// Detaches a node from its parent, keeping its subtree intact. Returns
    /// the index the node had, or `None` if it was already a root.
    #[track_caller]
    pub fn unlink(&mut self, node: NodeId) -> Option<usize> {
        let index = node.own_index(&self.map)?;
        self.data.removing_from_parent(&self.map, node);
        self.map.unlink(node);
        Some(index)
    }

    /// Removes a node and its whole subtree from the forest.
    #[track_caller]
    pub fn remove(&mut self, node: NodeId) {
        self.unlink(node);
        if let Some(removed) = self.map.map.remove(node) {
            removed.delete_recursive(self, node);
        }
    }
}

/// Position used when linking a node under a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindIndex {
    At(usize),
    Last,
}

/// Map that holds the structure of the tree.
///
/// Multiple trees can be contained within a map. This also makes it easier
/// to move branches between trees.
#[derive(Serialize, Deserialize)]
pub struct NodeMap {
    map: SlotMap<NodeId, Node>,
}

impl NodeMap {
    fn new() -> NodeMap { NodeMap { map: SlotMap::default() } }

    pub fn contains(&self, id: NodeId) -> bool { self.map.contains_key(id) }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    fn splice(&mut self, node: NodeId, parent: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        {
            let this = &mut self.map[node];
            this.parent = Some(parent);
            this.prev_sibling = prev;
            this.next_sibling = next;
        }
        match prev {
            Some(prev) => self.map[prev].next_sibling = Some(node),
            None => self.map[parent].first_child = Some(node),
        }
        match next {
            Some(next) => self.map[next].prev_sibling = Some(node),
            None => self.map[parent].last_child = Some(node),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(node) = self.map.get_mut(id) else { return };
        let prev = node.prev_sibling.take();
        let next = node.next_sibling.take();
        let Some(parent) = node.parent.take() else { return };
        match prev {
            Some(prev) => self.map[prev].next_sibling = next,
            None => self.map[parent].first_child = next,
        }
        match next {
            Some(next) => self.map[next].prev_sibling = prev,
            None => self.map[parent].last_child = prev,
        }
    }
}

impl Index<NodeId> for NodeMap {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output { &self.map[index] }
}

impl IndexMut<NodeId> for NodeMap {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output { &mut self.map[index] }
}

slotmap::new_key_type! {
    /// Represents a node somewhere in the tree.
    pub struct NodeId;
}

impl NodeId {
    pub fn parent(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.parent)
    }

    pub fn children(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        ChildIterator {
            cur: map.map.get(self).and_then(|n| n.first_child),
            map,
            forward: true,
        }
    }

    pub fn children_rev(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        ChildIterator {
            cur: map.map.get(self).and_then(|n| n.last_child),
            map,
            forward: false,
        }
    }

    pub fn nth_child(self, map: &NodeMap, index: usize) -> Option<NodeId> {
        self.children(map).nth(index)
    }

    pub fn child_count(self, map: &NodeMap) -> usize { self.children(map).count() }

    /// Position of this node among its siblings; `None` for roots.
    pub fn own_index(self, map: &NodeMap) -> Option<usize> {
        let parent = self.parent(map)?;
        parent.children(map).position(|child| child == self)
    }

    /// Returns an iterator over all ancestors of the current node, including itself.
    pub fn ancestors(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = Some(self);
        std::iter::from_fn(move || {
            let node = next;
            next = node.and_then(|n| n.parent(map));
            node
        })
    }

    pub fn root(self, map: &NodeMap) -> NodeId {
        self.ancestors(map).last().unwrap_or(self)
    }

    pub fn traverse_preorder(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        PreorderTraversal { top: self, cur: Some(self), map }
    }

    pub fn next_sibling(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.next_sibling)
    }

    pub fn prev_sibling(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.prev_sibling)
    }

    pub fn first_child(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.first_child)
    }

    pub fn last_child(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.last_child)
    }

    pub fn is_empty(self, map: &NodeMap) -> bool {
        map.map.get(self).map(|n| n.first_child.is_none()).unwrap_or(true)
    }
}

pub trait Observer
where Self: Sized {
    fn added_to_forest(&mut self, map: &NodeMap, node: NodeId);
    fn added_to_parent(&mut self, map: &NodeMap, node: NodeId);
    fn removing_from_parent(&mut self, map: &NodeMap, node: NodeId);
    fn removed_from_forest(&mut self, map: &NodeMap, node: NodeId);
}

impl Observer for () {
    fn added_to_forest(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn added_to_parent(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn removing_from_parent(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn removed_from_forest(&mut self, _map: &NodeMap, _node: NodeId) {}
}

#[derive(Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct Node {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl Node {
    fn delete_recursive(&self, tree: &mut Tree<impl Observer>, id: NodeId) {
        tree.data.removed_from_forest(&tree.map, id);
        let mut iter = self.first_child;
        while let Some(child) = iter {
            let removed = tree.map.map.remove(child);
            iter = removed.as_ref().and_then(|n| n.next_sibling);
            if let Some(node) = removed {
                node.delete_recursive(tree, child);
            }
        }
    }
}

struct ChildIterator<'a> {
    cur: Option<NodeId>,
    map: &'a NodeMap,
    forward: bool,
}

impl<'a> Iterator for ChildIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        self.cur = if self.forward {
            id.next_sibling(self.map)
        } else {
            id.prev_sibling(self.map)
        };
        Some(id)
    }
}

struct PreorderTraversal<'a> {
    top: NodeId,
    cur: Option<NodeId>,
    map: &'a NodeMap,
}

impl<'a> Iterator for PreorderTraversal<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.first_child(self.map).or_else(|| {
            node.ancestors(self.map)
                .take_while(|&ancestor| ancestor != self.top)
                .find_map(|ancestor| ancestor.next_sibling(self.map))
        });
        Some(node)
    }
}
