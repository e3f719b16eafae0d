use std::{cell::RefCell, collections::HashMap, rc::Weak};

use widget_sync_shared::RemoteId;

use crate::grid::tree::GridItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Invisible root; its children are the top-level rows
    pub const ROOT: NodeId = NodeId(0);
}

struct Node {
    parent: Option<NodeId>,
    index: usize,
    children: Vec<Option<NodeId>>,
    texts: Vec<String>,
    expanded: bool,
    object: Option<Weak<RefCell<GridItem>>>,
}

impl Node {
    fn new(parent: Option<NodeId>, index: usize) -> Self {
        Self {
            parent,
            index,
            children: Vec::new(),
            texts: Vec::new(),
            expanded: false,
            object: None,
        }
    }
}

/// Item hierarchy of one tree.
///
/// Only the item count of a node is known up front; child nodes are
/// materialized lazily, either because the remote side created a `GridItem`
/// for the slot or because local code touched it first.
pub struct TreeModel {
    tree_id: RemoteId,
    nodes: HashMap<NodeId, Node>,
    next_node: u64,
}

impl TreeModel {
    pub fn new(tree_id: RemoteId) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, Node::new(None, 0));
        Self {
            tree_id,
            nodes,
            next_node: 1,
        }
    }

    /// Id of the tree that owns this model
    pub fn tree_id(&self) -> &RemoteId {
        &self.tree_id
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|node| node.parent)
    }

    /// Position of `node` among its siblings
    pub fn index(&self, node: NodeId) -> Option<usize> {
        self.nodes.get(&node).map(|node| node.index)
    }

    pub fn item_count(&self, node: NodeId) -> usize {
        self.nodes
            .get(&node)
            .map_or(0, |node| node.children.len())
    }

    /// Resizes the child slots of `node`; dropped slots lose their subtrees
    pub fn set_item_count(&mut self, node: NodeId, count: usize) -> bool {
        let Some(entry) = self.nodes.get_mut(&node) else {
            return false;
        };
        let dropped: Vec<NodeId> = if count < entry.children.len() {
            entry.children.drain(count..).flatten().collect()
        } else {
            entry.children.resize(count, None);
            Vec::new()
        };
        for child in dropped {
            self.remove_subtree(child);
        }
        true
    }

    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.nodes
            .get(&parent)
            .and_then(|node| node.children.get(index).copied().flatten())
    }

    /// Returns the node in slot `index` of `parent`, creating it if the slot
    /// exists but was never touched
    pub fn materialize(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let next_node = NodeId(self.next_node);
        let slot = self.nodes.get_mut(&parent)?.children.get_mut(index)?;
        if let Some(existing) = slot {
            return Some(*existing);
        }
        *slot = Some(next_node);
        self.next_node += 1;
        self.nodes.insert(next_node, Node::new(Some(parent), index));
        Some(next_node)
    }

    /// Binds the client object standing for `node`
    pub fn attach(&mut self, node: NodeId, object: Weak<RefCell<GridItem>>) -> bool {
        let Some(entry) = self.nodes.get_mut(&node) else {
            return false;
        };
        entry.object = Some(object);
        true
    }

    /// Live client object bound to `node`, if any
    pub fn object(&self, node: NodeId) -> Option<Weak<RefCell<GridItem>>> {
        self.nodes
            .get(&node)
            .and_then(|node| node.object.clone())
            .filter(|object| object.strong_count() > 0)
    }

    pub fn texts(&self, node: NodeId) -> &[String] {
        match self.nodes.get(&node) {
            Some(node) => &node.texts,
            None => &[],
        }
    }

    pub fn set_texts(&mut self, node: NodeId, texts: Vec<String>) -> bool {
        let Some(entry) = self.nodes.get_mut(&node) else {
            return false;
        };
        entry.texts = texts;
        true
    }

    pub fn is_expanded(&self, node: NodeId) -> bool {
        node == NodeId::ROOT || self.nodes.get(&node).is_some_and(|node| node.expanded)
    }

    /// Returns whether the state actually changed
    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) -> bool {
        match self.nodes.get_mut(&node) {
            Some(entry) if node != NodeId::ROOT && entry.expanded != expanded => {
                entry.expanded = expanded;
                true
            }
            _ => false,
        }
    }

    /// Removes `node` with its whole subtree and frees its slot
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == NodeId::ROOT {
            return false;
        }
        let Some((parent, index)) = self.nodes.get(&node).map(|node| (node.parent, node.index))
        else {
            return false;
        };
        if let Some(slot) = parent
            .and_then(|parent| self.nodes.get_mut(&parent))
            .and_then(|parent| parent.children.get_mut(index))
        {
            *slot = None;
        }
        self.remove_subtree(node);
        true
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let mut pending = vec![node];
        while let Some(node) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&node) {
                pending.extend(removed.children.into_iter().flatten());
            }
        }
    }

    /// Drops every item, keeping the root
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.insert(NodeId::ROOT, Node::new(None, 0));
    }

    /// Rows a fully scrolled tree shows: every top-level item plus the
    /// children of expanded items
    pub fn visible_row_count(&self) -> usize {
        self.visible_rows_below(NodeId::ROOT)
    }

    fn visible_rows_below(&self, node: NodeId) -> usize {
        let Some(entry) = self.nodes.get(&node) else {
            return 0;
        };
        if !self.is_expanded(node) {
            return 0;
        }
        entry
            .children
            .iter()
            .map(|child| 1 + child.map_or(0, |child| self.visible_rows_below(child)))
            .sum()
    }

    /// Row of `node` counted over visible rows; `None` if an ancestor is
    /// collapsed
    pub fn flat_index(&self, node: NodeId) -> Option<usize> {
        if node == NodeId::ROOT || !self.contains(node) {
            return None;
        }
        let mut row = 0;
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            if !self.is_expanded(parent) {
                return None;
            }
            let index = self.index(current)?;
            let siblings = &self.nodes.get(&parent)?.children[..index];
            row += siblings
                .iter()
                .map(|sibling| 1 + sibling.map_or(0, |sibling| self.visible_rows_below(sibling)))
                .sum::<usize>();
            if parent != NodeId::ROOT {
                // the parent row itself
                row += 1;
            }
            current = parent;
        }
        Some(row)
    }
}
