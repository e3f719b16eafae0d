use std::{cell::RefCell, rc::Rc};

use widget_sync_shared::{ClientObject, HandlerContext, ObjectRegistry, RemoteId};

use crate::grid::{
    model::{NodeId, TreeModel},
    synchronizer::GridSynchronizer,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// Selects only the given item
    Replace,
    /// Adds or removes the item; same as `Replace` on single selection trees
    Toggle,
}

/// Client side of a `rwt.widgets.Grid`.
///
/// Every mutator takes the handler context of the call: user interaction
/// (local origin) is staged for the remote side, the same mutation applied
/// from an inbound operation is not.
pub struct Tree {
    model: Rc<RefCell<TreeModel>>,
    multi_selection: bool,
    item_height: usize,
    top_item_index: usize,
    scroll_left: i64,
    selection: Vec<NodeId>,
    focus_item: Option<NodeId>,
    sync: GridSynchronizer,
}

impl ClientObject for Tree {}

impl Tree {
    pub fn new(id: RemoteId, multi_selection: bool) -> Self {
        Self {
            model: Rc::new(RefCell::new(TreeModel::new(id))),
            multi_selection,
            item_height: 0,
            top_item_index: 0,
            scroll_left: 0,
            selection: Vec::new(),
            focus_item: None,
            sync: GridSynchronizer::new(),
        }
    }

    pub fn model(&self) -> &Rc<RefCell<TreeModel>> {
        &self.model
    }

    pub fn is_multi_selection(&self) -> bool {
        self.multi_selection
    }

    pub fn item_count(&self) -> usize {
        self.model.borrow().item_count(NodeId::ROOT)
    }

    pub fn item_height(&self) -> usize {
        self.item_height
    }

    pub fn top_item_index(&self) -> usize {
        self.top_item_index
    }

    pub fn scroll_left(&self) -> i64 {
        self.scroll_left
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn focus_item(&self) -> Option<NodeId> {
        self.focus_item
    }

    /// Node in slot `index` of `parent`, materialized on first access
    pub fn item(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.model.borrow_mut().materialize(parent, index)
    }

    pub fn item_id(&self, node: NodeId, registry: &ObjectRegistry) -> Option<RemoteId> {
        GridSynchronizer::item_id(&self.model.borrow(), node, registry)
    }

    pub fn set_item_count(&mut self, count: usize, context: &HandlerContext<'_>) {
        self.model
            .borrow_mut()
            .set_item_count(NodeId::ROOT, count);
        self.forget_removed_items(context);
        self.clamp_top_item_index(context);
    }

    pub fn select(&mut self, node: NodeId, mode: SelectionMode, context: &HandlerContext<'_>) -> bool {
        if node == NodeId::ROOT || !self.model.borrow().contains(node) {
            return false;
        }

        match mode {
            SelectionMode::Toggle if self.multi_selection => {
                if let Some(position) = self.selection.iter().position(|selected| *selected == node) {
                    self.selection.remove(position);
                } else {
                    self.selection.push(node);
                }
            }
            _ => {
                self.selection.clear();
                self.selection.push(node);
            }
        }

        let model = self.model.borrow();
        self.sync
            .selection_changed(&model, &self.selection, Some(node), context);
        if self.focus_item != Some(node) {
            self.focus_item = Some(node);
            self.sync.focus_item_changed(&model, self.focus_item, context);
        }
        true
    }

    /// Double click or enter on an item
    pub fn default_select(&mut self, node: NodeId, context: &HandlerContext<'_>) -> bool {
        if !self.select(node, SelectionMode::Replace, context) {
            return false;
        }
        self.sync
            .default_selection(&self.model.borrow(), node, context);
        true
    }

    pub fn set_selection(&mut self, selection: Vec<NodeId>, context: &HandlerContext<'_>) {
        let model = self.model.borrow();
        self.selection = selection
            .into_iter()
            .filter(|node| *node != NodeId::ROOT && model.contains(*node))
            .collect();
        self.sync
            .selection_changed(&model, &self.selection, None, context);
    }

    pub fn set_focus_item(&mut self, focus_item: Option<NodeId>, context: &HandlerContext<'_>) {
        if self.focus_item == focus_item {
            return;
        }
        self.focus_item = focus_item;
        self.sync
            .focus_item_changed(&self.model.borrow(), focus_item, context);
    }

    /// Scrolls vertically; clamped to the last visible row
    pub fn set_top_item_index(&mut self, top_item_index: usize, context: &HandlerContext<'_>) {
        let last_row = self.model.borrow().visible_row_count().saturating_sub(1);
        let top_item_index = top_item_index.min(last_row);
        if self.top_item_index == top_item_index {
            return;
        }
        self.top_item_index = top_item_index;
        let tree_id = self.model.borrow().tree_id().clone();
        self.sync
            .top_item_index_changed(&tree_id, top_item_index, context);
    }

    pub fn set_scroll_left(&mut self, scroll_left: i64, context: &HandlerContext<'_>) {
        if self.scroll_left == scroll_left {
            return;
        }
        self.scroll_left = scroll_left;
        let tree_id = self.model.borrow().tree_id().clone();
        self.sync
            .scroll_left_changed(&tree_id, scroll_left, context);
    }

    /// Scrolls so that `node` is the top row; returns `false` if it is
    /// hidden under a collapsed ancestor
    pub fn scroll_to_item(&mut self, node: NodeId, context: &HandlerContext<'_>) -> bool {
        let Some(row) = self.model.borrow().flat_index(node) else {
            return false;
        };
        self.set_top_item_index(row, context);
        true
    }

    pub fn set_expanded(&mut self, node: NodeId, expanded: bool, context: &HandlerContext<'_>) -> bool {
        if !self.model.borrow_mut().set_expanded(node, expanded) {
            return false;
        }
        GridSynchronizer::expanded_changed(&self.model.borrow(), node, expanded, context);
        if !expanded {
            self.clamp_top_item_index(context);
        }
        true
    }

    pub fn set_item_height(&mut self, item_height: usize, context: &HandlerContext<'_>) {
        if self.item_height == item_height {
            return;
        }
        self.item_height = item_height;
        let tree_id = self.model.borrow().tree_id().clone();
        self.sync
            .item_height_changed(&tree_id, item_height, context);
    }

    /// Drops all items, for disposal
    pub fn clear(&mut self) {
        self.model.borrow_mut().clear();
        self.selection.clear();
        self.focus_item = None;
        self.top_item_index = 0;
    }

    fn forget_removed_items(&mut self, context: &HandlerContext<'_>) {
        let model = self.model.borrow();
        let before = self.selection.len();
        self.selection.retain(|node| model.contains(*node));
        if self.selection.len() != before {
            self.sync
                .selection_changed(&model, &self.selection, None, context);
        }
        if self.focus_item.is_some_and(|node| !model.contains(node)) {
            self.focus_item = None;
            self.sync.focus_item_changed(&model, None, context);
        }
    }

    fn clamp_top_item_index(&mut self, context: &HandlerContext<'_>) {
        let top_item_index = self.top_item_index;
        self.set_top_item_index(top_item_index, context);
    }
}

/// Client side of a `rwt.widgets.GridItem`: a handle on one node of its
/// tree's model
pub struct GridItem {
    model: Rc<RefCell<TreeModel>>,
    node: NodeId,
}

impl ClientObject for GridItem {}

impl GridItem {
    pub fn new(model: Rc<RefCell<TreeModel>>, node: NodeId) -> Self {
        Self { model, node }
    }

    pub fn model(&self) -> &Rc<RefCell<TreeModel>> {
        &self.model
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn item_count(&self) -> usize {
        self.model.borrow().item_count(self.node)
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.model.borrow_mut().set_item_count(self.node, count);
    }

    pub fn texts(&self) -> Vec<String> {
        self.model.borrow().texts(self.node).to_vec()
    }

    pub fn set_texts(&mut self, texts: Vec<String>) {
        self.model.borrow_mut().set_texts(self.node, texts);
    }

    pub fn is_expanded(&self) -> bool {
        self.model.borrow().is_expanded(self.node)
    }

    pub fn set_expanded(&mut self, expanded: bool, context: &HandlerContext<'_>) {
        if self.model.borrow_mut().set_expanded(self.node, expanded) {
            GridSynchronizer::expanded_changed(&self.model.borrow(), self.node, expanded, context);
        }
    }

    /// Removes the node and everything below it
    pub fn dispose(&mut self) {
        self.model.borrow_mut().remove(self.node);
    }
}
