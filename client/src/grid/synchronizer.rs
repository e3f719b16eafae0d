use std::{cell::RefCell, rc::Rc};

use widget_sync_shared::{
    HandlerContext, HandlerError, Millis, ObjectRegistry, Properties, RemoteId, RemoteObject,
    Value,
};

use crate::grid::{
    model::{NodeId, TreeModel},
    tree::GridItem,
};

/// How long the remote side may wait before it is asked for item data
/// after the visible range moved
pub const SET_DATA_SEND_DELAY: Millis = 400;

#[derive(Default)]
struct ScrollState {
    top_item_index: Option<usize>,
    scroll_left: Option<i64>,
    hook_pending: bool,
}

/// Turns local tree changes into outbound operations.
///
/// Remote-originated changes reach the tree through the same code paths but
/// are dropped here, because the channel is suspended while inbound
/// operations apply.
#[derive(Default)]
pub struct GridSynchronizer {
    scroll: Rc<RefCell<ScrollState>>,
}

impl GridSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id under which the remote side knows `node`: the id of its
    /// registered `GridItem`, otherwise `<parent id>#<index>`. The root
    /// resolves to the tree itself.
    pub fn item_id(model: &TreeModel, node: NodeId, registry: &ObjectRegistry) -> Option<RemoteId> {
        if node == NodeId::ROOT {
            return Some(model.tree_id().clone());
        }
        if let Some(object) = model.object(node).and_then(|object| object.upgrade()) {
            if let Some(id) = registry.find_id(&object) {
                return Some(id.clone());
            }
        }
        let parent = model.parent(node)?;
        let index = model.index(node)?;
        let parent_id = Self::item_id(model, parent, registry)?;
        Some(RemoteId::synthetic(&parent_id, index))
    }

    /// Inverse of [`GridSynchronizer::item_id`]. Synthetic ids materialize
    /// the nodes they name.
    pub fn resolve_item(
        model: &Rc<RefCell<TreeModel>>,
        id: &RemoteId,
        registry: &ObjectRegistry,
    ) -> Result<NodeId, HandlerError> {
        if id == model.borrow().tree_id() {
            return Ok(NodeId::ROOT);
        }

        if let Some(object) = registry.object(id) {
            let object = object
                .try_borrow()
                .map_err(|_| HandlerError::ObjectBusy { id: id.to_string() })?;
            return match object.downcast_ref::<GridItem>() {
                Some(item) if Rc::ptr_eq(item.model(), model) => Ok(item.node()),
                _ => Err(HandlerError::UnknownReference { id: id.to_string() }),
            };
        }

        let Some((parent_id, index)) = id.split_synthetic() else {
            return Err(HandlerError::UnknownReference { id: id.to_string() });
        };
        let parent = Self::resolve_item(model, &parent_id, registry)?;
        let node = model.borrow_mut().materialize(parent, index);
        node.ok_or_else(|| HandlerError::UnknownReference { id: id.to_string() })
    }

    pub fn selection_changed(
        &self,
        model: &TreeModel,
        selection: &[NodeId],
        item: Option<NodeId>,
        context: &HandlerContext<'_>,
    ) {
        let registry = context.registry();
        let ids: Vec<Value> = selection
            .iter()
            .filter_map(|node| Self::item_id(model, *node, registry))
            .map(|id| Value::from(&id))
            .collect();

        let tree = context.remote_object_for(model.tree_id());
        if !tree.set("selection", ids) {
            return;
        }
        if tree.is_listening("Selection") {
            tree.notify("Selection", item_payload(model, item, registry));
        }
    }

    pub fn focus_item_changed(
        &self,
        model: &TreeModel,
        focus_item: Option<NodeId>,
        context: &HandlerContext<'_>,
    ) {
        let id = focus_item
            .and_then(|node| Self::item_id(model, node, context.registry()))
            .map_or(Value::Null, |id| Value::from(&id));
        context
            .remote_object_for(model.tree_id())
            .set("focusItem", id);
    }

    /// Scroll offsets change continuously; only the last value of a send
    /// window is sent, right before the batch goes out
    pub fn top_item_index_changed(
        &self,
        tree_id: &RemoteId,
        top_item_index: usize,
        context: &HandlerContext<'_>,
    ) {
        let tree = context.remote_object_for(tree_id);
        if tree.is_suspended() {
            return;
        }
        self.scroll.borrow_mut().top_item_index = Some(top_item_index);
        self.sync_scroll_on_next_send(&tree);

        if tree.is_listening("SetData") {
            tree.send_delayed(SET_DATA_SEND_DELAY);
        }
    }

    pub fn scroll_left_changed(
        &self,
        tree_id: &RemoteId,
        scroll_left: i64,
        context: &HandlerContext<'_>,
    ) {
        let tree = context.remote_object_for(tree_id);
        if tree.is_suspended() {
            return;
        }
        self.scroll.borrow_mut().scroll_left = Some(scroll_left);
        self.sync_scroll_on_next_send(&tree);
    }

    fn sync_scroll_on_next_send(&self, tree: &RemoteObject) {
        if self.scroll.borrow().hook_pending {
            return;
        }

        let scroll = self.scroll.clone();
        let hook_tree = tree.clone();
        let registered = tree.on_next_send(move || {
            let mut scroll = scroll.borrow_mut();
            scroll.hook_pending = false;
            if let Some(top_item_index) = scroll.top_item_index.take() {
                hook_tree.set("topItemIndex", top_item_index);
            }
            if let Some(scroll_left) = scroll.scroll_left.take() {
                hook_tree.set("scrollLeft", scroll_left);
            }
        });
        self.scroll.borrow_mut().hook_pending = registered;
    }

    pub fn item_height_changed(
        &self,
        tree_id: &RemoteId,
        item_height: usize,
        context: &HandlerContext<'_>,
    ) {
        context
            .remote_object_for(tree_id)
            .set("itemHeight", item_height);
    }

    pub fn default_selection(&self, model: &TreeModel, node: NodeId, context: &HandlerContext<'_>) {
        let tree = context.remote_object_for(model.tree_id());
        if tree.is_listening("DefaultSelection") {
            tree.notify_uncoalesced(
                "DefaultSelection",
                item_payload(model, Some(node), context.registry()),
            );
        }
    }

    /// Stages the new state on the item and tells the tree, if it listens.
    /// Each expand or collapse is its own notification.
    pub fn expanded_changed(
        model: &TreeModel,
        node: NodeId,
        expanded: bool,
        context: &HandlerContext<'_>,
    ) {
        let registry = context.registry();
        let Some(item_id) = Self::item_id(model, node, registry) else {
            return;
        };
        if !context.remote_object_for(&item_id).set("expanded", expanded) {
            return;
        }

        let event = if expanded { "Expand" } else { "Collapse" };
        let tree = context.remote_object_for(model.tree_id());
        if tree.is_listening(event) {
            tree.notify_uncoalesced(event, item_payload(model, Some(node), registry));
        }
    }
}

fn item_payload(model: &TreeModel, item: Option<NodeId>, registry: &ObjectRegistry) -> Properties {
    let mut payload = Properties::new();
    let item = item
        .and_then(|node| GridSynchronizer::item_id(model, node, registry))
        .map_or(Value::Null, |id| Value::from(&id));
    payload.insert("item".to_string(), item);
    payload
}
