use std::{cell::RefCell, rc::Rc};

use widget_sync_shared::{
    object_ref, value, HandlerContext, HandlerError, HandlerPlugin, HandlerRegistry, ObjectRef,
    Properties, TypeHandler, Value,
};

use crate::grid::{
    model::NodeId,
    synchronizer::GridSynchronizer,
    tree::{GridItem, Tree},
};

pub const GRID_TYPE: &str = "rwt.widgets.Grid";
pub const GRID_ITEM_TYPE: &str = "rwt.widgets.GridItem";

/// Registers the tree/grid widget and its items
pub struct GridPlugin;

impl HandlerPlugin for GridPlugin {
    fn build(&self, registry: &mut HandlerRegistry) -> Result<(), HandlerError> {
        registry.add(grid_handler()?)?.add(grid_item_handler()?)?;
        Ok(())
    }
}

fn grid_handler() -> Result<TypeHandler, HandlerError> {
    TypeHandler::builder(GRID_TYPE, create_tree)
        .property::<Tree, _>("itemCount", |tree, value, context| {
            tree.set_item_count(value::as_usize("itemCount", value)?, context);
            Ok(())
        })
        .property::<Tree, _>("itemHeight", |tree, value, context| {
            tree.set_item_height(value::as_usize("itemHeight", value)?, context);
            Ok(())
        })
        // clamped against the rows `itemCount` produced
        .property::<Tree, _>("topItemIndex", |tree, value, context| {
            tree.set_top_item_index(value::as_usize("topItemIndex", value)?, context);
            Ok(())
        })
        .property::<Tree, _>("scrollLeft", |tree, value, context| {
            tree.set_scroll_left(value::as_i64("scrollLeft", value)?, context);
            Ok(())
        })
        .property::<Tree, _>("selection", |tree, value, context| {
            let mut selection = Vec::new();
            for id in value::as_id_list("selection", value)? {
                selection.push(GridSynchronizer::resolve_item(
                    tree.model(),
                    &id,
                    context.registry(),
                )?);
            }
            tree.set_selection(selection, context);
            Ok(())
        })
        .property::<Tree, _>("focusItem", |tree, value, context| {
            let focus_item = match value::as_optional_id("focusItem", value)? {
                Some(id) => Some(GridSynchronizer::resolve_item(
                    tree.model(),
                    &id,
                    context.registry(),
                )?),
                None => None,
            };
            tree.set_focus_item(focus_item, context);
            Ok(())
        })
        .events(&["Selection", "DefaultSelection", "Expand", "Collapse", "SetData"])
        .method::<Tree, _>("scrollToItem", |tree, args, context| {
            let Some(item) = args.first() else {
                return Err(HandlerError::MissingProperty {
                    property: "item".to_string(),
                });
            };
            let id = value::as_id("item", item)?;
            let node = GridSynchronizer::resolve_item(tree.model(), &id, context.registry())?;
            tree.scroll_to_item(node, context);
            Ok(())
        })
        .scripting_method::<Tree, _>("getSelection", |tree, _, context| {
            let ids: Vec<Value> = tree
                .selection()
                .iter()
                .filter_map(|node| tree.item_id(*node, context.registry()))
                .map(|id| Value::from(&id))
                .collect();
            Ok(Value::Array(ids))
        })
        .destructor::<Tree, _>(|tree, _| {
            tree.clear();
            Ok(())
        })
        .build()
}

fn create_tree(
    properties: &Properties,
    context: &mut HandlerContext<'_>,
) -> Result<ObjectRef, HandlerError> {
    let multi_selection = match properties.get("style") {
        Some(style) => value::as_string_list("style", style)?
            .iter()
            .any(|flag| flag == "MULTI"),
        None => false,
    };
    Ok(object_ref(Tree::new(context.id().clone(), multi_selection)))
}

fn grid_item_handler() -> Result<TypeHandler, HandlerError> {
    TypeHandler::builder(GRID_ITEM_TYPE, create_grid_item)
        .property::<GridItem, _>("itemCount", |item, value, _| {
            item.set_item_count(value::as_usize("itemCount", value)?);
            Ok(())
        })
        .property::<GridItem, _>("texts", |item, value, _| {
            item.set_texts(value::as_string_list("texts", value)?);
            Ok(())
        })
        .property::<GridItem, _>("expanded", |item, value, context| {
            item.set_expanded(value::as_bool("expanded", value)?, context);
            Ok(())
        })
        .destructor::<GridItem, _>(|item, _| {
            item.dispose();
            Ok(())
        })
        .build()
}

/// Binds the new item to slot `index` of `parent`, a tree or another item.
/// The parent grows if the slot is beyond its current item count.
fn create_grid_item(
    properties: &Properties,
    context: &mut HandlerContext<'_>,
) -> Result<ObjectRef, HandlerError> {
    let parent_id = value::as_id("parent", required(properties, "parent")?)?;
    let index = value::as_usize("index", required(properties, "index")?)?;

    let Some(parent) = context.registry().object(&parent_id) else {
        return Err(HandlerError::UnknownReference {
            id: parent_id.to_string(),
        });
    };
    let (model, parent_node) = {
        let parent = parent.try_borrow().map_err(|_| HandlerError::ObjectBusy {
            id: parent_id.to_string(),
        })?;
        if let Some(tree) = parent.downcast_ref::<Tree>() {
            (tree.model().clone(), NodeId::ROOT)
        } else if let Some(item) = parent.downcast_ref::<GridItem>() {
            (item.model().clone(), item.node())
        } else {
            return Err(HandlerError::InvalidValue {
                property: "parent".to_string(),
                expected: "the id of a Grid or GridItem",
            });
        }
    };

    let node = {
        let mut model = model.borrow_mut();
        if index >= model.item_count(parent_node) {
            model.set_item_count(parent_node, index + 1);
        }
        let node = model.materialize(parent_node, index).ok_or_else(|| {
            HandlerError::UnknownReference {
                id: parent_id.to_string(),
            }
        })?;
        if model.object(node).is_some() {
            return Err(HandlerError::InvalidValue {
                property: "index".to_string(),
                expected: "an item slot without a GridItem",
            });
        }
        node
    };

    let item = Rc::new(RefCell::new(GridItem::new(model.clone(), node)));
    model.borrow_mut().attach(node, Rc::downgrade(&item));
    let object: ObjectRef = item;
    Ok(object)
}

fn required<'p>(properties: &'p Properties, name: &str) -> Result<&'p Value, HandlerError> {
    properties.get(name).ok_or_else(|| HandlerError::MissingProperty {
        property: name.to_string(),
    })
}
