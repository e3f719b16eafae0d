/// Tree/grid synchronization: local interaction goes out, the same state
/// arriving from the remote side does not come back.
use serde_json::json;

use widget_sync_client::{Connection, GridItem, NodeId, SelectionMode, Tree};
use widget_sync_shared::{Batch, Operation};
use widget_sync_test::{
    assert_nothing_sent, notifications, operations_for, props, test_connection,
    Recorder,
};

fn grid_connection(properties: serde_json::Value, events: &[(&str, bool)]) -> Connection {
    let recorder = Recorder::new();
    let mut connection = test_connection(&recorder);
    let report = connection.process_batch(Batch::new(vec![
        Operation::create("w2", "rwt.widgets.Grid", props(properties)),
        Operation::listen("w2", events),
    ]));
    assert!(report.is_clean(), "Unexpected failures: {:?}", report.failures());
    connection
}

#[test]
fn local_selection_is_sent_with_synthetic_ids() {
    let mut connection = grid_connection(json!({"itemCount": 3}), &[("Selection", true)]);

    let selected = connection
        .with_object::<Tree, _, _>("w2", |tree, context| {
            let node = tree.item(NodeId::ROOT, 1).expect("slot 1 exists");
            tree.select(node, SelectionMode::Replace, context)
        })
        .expect("tree registered");
    assert!(selected);

    let batch = connection.advance(0).expect("selection notify is due");
    assert_eq!(batch.property("w2", "selection"), Some(&json!(["w2#1"])));
    assert_eq!(batch.property("w2", "focusItem"), Some(&json!("w2#1")));
    assert_eq!(
        notifications(&batch, "w2"),
        vec![("Selection".to_string(), props(json!({"item": "w2#1"})))]
    );
}

#[test]
fn toggling_on_a_multi_selection_tree_coalesces_the_notify() {
    let mut connection = grid_connection(
        json!({"style": ["MULTI"], "itemCount": 3}),
        &[("Selection", true)],
    );

    connection
        .with_object::<Tree, _, _>("w2", |tree, context| {
            let first = tree.item(NodeId::ROOT, 0).expect("slot 0 exists");
            let third = tree.item(NodeId::ROOT, 2).expect("slot 2 exists");
            tree.select(first, SelectionMode::Replace, context);
            tree.select(third, SelectionMode::Toggle, context);
        })
        .expect("tree registered");

    let batch = connection.send_now().expect("selection staged");
    assert_eq!(batch.property("w2", "selection"), Some(&json!(["w2#0", "w2#2"])));
    assert_eq!(
        notifications(&batch, "w2"),
        vec![("Selection".to_string(), props(json!({"item": "w2#2"})))]
    );
}

#[test]
fn default_selection_is_never_merged() {
    let mut connection =
        grid_connection(json!({"itemCount": 2}), &[("DefaultSelection", true)]);

    connection
        .with_object::<Tree, _, _>("w2", |tree, context| {
            let node = tree.item(NodeId::ROOT, 0).expect("slot 0 exists");
            tree.default_select(node, context);
            tree.default_select(node, context);
        })
        .expect("tree registered");

    let batch = connection.send_now().expect("notifications staged");
    let events: Vec<String> = notifications(&batch, "w2")
        .into_iter()
        .map(|(event, _)| event)
        .collect();
    assert_eq!(events, vec!["DefaultSelection", "DefaultSelection"]);
}

#[test]
fn inbound_selection_materializes_items_without_echo() {
    let mut connection = grid_connection(json!({"itemCount": 2}), &[("Selection", true)]);
    connection.process_batch(Batch::new(vec![
        Operation::create(
            "w5",
            "rwt.widgets.GridItem",
            props(json!({"parent": "w2", "index": 1, "itemCount": 3})),
        ),
        Operation::set("w2", props(json!({"selection": ["w2#0", "w5#1"]}))),
    ]));

    let selection = connection
        .invoke_scripting("w2", "getSelection", &[])
        .expect("tree exposes getSelection");
    assert_eq!(selection, json!(["w2#0", "w5#1"]));
    assert_nothing_sent!(connection);
}

#[test]
fn unknown_selection_reference_is_reported() {
    let mut connection = grid_connection(json!({"itemCount": 2}), &[]);

    let report = connection.process_batch(Batch::new(vec![Operation::set(
        "w2",
        props(json!({"selection": ["w77"]})),
    )]));

    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].target.as_deref(), Some("w2"));
}

#[test]
fn scroll_position_is_read_right_before_sending() {
    let mut connection = grid_connection(json!({"itemCount": 10}), &[("SetData", true)]);

    connection
        .with_object::<Tree, _, _>("w2", |tree, context| {
            tree.set_top_item_index(3, context);
            tree.set_top_item_index(5, context);
            tree.set_scroll_left(20, context);
        })
        .expect("tree registered");

    assert!(connection.advance(399).is_none());
    let batch = connection.advance(1).expect("SetData requested a send");
    assert_eq!(batch.property("w2", "topItemIndex"), Some(&json!(5)));
    assert_eq!(batch.property("w2", "scrollLeft"), Some(&json!(20)));
    assert_eq!(operations_for(&batch, "w2").len(), 1);
    assert_nothing_sent!(connection);
}

#[test]
fn scrolling_without_set_data_waits_for_the_next_send() {
    let mut connection = grid_connection(json!({"itemCount": 10}), &[]);

    connection
        .with_object::<Tree, _, _>("w2", |tree, context| tree.set_top_item_index(4, context))
        .expect("tree registered");

    assert!(connection.advance(1000).is_none());
    let batch = connection.send_now().expect("hook stages the scroll position");
    assert_eq!(batch.property("w2", "topItemIndex"), Some(&json!(4)));
}

#[test]
fn destroying_the_tree_drops_its_pending_scroll() {
    let mut connection = grid_connection(json!({"itemCount": 10}), &[("SetData", true)]);

    connection
        .with_object::<Tree, _, _>("w2", |tree, context| tree.set_top_item_index(4, context))
        .expect("tree registered");
    assert_eq!(connection.outbound().deadline(), Some(400));

    let report = connection.process_batch(Batch::new(vec![Operation::destroy("w2")]));
    assert!(report.is_clean(), "Unexpected failures: {:?}", report.failures());

    assert_eq!(connection.outbound().deadline(), None);
    assert_nothing_sent!(connection);
}

#[test]
fn top_item_index_follows_declared_order_and_clamps() {
    let mut connection = grid_connection(
        json!({"topItemIndex": 8, "itemCount": 10}),
        &[("SetData", true)],
    );
    let top_item_index = |connection: &mut Connection| {
        connection
            .with_object::<Tree, _, _>("w2", |tree, _| tree.top_item_index())
            .expect("tree registered")
    };
    assert_eq!(top_item_index(&mut connection), 8);

    connection.process_batch(Batch::new(vec![Operation::set(
        "w2",
        props(json!({"itemCount": 4})),
    )]));

    assert_eq!(top_item_index(&mut connection), 3);
    assert_nothing_sent!(connection);
}

#[test]
fn scroll_to_item_call_moves_the_top_row() {
    let mut connection = grid_connection(json!({"itemCount": 5}), &[]);

    let report = connection.process_batch(Batch::new(vec![Operation::call(
        "w2",
        "scrollToItem",
        vec![json!("w2#2")],
    )]));
    assert!(report.is_clean(), "Unexpected failures: {:?}", report.failures());

    let top_item_index = connection
        .with_object::<Tree, _, _>("w2", |tree, _| tree.top_item_index())
        .expect("tree registered");
    assert_eq!(top_item_index, 2);
    assert_nothing_sent!(connection);
}

#[test]
fn expanding_an_item_notifies_the_tree() {
    let mut connection = grid_connection(json!({"itemCount": 1}), &[("Expand", true)]);
    connection.process_batch(Batch::new(vec![Operation::create(
        "w5",
        "rwt.widgets.GridItem",
        props(json!({"parent": "w2", "index": 0, "itemCount": 2, "texts": ["Root"]})),
    )]));

    connection
        .with_object::<GridItem, _, _>("w5", |item, context| {
            assert_eq!(item.texts(), vec!["Root".to_string()]);
            item.set_expanded(true, context);
        })
        .expect("item registered");

    let batch = connection.send_now().expect("expand staged");
    assert_eq!(batch.property("w5", "expanded"), Some(&json!(true)));
    assert_eq!(
        notifications(&batch, "w2"),
        vec![("Expand".to_string(), props(json!({"item": "w5"})))]
    );
}

#[test]
fn expand_then_collapse_sends_both_events() {
    let mut connection = grid_connection(
        json!({"itemCount": 2}),
        &[("Expand", true), ("Collapse", true)],
    );

    connection
        .with_object::<Tree, _, _>("w2", |tree, context| {
            let node = tree.item(NodeId::ROOT, 1).expect("slot 1 exists");
            assert!(tree.set_expanded(node, true, context));
            assert!(tree.set_expanded(node, false, context));
            assert!(!tree.set_expanded(node, false, context));
        })
        .expect("tree registered");

    let batch = connection.send_now().expect("changes staged");
    assert_eq!(batch.property("w2#1", "expanded"), Some(&json!(false)));
    assert_eq!(
        notifications(&batch, "w2"),
        vec![
            ("Expand".to_string(), props(json!({"item": "w2#1"}))),
            ("Collapse".to_string(), props(json!({"item": "w2#1"}))),
        ]
    );
}

#[test]
fn inbound_expanded_state_is_not_echoed() {
    let mut connection = grid_connection(
        json!({"itemCount": 1}),
        &[("Expand", true), ("Collapse", true)],
    );
    connection.process_batch(Batch::new(vec![
        Operation::create(
            "w5",
            "rwt.widgets.GridItem",
            props(json!({"parent": "w2", "index": 0, "itemCount": 2})),
        ),
        Operation::set("w5", props(json!({"expanded": true}))),
    ]));

    let expanded = connection
        .with_object::<GridItem, _, _>("w5", |item, _| item.is_expanded())
        .expect("item registered");
    assert!(expanded);
    assert_nothing_sent!(connection);
}

#[test]
fn second_item_in_the_same_slot_is_rejected() {
    let mut connection = grid_connection(json!({"itemCount": 1}), &[]);

    let report = connection.process_batch(Batch::new(vec![
        Operation::create(
            "w5",
            "rwt.widgets.GridItem",
            props(json!({"parent": "w2", "index": 0})),
        ),
        Operation::create(
            "w6",
            "rwt.widgets.GridItem",
            props(json!({"parent": "w2", "index": 0})),
        ),
    ]));

    assert_eq!(report.applied(), 1);
    assert_eq!(report.failures()[0].index, 1);
    assert!(!connection.registry().contains("w6"));
}
