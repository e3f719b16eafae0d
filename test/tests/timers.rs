/// Timers scheduled by handlers fire on logical time and die with their
/// owner.
use serde_json::json;

use widget_sync_test::{assert_nothing_sent, test_connection, Button, Recorder};

fn connection_with_button(recorder: &Recorder) -> widget_sync_client::Connection {
    let mut connection = test_connection(recorder);
    let report = connection
        .process_json(r#"[{"target": "w3", "action": "create", "type": "rwt.widgets.Button"}]"#)
        .expect("batch should decode");
    assert!(report.is_clean());
    connection
}

#[test]
fn timer_fires_at_its_deadline_and_stages_changes() {
    let recorder = Recorder::new();
    let mut connection = connection_with_button(&recorder);

    connection
        .process_json(r#"[{"target": "w3", "action": "call", "method": "flash", "args": [250]}]"#)
        .expect("batch should decode");
    assert_eq!(connection.scheduler().next_deadline(), Some(250));

    assert!(connection.advance(249).is_none());
    assert!(recorder.entries().is_empty());

    // the set alone does not make the batch due
    assert!(connection.advance(1).is_none());
    assert_eq!(recorder.entries(), vec!["flash(timer)"]);
    assert!(connection.scheduler().is_empty());

    let text = connection
        .with_object::<Button, _, _>("w3", |button, _| button.text.clone())
        .expect("button registered");
    assert_eq!(text, "flashed");

    let batch = connection.send_now().expect("timer staged a change");
    assert_eq!(batch.property("w3", "flashed"), Some(&json!(true)));
}

#[test]
fn destroying_the_owner_cancels_its_timers() {
    let recorder = Recorder::new();
    let mut connection = connection_with_button(&recorder);

    connection
        .process_json(
            r#"[
                {"target": "w3", "action": "call", "method": "flash", "args": [100]},
                {"target": "w3", "action": "call", "method": "flash", "args": [300]},
                {"target": "w3", "action": "destroy"}
            ]"#,
        )
        .expect("batch should decode");

    assert!(connection.scheduler().is_empty());
    assert!(connection.advance(1000).is_none());
    assert_eq!(recorder.entries(), vec!["destructor"]);
    assert_nothing_sent!(connection);
}

#[test]
fn every_due_timer_fires_within_one_step() {
    let recorder = Recorder::new();
    let mut connection = test_connection(&recorder);
    connection
        .process_json(
            r#"[
                {"target": "w3", "action": "create", "type": "rwt.widgets.Button"},
                {"target": "w4", "action": "create", "type": "rwt.widgets.Button"},
                {"target": "w3", "action": "call", "method": "flash", "args": [200]},
                {"target": "w4", "action": "call", "method": "flash", "args": [100]}
            ]"#,
        )
        .expect("batch should decode");

    connection.advance(500);
    let batch = connection.send_now().expect("both timers staged changes");
    assert_eq!(batch.property("w3", "flashed"), Some(&json!(true)));
    assert_eq!(batch.property("w4", "flashed"), Some(&json!(true)));
    assert_eq!(recorder.entries(), vec!["flash(timer)", "flash(timer)"]);
}
