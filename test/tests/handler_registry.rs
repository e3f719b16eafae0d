/// Type handlers: inheritance by table copy, registration rules and locking.
use widget_sync_client::{Connection, ConnectionConfig, GridPlugin};
use widget_sync_shared::{value, HandlerError, HandlerRegistry, TypeHandler};
use widget_sync_test::{button_handler, control_handler, Button, Recorder, TestPlugin};

#[test]
fn button_inherits_the_control_tables() {
    let recorder = Recorder::new();
    let control = control_handler(&recorder).expect("control builds");
    let button = button_handler(&recorder).expect("button builds");

    assert_eq!(control.property_names(), vec!["enabled", "toolTip"]);
    assert_eq!(button.property_names(), vec!["enabled", "toolTip", "text"]);
    assert_eq!(button.events(), ["FocusIn", "FocusOut", "Selection"]);
    assert_eq!(button.method_names(), vec!["focus", "flash"]);
    // the base descriptor is left as it was
    assert!(!control.has_event("Selection"));
}

#[test]
fn overrides_keep_their_position_in_the_order() {
    let recorder = Recorder::new();
    let button = button_handler(&recorder).expect("button builds");
    let toggle = TypeHandler::extend(&button, "rwt.widgets.ToggleButton")
        .property::<Button, _>("enabled", |button, value, context| {
            button.enabled = value::as_bool("enabled", value)?;
            button
                .recorder
                .record_with_origin(&format!("enabled:{}", button.enabled), context);
            Ok(())
        })
        .without_event("FocusOut")
        .without_method("flash")
        .build()
        .expect("toggle builds");

    assert_eq!(toggle.property_names(), vec!["enabled", "toolTip", "text"]);
    assert_eq!(toggle.events(), ["FocusIn", "Selection"]);
    assert_eq!(toggle.method_names(), vec!["focus"]);

    let mut handlers = HandlerRegistry::new();
    handlers.add(toggle).expect("toggle registers");
    let mut connection = Connection::new(ConnectionConfig::default().with_strict(true), handlers);
    let report = connection
        .process_json(
            r#"[{"target": "w3", "action": "create", "type": "rwt.widgets.ToggleButton",
                 "properties": {"text": "On", "enabled": false}}]"#,
        )
        .expect("batch should decode");

    assert!(report.is_clean(), "Unexpected failures: {:?}", report.failures());
    assert_eq!(
        recorder.entries(),
        vec!["enabled:false(create)", r#"text:"On"(create)"#]
    );
}

#[test]
fn declared_property_without_applier_fails_to_build() {
    let recorder = Recorder::new();
    let control = control_handler(&recorder).expect("control builds");

    let result = TypeHandler::extend(&control, "rwt.widgets.Spinner")
        .declare_properties(&["digits"])
        .build();

    assert_eq!(
        result.err(),
        Some(HandlerError::MissingApplier {
            type_name: "rwt.widgets.Spinner".to_string(),
            property: "digits".to_string(),
        })
    );
}

#[test]
fn registering_a_type_twice_is_rejected() {
    let recorder = Recorder::new();
    let mut handlers = HandlerRegistry::new();
    handlers
        .add_plugin(TestPlugin::new(&recorder))
        .expect("first registration");

    assert_eq!(
        handlers.add(button_handler(&recorder).expect("button builds")).err(),
        Some(HandlerError::DuplicateType {
            type_name: "rwt.widgets.Button".to_string(),
        })
    );
}

#[test]
fn connection_locks_its_handlers() {
    let recorder = Recorder::new();
    let mut handlers = HandlerRegistry::new();
    handlers
        .add_plugin(TestPlugin::new(&recorder))
        .and_then(|handlers| handlers.add_plugin(GridPlugin))
        .expect("handlers register");
    assert!(!handlers.is_locked());

    let connection = Connection::new(ConnectionConfig::default(), handlers);

    assert!(connection.handlers().is_locked());
    assert_eq!(
        connection.handlers().type_names(),
        vec![
            "rwt.widgets.Button",
            "rwt.widgets.Grid",
            "rwt.widgets.GridItem",
            "rwt.widgets.Label",
            "rwt.widgets.RadioButton",
            "rwt.widgets.Scale",
            "test.Plain",
        ]
    );
}
