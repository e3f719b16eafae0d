use widget_sync_client::{Connection, ConnectionConfig, GridPlugin};
use widget_sync_shared::{HandlerRegistry, Properties, Value};

use crate::helpers::{recorder::Recorder, test_handlers::TestPlugin};

pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Strict connection with the test widgets and the grid registered
pub fn test_connection(recorder: &Recorder) -> Connection {
    test_connection_with(
        ConnectionConfig::default().with_strict(true),
        TestPlugin::new(recorder),
    )
}

pub fn test_connection_with(config: ConnectionConfig, plugin: TestPlugin) -> Connection {
    init_logger();

    let mut handlers = HandlerRegistry::new();
    handlers
        .add_plugin(plugin)
        .and_then(|handlers| handlers.add_plugin(GridPlugin))
        .expect("test handlers should register");

    Connection::new(config, handlers)
}

/// Turns a `json!({...})` object into operation properties
pub fn props(value: Value) -> Properties {
    match value {
        Value::Object(properties) => properties,
        other => panic!("expected a JSON object, got {}", other),
    }
}
