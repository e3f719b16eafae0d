pub mod recorder;
pub mod test_connection;
pub mod test_handlers;
pub mod test_widgets;

pub use assertions::{notifications, operations_for, targets};
pub use recorder::Recorder;
pub use test_connection::{init_logger, props, test_connection, test_connection_with};
pub use test_handlers::{
    button_handler, control_handler, scale_handler, ScaleOrder, TestPlugin, BUTTON_TYPE,
    LABEL_TYPE, PLAIN_TYPE, RADIO_TYPE, SCALE_TYPE,
};
pub use test_widgets::{Button, Label, Plain, RadioButton, Scale};
