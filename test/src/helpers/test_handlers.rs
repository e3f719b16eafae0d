use widget_sync_shared::{
    object_ref, value, HandlerError, HandlerPlugin, HandlerRegistry, TypeHandler,
};

use crate::helpers::{
    recorder::Recorder,
    test_widgets::{Button, Label, Plain, RadioButton, Scale},
};

pub const PLAIN_TYPE: &str = "test.Plain";
pub const BUTTON_TYPE: &str = "rwt.widgets.Button";
pub const RADIO_TYPE: &str = "rwt.widgets.RadioButton";
pub const LABEL_TYPE: &str = "rwt.widgets.Label";
pub const SCALE_TYPE: &str = "rwt.widgets.Scale";

/// Order in which the scale handler applies its properties
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleOrder {
    /// Bounds before `selection`, the correct order
    BoundsFirst,
    /// `selection` before the bounds, clamps against stale bounds
    SelectionFirst,
}

/// Base descriptor shared by all controls; not registered by itself
pub fn control_handler(recorder: &Recorder) -> Result<TypeHandler, HandlerError> {
    let recorder = recorder.clone();
    TypeHandler::builder("rwt.widgets.Control", move |_, _| {
        Ok(object_ref(Button::new(recorder.clone())))
    })
    .setter_property("enabled")
    .setter_property("toolTip")
    .events(&["FocusIn", "FocusOut"])
    .method::<Button, _>("focus", |button, _, context| {
        button.recorder.record_with_origin("focus", context);
        Ok(())
    })
    .build()
}

pub fn button_handler(recorder: &Recorder) -> Result<TypeHandler, HandlerError> {
    let factory_recorder = recorder.clone();
    TypeHandler::extend(&control_handler(recorder)?, BUTTON_TYPE)
        .factory(move |_, _| Ok(object_ref(Button::new(factory_recorder.clone()))))
        .property::<Button, _>("text", |button, value, context| {
            button.text = value::as_str("text", value)?.to_string();
            button
                .recorder
                .record_with_origin(&format!("text:{:?}", button.text), context);
            Ok(())
        })
        .event("Selection")
        // flash(delay): after `delay` ms the button reports `flashed`
        .method::<Button, _>("flash", |_, args, context| {
            let delay = match args.first() {
                Some(delay) => value::as_usize("delay", delay)? as u64,
                None => 0,
            };
            context.schedule(delay, |object, context| {
                if let Some(button) = object.downcast_mut::<Button>() {
                    button.text = "flashed".to_string();
                    button.recorder.record_with_origin("flash", context);
                    context.remote_object().set("flashed", true);
                }
            });
            Ok(())
        })
        .destructor::<Button, _>(|button, context| {
            if context.registry().contains(context.id()) {
                button.recorder.record("destructor");
            }
            Ok(())
        })
        .build()
}

pub fn scale_handler(order: ScaleOrder) -> Result<TypeHandler, HandlerError> {
    let builder = TypeHandler::builder(SCALE_TYPE, |_, _| Ok(object_ref(Scale::default())))
        .property::<Scale, _>("minimum", |scale, value, _| {
            scale.minimum = value::as_i64("minimum", value)?;
            Ok(())
        })
        .property::<Scale, _>("maximum", |scale, value, _| {
            scale.maximum = value::as_i64("maximum", value)?;
            Ok(())
        })
        .property::<Scale, _>("selection", |scale, value, _| {
            scale.selection = value::as_i64("selection", value)?
                .max(scale.minimum)
                .min(scale.maximum);
            Ok(())
        });

    match order {
        ScaleOrder::BoundsFirst => builder.order_properties(&["minimum", "maximum", "selection"]),
        ScaleOrder::SelectionFirst => {
            builder.order_properties(&["selection", "minimum", "maximum"])
        }
    }
    .build()
}

fn plain_handler() -> Result<TypeHandler, HandlerError> {
    TypeHandler::builder(PLAIN_TYPE, |_, _| Ok(object_ref(Plain)))
        .event("Ping")
        .build()
}

fn radio_handler() -> Result<TypeHandler, HandlerError> {
    TypeHandler::builder(RADIO_TYPE, |properties, _| {
        let group = match properties.get("group") {
            Some(group) => Some(value::as_str("group", group)?.to_string()),
            None => None,
        };
        Ok(object_ref(RadioButton {
            group,
            selected: false,
        }))
    })
    .property::<RadioButton, _>("selection", |radio, value, _| {
        radio.selected = value::as_bool("selection", value)?;
        Ok(())
    })
    .event("Selection")
    .build()
}

fn label_handler() -> Result<TypeHandler, HandlerError> {
    TypeHandler::builder(LABEL_TYPE, |_, _| {
        Ok(object_ref(Label {
            text: String::new(),
            theme: None,
        }))
    })
    .property::<Label, _>("text", |label, value, _| {
        label.text = value::as_str("text", value)?.to_string();
        Ok(())
    })
    .build()
}

/// Every test widget type
pub struct TestPlugin {
    pub recorder: Recorder,
    pub scale_order: ScaleOrder,
}

impl TestPlugin {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            scale_order: ScaleOrder::BoundsFirst,
        }
    }
}

impl HandlerPlugin for TestPlugin {
    fn build(&self, registry: &mut HandlerRegistry) -> Result<(), HandlerError> {
        registry
            .add(plain_handler()?)?
            .add(button_handler(&self.recorder)?)?
            .add(radio_handler()?)?
            .add(label_handler()?)?
            .add(scale_handler(self.scale_order)?)?;
        Ok(())
    }
}
