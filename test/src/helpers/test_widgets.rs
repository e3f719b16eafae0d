use widget_sync_shared::{
    value, ClientObject, HandlerError, Hoverable, RadioGroupMember, ThemeAware, Value,
};

use crate::helpers::recorder::Recorder;

/// Widget without behavior, for identity tests
pub struct Plain;

impl ClientObject for Plain {}

pub struct Button {
    pub text: String,
    pub enabled: bool,
    pub tool_tip: Option<String>,
    pub hovered: bool,
    pub recorder: Recorder,
}

impl Button {
    pub fn new(recorder: Recorder) -> Self {
        Self {
            text: String::new(),
            enabled: true,
            tool_tip: None,
            hovered: false,
            recorder,
        }
    }
}

impl ClientObject for Button {
    fn set_property(&mut self, name: &str, value: &Value) -> Result<(), HandlerError> {
        match name {
            "enabled" => self.enabled = value::as_bool(name, value)?,
            "toolTip" => self.tool_tip = Some(value::as_str(name, value)?.to_string()),
            _ => {
                return Err(HandlerError::NoSetter {
                    property: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn as_hoverable(&mut self) -> Option<&mut dyn Hoverable> {
        Some(self)
    }
}

impl Hoverable for Button {
    fn is_hovered(&self) -> bool {
        self.hovered
    }

    fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

pub struct RadioButton {
    pub group: Option<String>,
    pub selected: bool,
}

impl ClientObject for RadioButton {
    fn as_radio_member(&mut self) -> Option<&mut dyn RadioGroupMember> {
        Some(self)
    }
}

impl RadioGroupMember for RadioButton {
    fn radio_group(&self) -> Option<String> {
        self.group.clone()
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

pub struct Label {
    pub text: String,
    pub theme: Option<String>,
}

impl ClientObject for Label {
    fn as_theme_aware(&mut self) -> Option<&mut dyn ThemeAware> {
        Some(self)
    }
}

impl ThemeAware for Label {
    fn theme_changed(&mut self, theme_name: &str) {
        self.theme = Some(theme_name.to_string());
    }
}

/// Range widget whose `selection` is clamped into `[minimum, maximum]` when
/// applied, so the result depends on property order
pub struct Scale {
    pub minimum: i64,
    pub maximum: i64,
    pub selection: i64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            minimum: 0,
            maximum: 100,
            selection: 0,
        }
    }
}

impl ClientObject for Scale {}
