use std::{collections::HashMap, rc::Rc};

use indexmap::IndexMap;

use crate::{appearance::state_set::StateSet, Value};

pub type StyleMap = IndexMap<String, Value>;
pub type StyleFn = Rc<dyn Fn(&StateSet) -> StyleMap>;

/// One named style computation within a theme
#[derive(Clone, Default)]
pub struct Appearance {
    style: Option<StyleFn>,
    include: Option<String>,
    base: bool,
}

impl Appearance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style<F: Fn(&StateSet) -> StyleMap + 'static>(mut self, style: F) -> Self {
        self.style = Some(Rc::new(style));
        self
    }

    /// Falls back to another appearance of the same theme
    pub fn include(mut self, id: &str) -> Self {
        self.include = Some(id.to_string());
        self
    }

    /// Merges the base theme's appearance of the same id underneath
    pub fn base(mut self) -> Self {
        self.base = true;
        self
    }

    pub fn style_fn(&self) -> Option<&StyleFn> {
        self.style.as_ref()
    }

    pub fn included(&self) -> Option<&str> {
        self.include.as_deref()
    }

    pub fn merges_base(&self) -> bool {
        self.base
    }
}

pub struct Theme {
    name: String,
    appearances: HashMap<String, Appearance>,
    base: Option<Rc<Theme>>,
}

impl Theme {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            appearances: HashMap::new(),
            base: None,
        }
    }

    pub fn with_base(mut self, base: Rc<Theme>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn appearance(mut self, id: &str, appearance: Appearance) -> Self {
        self.appearances.insert(id.to_string(), appearance);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, id: &str) -> Option<&Appearance> {
        self.appearances.get(id)
    }

    pub fn base_theme(&self) -> Option<&Rc<Theme>> {
        self.base.as_ref()
    }

    /// Whether this theme or any of its bases define `id`
    pub fn defines(&self, id: &str) -> bool {
        self.appearances.contains_key(id)
            || self.base.as_ref().is_some_and(|base| base.defines(id))
    }
}
