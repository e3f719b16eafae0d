use std::{collections::HashMap, rc::Rc};

use log::info;

use crate::handler::{error::HandlerError, type_handler::TypeHandler};

/// Registers a group of related type handlers at once
pub trait HandlerPlugin {
    fn build(&self, registry: &mut HandlerRegistry) -> Result<(), HandlerError>;
}

/// Type name → handler table.
///
/// Filled at startup, then locked when a connection takes ownership of it.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Rc<TypeHandler>>,
    locked: bool,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handler: TypeHandler) -> Result<&mut Self, HandlerError> {
        let type_name = handler.type_name().to_string();
        if self.locked {
            return Err(HandlerError::RegistryLocked { type_name });
        }
        if self.handlers.contains_key(&type_name) {
            return Err(HandlerError::DuplicateType { type_name });
        }

        info!("HandlerRegistry: Adding type handler {}", type_name);
        self.handlers.insert(type_name, Rc::new(handler));
        Ok(self)
    }

    pub fn add_plugin<P: HandlerPlugin>(&mut self, plugin: P) -> Result<&mut Self, HandlerError> {
        plugin.build(self)?;
        Ok(self)
    }

    pub fn get(&self, type_name: &str) -> Option<Rc<TypeHandler>> {
        self.handlers.get(type_name).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
