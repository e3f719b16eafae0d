use std::{any::Any, cell::RefCell, rc::Rc};

use crate::{
    object::capability::{Hoverable, RadioGroupMember, ThemeAware},
    HandlerError, Value,
};

/// Shared handle to a live client object
pub type ObjectRef = Rc<RefCell<dyn ClientObject>>;

pub fn object_ref<T: ClientObject>(object: T) -> ObjectRef {
    Rc::new(RefCell::new(object))
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An object materialized on the client on behalf of the authoritative side.
///
/// Capabilities are opt-in: a widget that shares a behavior overrides the
/// matching `as_*` query instead of inheriting from a base widget.
pub trait ClientObject: AsAny + 'static {
    /// Generic setter, reachable from handlers built with
    /// `TypeHandlerBuilder::setter_property`
    fn set_property(&mut self, name: &str, _value: &Value) -> Result<(), HandlerError> {
        Err(HandlerError::NoSetter {
            property: name.to_string(),
        })
    }

    fn as_hoverable(&mut self) -> Option<&mut dyn Hoverable> {
        None
    }

    fn as_radio_member(&mut self) -> Option<&mut dyn RadioGroupMember> {
        None
    }

    fn as_theme_aware(&mut self) -> Option<&mut dyn ThemeAware> {
        None
    }
}

impl dyn ClientObject {
    pub fn is<T: ClientObject>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: ClientObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: ClientObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
