use std::{collections::HashMap, rc::Rc};

use indexmap::IndexMap;

use crate::{
    handler::{error::HandlerError, handler_context::HandlerContext},
    ClientObject, ObjectRef, Properties, Value,
};

pub type Factory =
    Rc<dyn Fn(&Properties, &mut HandlerContext<'_>) -> Result<ObjectRef, HandlerError>>;
pub type Destructor =
    Rc<dyn Fn(&mut dyn ClientObject, &mut HandlerContext<'_>) -> Result<(), HandlerError>>;
pub type PropertyApplier =
    Rc<dyn Fn(&mut dyn ClientObject, &Value, &mut HandlerContext<'_>) -> Result<(), HandlerError>>;
pub type MethodHandler = Rc<
    dyn Fn(&mut dyn ClientObject, &[Value], &mut HandlerContext<'_>) -> Result<(), HandlerError>,
>;
pub type ScriptingMethod = Rc<
    dyn Fn(&mut dyn ClientObject, &[Value], &mut HandlerContext<'_>) -> Result<Value, HandlerError>,
>;

fn downcast<T: ClientObject>(object: &mut dyn ClientObject) -> Result<&mut T, HandlerError> {
    object
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or(HandlerError::WrongObjectType {
            expected: std::any::type_name::<T>(),
        })
}

fn erase_factory<F>(factory: F) -> Factory
where
    F: Fn(&Properties, &mut HandlerContext<'_>) -> Result<ObjectRef, HandlerError> + 'static,
{
    Rc::new(factory)
}

fn erase_applier<F>(applier: F) -> PropertyApplier
where
    F: Fn(&mut dyn ClientObject, &Value, &mut HandlerContext<'_>) -> Result<(), HandlerError>
        + 'static,
{
    Rc::new(applier)
}

fn erase_method<F>(method: F) -> MethodHandler
where
    F: Fn(&mut dyn ClientObject, &[Value], &mut HandlerContext<'_>) -> Result<(), HandlerError>
        + 'static,
{
    Rc::new(method)
}

fn erase_scripting_method<F>(method: F) -> ScriptingMethod
where
    F: Fn(&mut dyn ClientObject, &[Value], &mut HandlerContext<'_>) -> Result<Value, HandlerError>
        + 'static,
{
    Rc::new(method)
}

fn erase_destructor<F>(destructor: F) -> Destructor
where
    F: Fn(&mut dyn ClientObject, &mut HandlerContext<'_>) -> Result<(), HandlerError> + 'static,
{
    Rc::new(destructor)
}

/// Everything the message processor needs to know to construct, mutate and
/// destroy objects of one type.
///
/// Property order is significant: it is the order in which the processor
/// applies the properties of a `create` or `set`, regardless of the key order
/// on the wire.
#[derive(Clone)]
pub struct TypeHandler {
    type_name: String,
    factory: Factory,
    destructor: Option<Destructor>,
    properties: IndexMap<String, PropertyApplier>,
    events: Vec<String>,
    methods: IndexMap<String, MethodHandler>,
    scripting_methods: HashMap<String, ScriptingMethod>,
}

impl TypeHandler {
    pub fn builder<F>(type_name: &str, factory: F) -> TypeHandlerBuilder
    where
        F: Fn(&Properties, &mut HandlerContext<'_>) -> Result<ObjectRef, HandlerError> + 'static,
    {
        TypeHandlerBuilder {
            type_name: type_name.to_string(),
            factory: erase_factory(factory),
            destructor: None,
            properties: IndexMap::new(),
            events: Vec::new(),
            methods: IndexMap::new(),
            scripting_methods: HashMap::new(),
        }
    }

    /// Starts a new handler from a copy of `base`'s tables.
    ///
    /// Overriding a property keeps its position in the declared order; new
    /// properties are appended.
    pub fn extend(base: &TypeHandler, type_name: &str) -> TypeHandlerBuilder {
        TypeHandlerBuilder {
            type_name: type_name.to_string(),
            factory: base.factory.clone(),
            destructor: base.destructor.clone(),
            properties: base
                .properties
                .iter()
                .map(|(name, applier)| (name.clone(), Some(applier.clone())))
                .collect(),
            events: base.events.clone(),
            methods: base.methods.clone(),
            scripting_methods: base.scripting_methods.clone(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn destructor(&self) -> Option<&Destructor> {
        self.destructor.as_ref()
    }

    /// Properties with their appliers, in application order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyApplier)> {
        self.properties
            .iter()
            .map(|(name, applier)| (name.as_str(), applier))
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn applier(&self, name: &str) -> Option<&PropertyApplier> {
        self.properties.get(name)
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.events.iter().any(|event| event == name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    pub fn method(&self, name: &str) -> Option<&MethodHandler> {
        self.methods.get(name)
    }

    pub fn scripting_method(&self, name: &str) -> Option<&ScriptingMethod> {
        self.scripting_methods.get(name)
    }
}

/// Assembles a [`TypeHandler`]; a pure transform over descriptor tables
pub struct TypeHandlerBuilder {
    type_name: String,
    factory: Factory,
    destructor: Option<Destructor>,
    properties: IndexMap<String, Option<PropertyApplier>>,
    events: Vec<String>,
    methods: IndexMap<String, MethodHandler>,
    scripting_methods: HashMap<String, ScriptingMethod>,
}

impl TypeHandlerBuilder {
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Properties, &mut HandlerContext<'_>) -> Result<ObjectRef, HandlerError> + 'static,
    {
        self.factory = erase_factory(factory);
        self
    }

    /// Declares property names (in order) whose appliers are supplied later.
    /// Names already declared keep their position.
    pub fn declare_properties(mut self, names: &[&str]) -> Self {
        for name in names {
            self.properties.entry(name.to_string()).or_insert(None);
        }
        self
    }

    pub fn property<T, F>(self, name: &str, applier: F) -> Self
    where
        T: ClientObject,
        F: Fn(&mut T, &Value, &mut HandlerContext<'_>) -> Result<(), HandlerError> + 'static,
    {
        self.property_dyn(
            name,
            erase_applier(move |object, value, context| applier(downcast::<T>(object)?, value, context)),
        )
    }

    pub fn property_dyn(mut self, name: &str, applier: PropertyApplier) -> Self {
        self.properties.insert(name.to_string(), Some(applier));
        self
    }

    /// Property applied through `ClientObject::set_property`
    pub fn setter_property(self, name: &str) -> Self {
        let property = name.to_string();
        self.property_dyn(
            name,
            erase_applier(move |object, value, _| object.set_property(&property, value)),
        )
    }

    pub fn without_property(mut self, name: &str) -> Self {
        self.properties.shift_remove(name);
        self
    }

    /// Moves `names` to the front of the application order, in the given
    /// order. Remaining properties keep their relative order after them.
    pub fn order_properties(mut self, names: &[&str]) -> Self {
        let mut reordered: IndexMap<String, Option<PropertyApplier>> = IndexMap::new();
        for name in names {
            let applier = self.properties.shift_remove(*name).flatten();
            reordered.insert(name.to_string(), applier);
        }
        reordered.extend(self.properties.drain(..));
        self.properties = reordered;
        self
    }

    pub fn event(mut self, name: &str) -> Self {
        self.events.push(name.to_string());
        self
    }

    pub fn events(mut self, names: &[&str]) -> Self {
        self.events.extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn without_event(mut self, name: &str) -> Self {
        self.events.retain(|event| event != name);
        self
    }

    pub fn method<T, F>(mut self, name: &str, method: F) -> Self
    where
        T: ClientObject,
        F: Fn(&mut T, &[Value], &mut HandlerContext<'_>) -> Result<(), HandlerError> + 'static,
    {
        self.methods.insert(
            name.to_string(),
            erase_method(move |object, args, context| method(downcast::<T>(object)?, args, context)),
        );
        self
    }

    pub fn without_method(mut self, name: &str) -> Self {
        self.methods.shift_remove(name);
        self
    }

    pub fn scripting_method<T, F>(mut self, name: &str, method: F) -> Self
    where
        T: ClientObject,
        F: Fn(&mut T, &[Value], &mut HandlerContext<'_>) -> Result<Value, HandlerError> + 'static,
    {
        self.scripting_methods.insert(
            name.to_string(),
            erase_scripting_method(move |object, args, context| {
                method(downcast::<T>(object)?, args, context)
            }),
        );
        self
    }

    pub fn destructor<T, F>(mut self, destructor: F) -> Self
    where
        T: ClientObject,
        F: Fn(&mut T, &mut HandlerContext<'_>) -> Result<(), HandlerError> + 'static,
    {
        self.destructor = Some(erase_destructor(move |object, context| {
            destructor(downcast::<T>(object)?, context)
        }));
        self
    }

    pub fn build(self) -> Result<TypeHandler, HandlerError> {
        let mut properties = IndexMap::with_capacity(self.properties.len());
        for (name, applier) in self.properties {
            let Some(applier) = applier else {
                return Err(HandlerError::MissingApplier {
                    type_name: self.type_name,
                    property: name,
                });
            };
            properties.insert(name, applier);
        }

        for (index, event) in self.events.iter().enumerate() {
            if self.events[..index].contains(event) {
                return Err(HandlerError::DuplicateEvent {
                    type_name: self.type_name.clone(),
                    event: event.clone(),
                });
            }
        }

        Ok(TypeHandler {
            type_name: self.type_name,
            factory: self.factory,
            destructor: self.destructor,
            properties,
            events: self.events,
            methods: self.methods,
            scripting_methods: self.scripting_methods,
        })
    }
}
