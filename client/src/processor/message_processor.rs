use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, info, warn};

use widget_sync_shared::{
    Action, Batch, HandlerContext, HandlerError, HandlerRegistry, ObjectRef, ObjectRegistry,
    Operation, Origin, OutboundChannel, Properties, RegistryError, RemoteId, Scheduler,
    TypeHandler, Value,
};

use crate::processor::{error::ProtocolError, report::BatchReport};

/// Applies inbound operations, in array order, to one session's object
/// graph.
///
/// Each operation runs with the outbound channel suspended, so whatever the
/// handlers change locally is not staged back to the sender.
pub struct MessageProcessor<'c> {
    handlers: &'c HandlerRegistry,
    registry: &'c mut ObjectRegistry,
    outbound: &'c OutboundChannel,
    scheduler: &'c mut Scheduler,
    strict: bool,
}

impl<'c> MessageProcessor<'c> {
    pub fn new(
        handlers: &'c HandlerRegistry,
        registry: &'c mut ObjectRegistry,
        outbound: &'c OutboundChannel,
        scheduler: &'c mut Scheduler,
        strict: bool,
    ) -> Self {
        Self {
            handlers,
            registry,
            outbound,
            scheduler,
            strict,
        }
    }

    pub fn process(&mut self, batch: Batch) -> BatchReport {
        let mut report = BatchReport::new();

        for (index, entry) in batch.into_entries().into_iter().enumerate() {
            let operation = match entry {
                Ok(operation) => operation,
                Err(error) => {
                    warn!("MessageProcessor: Skipping operation {}: {}", index, error);
                    report.record_failure(index, None, error.into());
                    continue;
                }
            };

            let result = {
                let _guard = self.outbound.suspend_guard();
                self.apply(&operation)
            };

            match result {
                Ok(()) => report.record_applied(),
                Err(error) => {
                    warn!(
                        "MessageProcessor: Operation {} ({} {}) failed: {}",
                        index,
                        operation.action(),
                        operation.target(),
                        error
                    );
                    report.record_failure(index, Some(operation.target().clone()), error);
                }
            }
        }

        report
    }

    fn apply(&mut self, operation: &Operation) -> Result<(), ProtocolError> {
        match operation {
            Operation::Create {
                target,
                type_name,
                properties,
            } => self.create(target, type_name, properties),
            Operation::Set { target, properties } => self.set(target, properties),
            Operation::Listen { target, events } => self.listen(target, events),
            Operation::Call {
                target,
                method,
                args,
            } => self.call(target, method, args),
            Operation::Destroy { target } => self.destroy(target),
        }
    }

    fn create(
        &mut self,
        target: &RemoteId,
        type_name: &str,
        properties: &Properties,
    ) -> Result<(), ProtocolError> {
        let Some(handler) = self.handlers.get(type_name) else {
            return Err(ProtocolError::UnknownType {
                target: target.to_string(),
                type_name: type_name.to_string(),
            });
        };
        if self.registry.contains(target) {
            return Err(RegistryError::IdAlreadyRegistered {
                id: target.to_string(),
            }
            .into());
        }

        let object = {
            let mut context = self.context(target, Action::Create);
            (handler.factory())(properties, &mut context)
                .map_err(|source| handler_failure(target, source))?
        };

        self.registry
            .register(target.clone(), object.clone(), handler.clone())?;

        // properties the handler does not declare were for the factory
        self.apply_properties(target, &handler, &object, properties, Action::Create)?;
        Ok(())
    }

    fn set(&mut self, target: &RemoteId, properties: &Properties) -> Result<(), ProtocolError> {
        let (object, handler) = self.lookup(target, Action::Set)?;
        let unknown = self.apply_properties(target, &handler, &object, properties, Action::Set)?;

        if unknown.is_empty() {
            return Ok(());
        }
        if self.strict {
            return Err(ProtocolError::UnknownProperty {
                target: target.to_string(),
                properties: unknown,
            });
        }
        debug!(
            "MessageProcessor: Ignoring undeclared properties {:?} of {}",
            unknown, target
        );
        Ok(())
    }

    fn listen(
        &mut self,
        target: &RemoteId,
        events: &IndexMap<String, bool>,
    ) -> Result<(), ProtocolError> {
        let (_, handler) = self.lookup(target, Action::Listen)?;

        let mut unknown = Vec::new();
        for (event, listening) in events {
            if handler.has_event(event) {
                self.outbound.set_listening(target, event, *listening);
            } else {
                unknown.push(event.clone());
            }
        }

        if unknown.is_empty() {
            return Ok(());
        }
        if self.strict {
            return Err(ProtocolError::UnknownEvent {
                target: target.to_string(),
                events: unknown,
            });
        }
        warn!(
            "MessageProcessor: Ignoring undeclared events {:?} of {}",
            unknown, target
        );
        Ok(())
    }

    fn call(
        &mut self,
        target: &RemoteId,
        method: &str,
        args: &[Value],
    ) -> Result<(), ProtocolError> {
        let (object, handler) = self.lookup(target, Action::Call)?;
        let Some(method_handler) = handler.method(method) else {
            debug!(
                "MessageProcessor: {} has no method {}, ignoring call",
                handler.type_name(),
                method
            );
            return Ok(());
        };

        let mut object = object
            .try_borrow_mut()
            .map_err(|_| ProtocolError::ObjectBusy {
                target: target.to_string(),
            })?;
        let mut context = self.context(target, Action::Call);
        method_handler(&mut *object, args, &mut context)
            .map_err(|source| handler_failure(target, source))
    }

    fn destroy(&mut self, target: &RemoteId) -> Result<(), ProtocolError> {
        let (object, handler) = self.lookup(target, Action::Destroy)?;

        // the destructor sees the object still registered
        let destructor_result = match handler.destructor() {
            Some(destructor) => match object.try_borrow_mut() {
                Ok(mut object) => {
                    let mut context = self.context(target, Action::Destroy);
                    destructor(&mut *object, &mut context)
                }
                Err(_) => Err(HandlerError::ObjectBusy {
                    id: target.to_string(),
                }),
            },
            None => Ok(()),
        };

        self.registry.unregister(target)?;
        self.outbound.discard(target);
        let cancelled = self.scheduler.cancel_owned_by(target);
        if cancelled > 0 {
            info!(
                "MessageProcessor: Cancelled {} timers of destroyed {}",
                cancelled, target
            );
        }

        destructor_result.map_err(|source| handler_failure(target, source))
    }

    fn lookup(
        &self,
        target: &RemoteId,
        operation: Action,
    ) -> Result<(ObjectRef, Rc<TypeHandler>), ProtocolError> {
        self.registry
            .get(target)
            .map(|entry| (entry.object().clone(), entry.handler().clone()))
            .ok_or_else(|| ProtocolError::UnknownTarget {
                target: target.to_string(),
                operation,
            })
    }

    /// Applies `properties` in the handler's declared order and returns the
    /// names the handler does not declare
    fn apply_properties(
        &mut self,
        target: &RemoteId,
        handler: &TypeHandler,
        object: &ObjectRef,
        properties: &Properties,
        operation: Action,
    ) -> Result<Vec<String>, ProtocolError> {
        let mut object = object
            .try_borrow_mut()
            .map_err(|_| ProtocolError::ObjectBusy {
                target: target.to_string(),
            })?;
        let mut context = self.context(target, operation);

        for (name, applier) in handler.properties() {
            let Some(value) = properties.get(name) else {
                continue;
            };
            applier(&mut *object, value, &mut context)
                .map_err(|source| handler_failure(target, source))?;
        }

        Ok(properties
            .keys()
            .filter(|name| !handler.has_property(name))
            .cloned()
            .collect())
    }

    fn context<'a>(&'a mut self, target: &'a RemoteId, operation: Action) -> HandlerContext<'a> {
        HandlerContext::new(
            target,
            Origin::Inbound(operation),
            self.registry,
            self.outbound,
            self.scheduler,
            self.strict,
        )
    }
}

fn handler_failure(target: &RemoteId, source: HandlerError) -> ProtocolError {
    ProtocolError::Handler {
        target: target.to_string(),
        source,
    }
}
