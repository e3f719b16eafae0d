use std::rc::Rc;

use log::{info, warn};

use widget_sync_shared::{
    AppearanceCache, AppearanceError, Batch, ClientObject, Clock, DecodeError, DueTimer,
    HandlerContext, HandlerRegistry, Millis, ObjectRef, ObjectRegistry, Origin, OutboundBatch,
    OutboundChannel, RadioGroup, RemoteId, RemoteObject, Scheduler, StateSet, StyleMap, Theme,
    Value,
};

use crate::{
    connection::{config::ConnectionConfig, error::ConnectionError},
    processor::{message_processor::MessageProcessor, report::BatchReport},
};

/// One synchronization session.
///
/// Owns everything the session needs: the (locked) handler registry, the
/// identity registry, the outbound channel, logical time and the appearance
/// cache. Nothing is shared between connections.
pub struct Connection {
    config: ConnectionConfig,
    clock: Clock,
    handlers: HandlerRegistry,
    registry: ObjectRegistry,
    outbound: OutboundChannel,
    scheduler: Scheduler,
    appearance: AppearanceCache,
}

impl Connection {
    pub fn new(config: ConnectionConfig, mut handlers: HandlerRegistry) -> Self {
        handlers.lock();

        let clock = Clock::new();
        info!(
            "Connection: Starting session with {} type handlers (strict: {})",
            handlers.len(),
            config.strict
        );

        Self {
            outbound: OutboundChannel::new(clock.clone(), config.notify_delay),
            scheduler: Scheduler::new(clock.clone()),
            appearance: AppearanceCache::new(config.strict),
            registry: ObjectRegistry::new(),
            handlers,
            clock,
            config,
        }
    }

    // Incoming data

    /// Applies a whole batch. Failed operations are reported, the rest of
    /// the batch still applies.
    pub fn process_batch(&mut self, batch: Batch) -> BatchReport {
        MessageProcessor::new(
            &self.handlers,
            &mut self.registry,
            &self.outbound,
            &mut self.scheduler,
            self.config.strict,
        )
        .process(batch)
    }

    pub fn process_json(&mut self, json: &str) -> Result<BatchReport, DecodeError> {
        let batch = Batch::from_json(json)?;
        Ok(self.process_batch(batch))
    }

    // Outgoing data

    /// Flushes whatever is staged, regardless of the deadline
    pub fn send_now(&mut self) -> Option<OutboundBatch> {
        self.flush()
    }

    /// Moves logical time forward, fires due timers, then flushes if the
    /// outbound deadline has passed
    pub fn advance(&mut self, elapsed: Millis) -> Option<OutboundBatch> {
        let now = self.clock.advance(elapsed);

        for timer in self.scheduler.take_due(now) {
            self.fire(timer);
        }

        if self.outbound.is_due(now) {
            self.flush()
        } else {
            None
        }
    }

    fn flush(&mut self) -> Option<OutboundBatch> {
        let registry = &self.registry;
        self.outbound.flush(|id| registry.sequence_of(id))
    }

    fn fire(&mut self, timer: DueTimer) {
        let DueTimer {
            handle,
            owner,
            task,
        } = timer;
        let Some(object) = self.registry.object(&owner) else {
            warn!(
                "Connection: Dropping timer {:?} of unregistered {}",
                handle, owner
            );
            return;
        };
        let Ok(mut object) = object.try_borrow_mut() else {
            warn!("Connection: Dropping timer {:?}, {} is busy", handle, owner);
            return;
        };

        let mut context = HandlerContext::new(
            &owner,
            Origin::Timer,
            &self.registry,
            &self.outbound,
            &mut self.scheduler,
            self.config.strict,
        );
        task(&mut *object, &mut context);
    }

    // Objects

    pub fn remote_object(&self, id: &RemoteId) -> RemoteObject {
        RemoteObject::new(id.clone(), self.outbound.clone())
    }

    pub fn object(&self, id: &str) -> Option<ObjectRef> {
        self.registry.object(id)
    }

    /// Runs local code (user interaction) against a registered object of
    /// type `T`. Changes staged through the context are sent to the remote
    /// side.
    pub fn with_object<T, R, F>(&mut self, id: &str, f: F) -> Result<R, ConnectionError>
    where
        T: ClientObject,
        F: FnOnce(&mut T, &mut HandlerContext<'_>) -> R,
    {
        let Some(entry) = self.registry.get(id) else {
            return Err(ConnectionError::UnknownObject { id: id.to_string() });
        };
        let (id, object) = (entry.id().clone(), entry.object().clone());

        let mut object = object
            .try_borrow_mut()
            .map_err(|_| ConnectionError::ObjectBusy { id: id.to_string() })?;
        let Some(typed) = object.downcast_mut::<T>() else {
            return Err(ConnectionError::WrongObjectType {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            });
        };

        let mut context = HandlerContext::new(
            &id,
            Origin::Local,
            &self.registry,
            &self.outbound,
            &mut self.scheduler,
            self.config.strict,
        );
        Ok(f(typed, &mut context))
    }

    /// Calls a method a handler exposes to local scripts
    pub fn invoke_scripting(
        &mut self,
        id: &str,
        method: &str,
        args: &[Value],
    ) -> Result<Value, ConnectionError> {
        let Some(entry) = self.registry.get(id) else {
            return Err(ConnectionError::UnknownObject { id: id.to_string() });
        };
        let (id, object, handler) = (
            entry.id().clone(),
            entry.object().clone(),
            entry.handler().clone(),
        );
        let Some(scripting_method) = handler.scripting_method(method) else {
            return Err(ConnectionError::UnknownScriptingMethod {
                id: id.to_string(),
                method: method.to_string(),
            });
        };

        let mut object = object
            .try_borrow_mut()
            .map_err(|_| ConnectionError::ObjectBusy { id: id.to_string() })?;
        let mut context = HandlerContext::new(
            &id,
            Origin::Local,
            &self.registry,
            &self.outbound,
            &mut self.scheduler,
            self.config.strict,
        );
        scripting_method(&mut *object, args, &mut context).map_err(|source| {
            ConnectionError::Handler {
                id: id.to_string(),
                source,
            }
        })
    }

    // Capabilities

    pub fn set_hovered(&mut self, id: &str, hovered: bool) -> Result<(), ConnectionError> {
        let object = self
            .registry
            .object(id)
            .ok_or_else(|| ConnectionError::UnknownObject { id: id.to_string() })?;
        let mut object = object
            .try_borrow_mut()
            .map_err(|_| ConnectionError::ObjectBusy { id: id.to_string() })?;
        let Some(hoverable) = object.as_hoverable() else {
            return Err(ConnectionError::MissingCapability {
                id: id.to_string(),
                capability: "Hoverable",
            });
        };
        hoverable.set_hovered(hovered);
        Ok(())
    }

    /// Selects a radio group member, deselects its siblings and stages the
    /// `selection` change of every member that flipped. Returns those ids,
    /// the selected one first.
    pub fn select_radio(&mut self, id: &str) -> Result<Vec<RemoteId>, ConnectionError> {
        let Some(entry) = self.registry.get(id) else {
            return Err(ConnectionError::UnknownObject { id: id.to_string() });
        };
        let id = entry.id().clone();
        let is_member = entry
            .object()
            .try_borrow_mut()
            .map_err(|_| ConnectionError::ObjectBusy { id: id.to_string() })?
            .as_radio_member()
            .is_some();
        if !is_member {
            return Err(ConnectionError::MissingCapability {
                id: id.to_string(),
                capability: "RadioGroupMember",
            });
        }

        let changed = RadioGroup::select(&self.registry, &id);
        for changed_id in &changed {
            let remote = self.remote_object(changed_id);
            remote.set("selection", changed_id == &id);
            if changed_id == &id && remote.is_listening("Selection") {
                remote.notify("Selection", Default::default());
            }
        }
        Ok(changed)
    }

    // Appearance

    /// Switches the theme: drops cached styles and tells every theme-aware
    /// object
    pub fn set_theme(&mut self, theme: Rc<Theme>) {
        self.appearance.set_theme(theme.clone());

        let mut notified = 0;
        for entry in self.registry.iter() {
            let Ok(mut object) = entry.object().try_borrow_mut() else {
                warn!(
                    "Connection: {} is busy and misses theme {}",
                    entry.id(),
                    theme.name()
                );
                continue;
            };
            if let Some(aware) = object.as_theme_aware() {
                aware.theme_changed(theme.name());
                notified += 1;
            }
        }

        info!(
            "Connection: Theme {} applied, {} objects notified",
            theme.name(),
            notified
        );
    }

    pub fn style_for(
        &mut self,
        appearance: &str,
        states: &StateSet,
    ) -> Result<Option<Rc<StyleMap>>, AppearanceError> {
        self.appearance.style_from(appearance, states)
    }

    // Accessors

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn outbound(&self) -> &OutboundChannel {
        &self.outbound
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
