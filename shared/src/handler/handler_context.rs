use crate::{
    messages::operation::Action, ClientObject, Millis, ObjectRegistry, OutboundChannel,
    RemoteId, RemoteObject, Scheduler, TimerHandle,
};

/// What caused a handler callback to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Applying an inbound operation; outbound staging is suspended
    Inbound(Action),
    /// Local code (user interaction) acting on a registered object
    Local,
    /// A timer registered by the object fired
    Timer,
}

/// Session state handed to factories, appliers, methods and timers.
///
/// The object being handled is passed separately and is mutably borrowed for
/// the duration of the callback; looking it up again through `registry()`
/// and borrowing it will fail.
pub struct HandlerContext<'a> {
    id: &'a RemoteId,
    origin: Origin,
    registry: &'a ObjectRegistry,
    outbound: &'a OutboundChannel,
    scheduler: &'a mut Scheduler,
    strict: bool,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        id: &'a RemoteId,
        origin: Origin,
        registry: &'a ObjectRegistry,
        outbound: &'a OutboundChannel,
        scheduler: &'a mut Scheduler,
        strict: bool,
    ) -> Self {
        Self {
            id,
            origin,
            registry,
            outbound,
            scheduler,
            strict,
        }
    }

    /// Id of the object being handled
    pub fn id(&self) -> &'a RemoteId {
        self.id
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn registry(&self) -> &'a ObjectRegistry {
        self.registry
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Outbound facade of the object being handled
    pub fn remote_object(&self) -> RemoteObject {
        RemoteObject::new(self.id.clone(), self.outbound.clone())
    }

    pub fn remote_object_for(&self, id: &RemoteId) -> RemoteObject {
        RemoteObject::new(id.clone(), self.outbound.clone())
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    /// Runs `task` against the handled object after `delay` logical
    /// milliseconds. The timer is cancelled if the object is destroyed first.
    pub fn schedule<F>(&mut self, delay: Millis, task: F) -> TimerHandle
    where
        F: FnOnce(&mut dyn ClientObject, &mut HandlerContext<'_>) + 'static,
    {
        self.scheduler.schedule(self.id.clone(), delay, Box::new(task))
    }

    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        self.scheduler.cancel(handle)
    }
}
