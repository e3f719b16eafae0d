use crate::{
    remote::{
        error::OutboundError,
        outbound_channel::{OutboundChannel, SuspendGuard},
    },
    Millis, Properties, RemoteId, Value,
};

/// Outbound facade for one object. Everything staged here goes to the
/// session's shared [`OutboundChannel`].
#[derive(Clone)]
pub struct RemoteObject {
    id: RemoteId,
    channel: OutboundChannel,
}

impl RemoteObject {
    pub fn new(id: RemoteId, channel: OutboundChannel) -> Self {
        Self { id, channel }
    }

    pub fn id(&self) -> &RemoteId {
        &self.id
    }

    /// Stages a property change; a later `set` of the same property in the
    /// same send window overwrites this one. Returns `false` if dropped
    /// because the channel is suspended.
    pub fn set<V: Into<Value>>(&self, property: &str, value: V) -> bool {
        self.channel.stage_set(&self.id, property, value.into())
    }

    pub fn call(&self, method: &str, args: Vec<Value>) -> bool {
        self.channel.stage_call(&self.id, method, args)
    }

    /// Stages an event notification and schedules a flush. Repeated
    /// notifications of the same event within one window collapse into one
    /// carrying the latest payload.
    pub fn notify(&self, event: &str, properties: Properties) -> bool {
        self.channel.stage_notify(&self.id, event, properties, true)
    }

    /// Like [`RemoteObject::notify`], but every notification is sent
    pub fn notify_uncoalesced(&self, event: &str, properties: Properties) -> bool {
        self.channel.stage_notify(&self.id, event, properties, false)
    }

    pub fn on_next_send<F: FnOnce() + 'static>(&self, hook: F) -> bool {
        self.channel.on_next_send(&self.id, hook)
    }

    pub fn send_delayed(&self, delay: Millis) {
        self.channel.send_delayed(&self.id, delay);
    }

    pub fn is_listening(&self, event: &str) -> bool {
        self.channel.is_listening(&self.id, event)
    }

    pub fn suspend(&self) {
        self.channel.suspend();
    }

    pub fn resume(&self) -> Result<(), OutboundError> {
        self.channel.resume()
    }

    pub fn suspend_guard(&self) -> SuspendGuard {
        self.channel.suspend_guard()
    }

    pub fn is_suspended(&self) -> bool {
        self.channel.is_suspended()
    }
}
