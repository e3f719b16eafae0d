use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    messages::outbound::{OutboundBatch, OutboundOperation},
    remote::error::OutboundError,
    Clock, Millis, Properties, RemoteId, Value,
};

type SendHook = Box<dyn FnOnce()>;

enum PendingOperation {
    Set {
        properties: Properties,
    },
    Call {
        method: String,
        args: Vec<Value>,
    },
    Notify {
        event: String,
        properties: Properties,
        coalesce: bool,
    },
}

/// Staged records of one target, in staging order. A set merges into the
/// previous record only while that record is the target's last one.
#[derive(Default)]
struct PendingTarget {
    operations: Vec<PendingOperation>,
}

impl PendingTarget {
    fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn set(&mut self, property: &str, value: Value) {
        if let Some(PendingOperation::Set { properties }) = self.operations.last_mut() {
            properties.insert(property.to_string(), value);
            return;
        }
        let mut properties = Properties::new();
        properties.insert(property.to_string(), value);
        self.operations.push(PendingOperation::Set { properties });
    }

    fn into_operations(self, target: &RemoteId, out: &mut Vec<OutboundOperation>) {
        for operation in self.operations {
            out.push(match operation {
                PendingOperation::Set { properties } => OutboundOperation::Set {
                    target: target.clone(),
                    properties,
                },
                PendingOperation::Call { method, args } => OutboundOperation::Call {
                    target: target.clone(),
                    method,
                    args,
                },
                PendingOperation::Notify {
                    event, properties, ..
                } => OutboundOperation::Notify {
                    target: target.clone(),
                    event,
                    properties,
                },
            });
        }
    }
}

struct OutboundState {
    suspended: u32,
    // earliest flush each target asked for
    deadlines: HashMap<RemoteId, Millis>,
    pending: IndexMap<RemoteId, PendingTarget>,
    hooks: Vec<(RemoteId, SendHook)>,
    listening: HashMap<RemoteId, HashSet<String>>,
}

impl OutboundState {
    fn request_deadline(&mut self, target: &RemoteId, deadline: Millis) {
        self.deadlines
            .entry(target.clone())
            .and_modify(|existing| *existing = (*existing).min(deadline))
            .or_insert(deadline);
    }
}

/// Per-session staging area for client-originated changes.
///
/// Cheap to clone; all clones (and every [`RemoteObject`](crate::RemoteObject)
/// built from them) share the same staged state.
#[derive(Clone)]
pub struct OutboundChannel {
    state: Rc<RefCell<OutboundState>>,
    clock: Clock,
    notify_delay: Millis,
}

impl OutboundChannel {
    pub fn new(clock: Clock, notify_delay: Millis) -> Self {
        Self {
            state: Rc::new(RefCell::new(OutboundState {
                suspended: 0,
                deadlines: HashMap::new(),
                pending: IndexMap::new(),
                hooks: Vec::new(),
                listening: HashMap::new(),
            })),
            clock,
            notify_delay,
        }
    }

    // Suspension

    pub fn suspend(&self) {
        self.state.borrow_mut().suspended += 1;
    }

    pub fn resume(&self) -> Result<(), OutboundError> {
        let mut state = self.state.borrow_mut();
        if state.suspended == 0 {
            return Err(OutboundError::NotSuspended);
        }
        state.suspended -= 1;
        Ok(())
    }

    /// Suspends until the returned guard is dropped
    pub fn suspend_guard(&self) -> SuspendGuard {
        self.suspend();
        SuspendGuard {
            channel: self.clone(),
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.state.borrow().suspended > 0
    }

    // Staging

    fn with_staging<F: FnOnce(&mut OutboundState)>(&self, what: &str, target: &RemoteId, f: F) -> bool {
        let mut state = self.state.borrow_mut();
        if state.suspended > 0 {
            debug!("OutboundChannel: Dropping {} for {} while suspended", what, target);
            return false;
        }
        f(&mut state);
        true
    }

    pub fn stage_set(&self, target: &RemoteId, property: &str, value: Value) -> bool {
        self.with_staging("set", target, |state| {
            state
                .pending
                .entry(target.clone())
                .or_default()
                .set(property, value);
        })
    }

    pub fn stage_call(&self, target: &RemoteId, method: &str, args: Vec<Value>) -> bool {
        self.with_staging("call", target, |state| {
            state
                .pending
                .entry(target.clone())
                .or_default()
                .operations
                .push(PendingOperation::Call {
                    method: method.to_string(),
                    args,
                });
        })
    }

    /// Stages an event notification and requests a flush.
    ///
    /// With `coalesce`, a notification of the same event already staged for
    /// `target` in this window takes the new payload instead of adding a
    /// second record.
    pub fn stage_notify(
        &self,
        target: &RemoteId,
        event: &str,
        properties: Properties,
        coalesce: bool,
    ) -> bool {
        let notify_delay = self.notify_delay;
        let now = self.clock.now();
        self.with_staging("notify", target, |state| {
            let pending = state.pending.entry(target.clone()).or_default();
            let existing = pending.operations.iter_mut().find_map(|operation| match operation {
                PendingOperation::Notify {
                    event: staged,
                    properties,
                    coalesce: true,
                } if coalesce && staged == event => Some(properties),
                _ => None,
            });
            match existing {
                Some(staged) => *staged = properties,
                None => pending.operations.push(PendingOperation::Notify {
                    event: event.to_string(),
                    properties,
                    coalesce,
                }),
            }
            state.request_deadline(target, now.saturating_add(notify_delay));
        })
    }

    /// Registers a one-shot hook that runs right before the next flush,
    /// unless `target` is discarded first
    pub fn on_next_send<F: FnOnce() + 'static>(&self, target: &RemoteId, hook: F) -> bool {
        self.with_staging("send hook", target, |state| {
            state.hooks.push((target.clone(), Box::new(hook)));
        })
    }

    /// Requests a flush no later than `delay` from now on behalf of
    /// `target`. Repeated requests keep the earliest deadline.
    pub fn send_delayed(&self, target: &RemoteId, delay: Millis) {
        let deadline = self.clock.now().saturating_add(delay);
        self.state.borrow_mut().request_deadline(target, deadline);
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.state.borrow().deadlines.values().min().copied()
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.deadline().is_some_and(|deadline| deadline <= now)
    }

    pub fn has_pending(&self) -> bool {
        let state = self.state.borrow();
        !state.hooks.is_empty() || state.pending.values().any(|target| !target.is_empty())
    }

    // Listen flags

    pub fn set_listening(&self, target: &RemoteId, event: &str, listening: bool) {
        let mut state = self.state.borrow_mut();
        if listening {
            state
                .listening
                .entry(target.clone())
                .or_default()
                .insert(event.to_string());
        } else if let Some(events) = state.listening.get_mut(target) {
            events.remove(event);
        }
    }

    pub fn is_listening(&self, target: &RemoteId, event: &str) -> bool {
        self.state
            .borrow()
            .listening
            .get(target)
            .is_some_and(|events| events.contains(event))
    }

    /// Drops staged changes, send hooks, flush requests and listen flags of
    /// a destroyed object
    pub fn discard(&self, target: &RemoteId) {
        let hooks = {
            let mut state = self.state.borrow_mut();
            if let Some(discarded) = state.pending.shift_remove(target) {
                if !discarded.is_empty() {
                    debug!(
                        "OutboundChannel: Discarding staged changes for destroyed {}",
                        target
                    );
                }
            }
            let (discarded, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.hooks)
                .into_iter()
                .partition(|(owner, _)| owner == target);
            state.hooks = kept;
            state.deadlines.remove(target);
            state.listening.remove(target);
            discarded
        };
        if !hooks.is_empty() {
            debug!(
                "OutboundChannel: Dropping {} send hooks of destroyed {}",
                hooks.len(),
                target
            );
        }
    }

    // Flush

    /// Drains everything staged into one batch.
    ///
    /// `order` maps a target to its registration sequence; targets without
    /// one go last, in the order they were first staged. Returns `None` when
    /// nothing was staged.
    pub fn flush<F: Fn(&RemoteId) -> Option<u64>>(&self, order: F) -> Option<OutboundBatch> {
        let hooks = std::mem::take(&mut self.state.borrow_mut().hooks);
        for (_, hook) in hooks {
            hook();
        }

        let pending = {
            let mut state = self.state.borrow_mut();
            state.deadlines.clear();
            std::mem::take(&mut state.pending)
        };

        let mut targets: Vec<(RemoteId, PendingTarget)> = pending
            .into_iter()
            .filter(|(_, target)| !target.is_empty())
            .collect();
        if targets.is_empty() {
            return None;
        }
        targets.sort_by_key(|(id, _)| order(id).unwrap_or(u64::MAX));

        let mut operations = Vec::new();
        for (id, target) in targets {
            target.into_operations(&id, &mut operations);
        }

        info!(
            "OutboundChannel: Flushing {} outbound operations",
            operations.len()
        );

        Some(OutboundBatch::new(operations))
    }
}

/// Keeps the channel suspended while alive
pub struct SuspendGuard {
    channel: OutboundChannel,
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        let mut state = self.channel.state.borrow_mut();
        state.suspended = state.suspended.saturating_sub(1);
    }
}
