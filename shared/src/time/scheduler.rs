use std::collections::{BTreeMap, HashMap};

use crate::{ClientObject, Clock, HandlerContext, Millis, RemoteId};

pub type TimerTask = Box<dyn FnOnce(&mut dyn ClientObject, &mut HandlerContext<'_>)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

struct Timer {
    owner: RemoteId,
    task: TimerTask,
}

/// A timer that came due, ready to run against its owner
pub struct DueTimer {
    pub handle: TimerHandle,
    pub owner: RemoteId,
    pub task: TimerTask,
}

/// Logical, cancellable timer registrations ordered by deadline.
/// Nothing fires until the host calls [`Scheduler::take_due`].
pub struct Scheduler {
    clock: Clock,
    next_handle: u64,
    queue: BTreeMap<(Millis, TimerHandle), Timer>,
    deadlines: HashMap<TimerHandle, Millis>,
}

impl Scheduler {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            next_handle: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn schedule(&mut self, owner: RemoteId, delay: Millis, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let deadline = self.clock.now().saturating_add(delay);
        self.queue.insert((deadline, handle), Timer { owner, task });
        self.deadlines.insert(handle, deadline);

        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(deadline) = self.deadlines.remove(&handle) else {
            return false;
        };
        self.queue.remove(&(deadline, handle)).is_some()
    }

    /// Cancels every timer registered by `owner`, returns how many
    pub fn cancel_owned_by(&mut self, owner: &RemoteId) -> usize {
        let handles: Vec<(Millis, TimerHandle)> = self
            .queue
            .iter()
            .filter(|(_, timer)| &timer.owner == owner)
            .map(|(key, _)| *key)
            .collect();

        for key in &handles {
            self.queue.remove(key);
            self.deadlines.remove(&key.1);
        }

        handles.len()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns every timer whose deadline is at or before `now`,
    /// earliest first
    pub fn take_due(&mut self, now: Millis) -> Vec<DueTimer> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            let (deadline, handle) = *entry.key();
            if deadline > now {
                break;
            }
            let timer = entry.remove();
            self.deadlines.remove(&handle);
            due.push(DueTimer {
                handle,
                owner: timer.owner,
                task: timer.task,
            });
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
