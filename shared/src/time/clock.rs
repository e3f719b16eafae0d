use std::{cell::Cell, rc::Rc};

use crate::Millis;

/// Logical session time, shared by the scheduler and the outbound channel.
/// Only moves when the host advances it.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    now: Rc<Cell<Millis>>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now.get()
    }

    pub fn advance(&self, elapsed: Millis) -> Millis {
        let now = self.now.get().saturating_add(elapsed);
        self.now.set(now);
        now
    }
}
