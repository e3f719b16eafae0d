use std::{cell::RefCell, rc::Rc};

use widget_sync_shared::{HandlerContext, Origin};

/// Shared, append-only log of what test widgets went through
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// Records `entry(<origin>)`, e.g. `text:"Hi"(create)`
    pub fn record_with_origin(&self, entry: &str, context: &HandlerContext<'_>) {
        let origin = match context.origin() {
            Origin::Inbound(action) => action.name(),
            Origin::Local => "local",
            Origin::Timer => "timer",
        };
        self.record(format!("{}({})", entry, origin));
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
