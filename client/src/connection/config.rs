use std::default::Default;

use widget_sync_shared::Millis;

cfg_if! {
    if #[cfg(debug_assertions)] {
        const STRICT_BY_DEFAULT: bool = true;
    } else {
        const STRICT_BY_DEFAULT: bool = false;
    }
}

/// Contains Config properties which will be used by a Connection
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Reports undeclared properties and events, and raises on appearance
    /// resolution failures instead of degrading to "no style". On by default
    /// in debug builds.
    pub strict: bool,
    /// How long after a staged event notification the outbound batch
    /// becomes due. Zero means "at the next step".
    pub notify_delay: Millis,
}

impl ConnectionConfig {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_notify_delay(mut self, notify_delay: Millis) -> Self {
        self.notify_delay = notify_delay;
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            strict: STRICT_BY_DEFAULT,
            notify_delay: 0,
        }
    }
}
