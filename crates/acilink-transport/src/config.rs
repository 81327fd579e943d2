use serde::{Deserialize, Serialize};

/// What to do when a received frame finds the event queue full.
///
/// The backpressure cutoff keeps this from happening; reaching it means the
/// cutoff was bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Latch a fault and refuse further work until [`flush`](crate::Transport::flush).
    #[default]
    Fault,
    /// Discard the oldest queued event and keep going.
    DropOldest,
}

/// Configuration for a transport instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Overflow handling.
    pub overflow_policy: OverflowPolicy,
    /// Run the link reset sequence during `init`.
    pub reset_on_init: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            overflow_policy: OverflowPolicy::Fault,
            reset_on_init: true,
        }
    }
}
