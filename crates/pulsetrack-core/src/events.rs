use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Every state change in a session produces an Event.
/// Hosts print or forward them; nothing in the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    IntervalStarted {
        at: i64,
    },
    /// The in-progress interval was long enough and is now on record.
    IntervalRecorded {
        interval: Interval,
    },
    /// The in-progress interval was ended too early and dropped.
    IntervalDiscarded {
        elapsed_ms: i64,
        at: i64,
    },
    SessionCleared {
        removed: usize,
    },
    IntensityChanged {
        level: u8,
    },
}
