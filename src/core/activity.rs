use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Display/severity classification of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Info,
    Success,
    Error,
}

/// A single progress event emitted while a stage runs.
///
/// Records are never mutated after creation and are ordered only by
/// `timestamp`; records with equal timestamps keep their arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub agent: String,
    pub content: String,
    pub kind: ActivityKind,
    pub timestamp: f64,
}

impl ActivityRecord {
    /// Create a record stamped with the current time.
    pub fn new(agent: impl Into<String>, content: impl Into<String>, kind: ActivityKind) -> Self {
        Self::with_timestamp(agent, content, kind, monotonic_unix_time())
    }

    /// Create a record with an explicit timestamp.
    pub fn with_timestamp(
        agent: impl Into<String>,
        content: impl Into<String>,
        kind: ActivityKind,
        timestamp: f64,
    ) -> Self {
        Self {
            agent: agent.into(),
            content: content.into(),
            kind,
            timestamp,
        }
    }
}

/// Wall-clock seconds backed by a monotonic offset, so timestamps taken
/// within one process never go backwards even if the system clock does.
pub(crate) fn monotonic_unix_time() -> f64 {
    static ORIGIN: OnceLock<(f64, Instant)> = OnceLock::new();
    let (base, start) = *ORIGIN.get_or_init(|| {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        (unix, Instant::now())
    });
    base + start.elapsed().as_secs_f64()
}
