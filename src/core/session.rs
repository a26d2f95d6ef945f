use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::activity::ActivityRecord;
use super::log::ActivityLog;
use super::queue::{ActivityQueue, BoundedQueue, PushOutcome};
use crate::error::{PlannerError, Result};

/// Role used for pipeline results deposited into the conversation.
pub const ASSISTANT_ROLE: &str = "assistant";

/// One entry of the conversation shown on the result panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A submitted rating for a generated plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub rating: u8,
    pub comment: String,
}

/// Queue carrying finished-plan messages from a worker to the session.
pub type MessageQueue = BoundedQueue<ChatMessage>;

/// Cloneable producer handle for depositing messages from a worker.
///
/// This is the only way a worker may add to the conversation; the session
/// drains deposited messages back in on the owning side.
#[derive(Debug, Clone)]
pub struct MessageSender {
    pending: Arc<MessageQueue>,
}

impl MessageSender {
    pub fn send(&self, role: impl Into<String>, content: impl Into<String>) {
        let message = ChatMessage {
            role: role.into(),
            content: content.into(),
        };
        if self.pending.push(message) == PushOutcome::Dropped {
            warn!("pending message queue full, dropping a finished plan");
        }
    }
}

/// Session-scoped store for everything the render loop shows.
///
/// The log, conversation and feedback are owned by the consumer side and
/// must only be mutated there. Workers reach the session exclusively
/// through [`ActivityQueue`] pushes and [`MessageSender`]; both are drained
/// back in by `sync_activities` / `process_pending_messages`.
#[derive(Debug)]
pub struct SessionState {
    activity_log: ActivityLog,
    messages: Vec<ChatMessage>,
    feedback: Vec<FeedbackEntry>,
    async_mode: bool,
    initialized: bool,
    activity_queue: Arc<ActivityQueue>,
    pending_messages: Arc<MessageQueue>,
    processing: Arc<AtomicBool>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            activity_log: ActivityLog::new(),
            messages: Vec::new(),
            feedback: Vec::new(),
            async_mode: false,
            initialized: false,
            activity_queue: Arc::new(ActivityQueue::new()),
            pending_messages: Arc::new(MessageQueue::new()),
            processing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the session ready. Safe to call repeatedly: nothing already
    /// stored in the session is touched by later calls.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        debug!("session state initialized");
    }

    /// Reset the per-run surfaces at the start of a new plan request: the
    /// log is emptied and anything a previous run left sitting in the
    /// activity queue is discarded.
    pub fn clear_activities(&mut self) {
        self.activity_log.clear();
        let stale = self.activity_queue.drain_all();
        if !stale.is_empty() {
            debug!("discarded {} stale activity records", stale.len());
        }
    }

    /// Drain the activity queue into the log. Must run on the owning side.
    pub fn sync_activities(&mut self) {
        let batch = self.activity_queue.drain_all();
        self.activity_log.absorb(batch);
    }

    /// Append to the conversation from the owning side.
    pub fn add_message(&mut self, role: impl Into<String>, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
    }

    /// Producer handle for the thread-safe message path.
    pub fn message_sender(&self) -> MessageSender {
        MessageSender {
            pending: Arc::clone(&self.pending_messages),
        }
    }

    /// Move worker-deposited messages into the conversation. Must run on
    /// the owning side.
    pub fn process_pending_messages(&mut self) {
        for message in self.pending_messages.drain_all() {
            self.messages.push(message);
        }
    }

    pub fn add_feedback(&mut self, rating: u8, comment: impl Into<String>) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(PlannerError::Validation(format!(
                "Rating must be between 1 and 5, got {rating}"
            )));
        }
        self.feedback.push(FeedbackEntry {
            rating,
            comment: comment.into(),
        });
        Ok(())
    }

    pub fn activities(&self) -> &[ActivityRecord] {
        self.activity_log.records()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn feedback(&self) -> &[FeedbackEntry] {
        &self.feedback
    }

    /// Shared handle producers push progress records into.
    pub fn activity_queue(&self) -> Arc<ActivityQueue> {
        Arc::clone(&self.activity_queue)
    }

    pub fn async_mode(&self) -> bool {
        self.async_mode
    }

    pub fn set_async_mode(&mut self, enabled: bool) {
        self.async_mode = enabled;
    }

    /// True while a background run is in flight; the render loop keeps
    /// polling while this holds.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Claim the processing flag for a new background run. Returns false
    /// when a run is already in flight.
    pub(crate) fn try_begin_processing(&self) -> bool {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn processing_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.processing)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
