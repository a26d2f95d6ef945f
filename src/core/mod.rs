pub mod activity;
pub mod log;
pub mod queue;
pub mod runner;
pub mod session;
pub mod stage;

pub use activity::{ActivityKind, ActivityRecord};
pub use log::ActivityLog;
pub use queue::{ActivityQueue, BoundedQueue, PushOutcome, DEFAULT_QUEUE_CAPACITY};
pub use runner::{PipelineRunner, StageExecutor, OUTPUT_CHUNK_CHARS};
pub use session::{
    ChatMessage, FeedbackEntry, MessageQueue, MessageSender, SessionState, ASSISTANT_ROLE,
};
pub use stage::{travel_stages, StageSpec, LOCAL_EXPERT, TRAVEL_PLANNER};
