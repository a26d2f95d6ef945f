//! travel-crew-rs: a two-agent travel planning assistant with live progress streaming
//!
//! The crate drives a fixed two-stage pipeline (a travel planner, then a
//! local expert that enriches the planner's itinerary) against an
//! LLM-backed [`AgentRuntime`]. While a stage runs, progress records flow
//! from the worker to the owning side through a bounded queue that never
//! blocks the producer; the owning side drains the queue, keeps the records
//! in timestamp order, and renders them as a chat-like thread.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travel_crew_rs::{
//!     travel_agents, AppConfig, Budget, Interest, OpenAiRuntime, PipelineRunner, SessionState,
//!     TravelPreferences,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let mut session = SessionState::new();
//!     session.initialize();
//!
//!     let runtime = OpenAiRuntime::new(&config).with_agents(travel_agents());
//!     let runner = PipelineRunner::new(Arc::new(runtime), session.activity_queue());
//!
//!     let preferences = TravelPreferences::new(
//!         "Kyoto",
//!         5,
//!         Budget::Moderate,
//!         vec![Interest::Culture, Interest::Food],
//!     )?;
//!
//!     let plan = runner.run(&preferences).await?;
//!     session.add_message("assistant", plan);
//!     session.sync_activities();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod runtime;
pub(crate) mod services;
pub mod types;

pub use config::AppConfig;
pub use core::{
    travel_stages, ActivityKind, ActivityLog, ActivityQueue, ActivityRecord, BoundedQueue,
    ChatMessage, FeedbackEntry, MessageQueue, MessageSender, PipelineRunner, PushOutcome,
    SessionState, StageExecutor, StageSpec, ASSISTANT_ROLE, LOCAL_EXPERT, TRAVEL_PLANNER,
};
pub use error::{PlannerError, Result};
pub use runtime::{travel_agents, AgentProfile, AgentRuntime, OpenAiRuntime};
pub use types::{Budget, Interest, TravelPreferences};

#[cfg(feature = "cli")]
pub mod cli;
