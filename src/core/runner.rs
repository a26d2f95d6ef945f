use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::activity::{ActivityKind, ActivityRecord};
use super::queue::{ActivityQueue, PushOutcome};
use super::session::{SessionState, ASSISTANT_ROLE};
use super::stage::{travel_stages, StageSpec};
use crate::error::{PlannerError, Result};
use crate::runtime::AgentRuntime;
use crate::types::TravelPreferences;

/// Longest chunk of stage output carried by a single activity record.
pub const OUTPUT_CHUNK_CHARS: usize = 800;

const TASK_OUTPUT_PREFIX: &str = "✅ Task output:\n";
const OUTPUT_CONTINUED_PREFIX: &str = "✅ Output (continued):\n";

/// Wraps a runtime call with progress emission: a start record before, the
/// chunked output after, an error record on failure.
#[derive(Debug)]
pub struct StageExecutor {
    runtime: Arc<dyn AgentRuntime>,
    queue: Arc<ActivityQueue>,
}

impl StageExecutor {
    pub fn new(runtime: Arc<dyn AgentRuntime>, queue: Arc<ActivityQueue>) -> Self {
        Self { runtime, queue }
    }

    /// Run one stage. A failure is recorded and propagated; the caller must
    /// not run later stages after it.
    pub async fn execute(&self, stage: &StageSpec, context: Option<&str>) -> Result<String> {
        self.emit(
            &stage.agent,
            format!("🎯 Starting task: {}", stage.task),
            ActivityKind::Info,
        );

        match self
            .runtime
            .execute(&stage.agent, &stage.prompt(), context)
            .await
        {
            Ok(output) => {
                self.emit_output(&stage.agent, &output);
                Ok(output)
            }
            Err(err) => {
                self.emit(
                    &stage.agent,
                    format!("❌ Error executing task: {err}"),
                    ActivityKind::Error,
                );
                Err(err)
            }
        }
    }

    /// One record per chunk; only the final chunk of the stage is marked
    /// success.
    fn emit_output(&self, agent: &str, output: &str) {
        let chunks = chunk_text(output, OUTPUT_CHUNK_CHARS);
        let last = chunks.len().saturating_sub(1);
        for (index, chunk) in chunks.into_iter().enumerate() {
            let prefix = if index == 0 {
                TASK_OUTPUT_PREFIX
            } else {
                OUTPUT_CONTINUED_PREFIX
            };
            let kind = if index == last {
                ActivityKind::Success
            } else {
                ActivityKind::Info
            };
            self.emit(agent, format!("{prefix}{chunk}"), kind);
        }
    }

    fn emit(&self, agent: &str, content: String, kind: ActivityKind) {
        let record = ActivityRecord::new(agent, content, kind);
        if self.queue.push(record) == PushOutcome::Dropped {
            warn!("activity queue full, dropped a progress record from {agent}");
        }
    }
}

/// Split on character boundaries so a record never carries more than
/// `limit` characters and multi-byte text stays intact.
fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Drives the fixed planner-then-local-expert sequence against a runtime.
#[derive(Debug)]
pub struct PipelineRunner {
    runtime: Arc<dyn AgentRuntime>,
    queue: Arc<ActivityQueue>,
}

impl PipelineRunner {
    pub fn new(runtime: Arc<dyn AgentRuntime>, queue: Arc<ActivityQueue>) -> Self {
        Self { runtime, queue }
    }

    /// Synchronous mode: both stages run on the caller and the final text
    /// of the second stage is returned. The first stage's output only feeds
    /// the second stage and the activity stream.
    pub async fn run(&self, preferences: &TravelPreferences) -> Result<String> {
        let executor = StageExecutor::new(Arc::clone(&self.runtime), Arc::clone(&self.queue));
        run_stages(&executor, &travel_stages(preferences)).await
    }

    /// Background mode: the whole sequence runs on a detached worker task
    /// and the final text is deposited through the session's pending
    /// message queue with role `assistant`.
    ///
    /// At most one background run per session: while the session's
    /// processing flag is set, a new request is rejected with
    /// [`PlannerError::PipelineBusy`].
    pub fn spawn_background(
        &self,
        preferences: TravelPreferences,
        session: &SessionState,
    ) -> Result<JoinHandle<()>> {
        if !session.try_begin_processing() {
            return Err(PlannerError::PipelineBusy);
        }

        let sender = session.message_sender();
        let guard = ProcessingGuard(session.processing_flag());
        let executor = StageExecutor::new(Arc::clone(&self.runtime), Arc::clone(&self.queue));

        Ok(tokio::spawn(async move {
            // Holds the flag down for the whole run and clears it on every
            // exit path, panics included, so the render loop cannot poll
            // forever.
            let _guard = guard;
            match run_stages(&executor, &travel_stages(&preferences)).await {
                Ok(plan) => {
                    sender.send(ASSISTANT_ROLE, plan);
                    info!("background travel plan completed");
                }
                Err(err) => {
                    // The failing stage already queued an error record.
                    warn!("background travel plan failed: {err}");
                }
            }
        }))
    }
}

async fn run_stages(executor: &StageExecutor, stages: &[StageSpec; 2]) -> Result<String> {
    let itinerary = executor.execute(&stages[0], None).await?;
    executor.execute(&stages[1], Some(&itinerary)).await
}

/// Clears the session's processing flag when the worker exits.
struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedRuntime {
        output: String,
    }

    #[async_trait]
    impl AgentRuntime for FixedRuntime {
        async fn execute(
            &self,
            _agent: &str,
            _task: &str,
            _context: Option<&str>,
        ) -> Result<String> {
            Ok(self.output.clone())
        }
    }

    #[test]
    fn chunk_text_covers_exact_multiples_and_remainders() {
        assert!(chunk_text("", 800).is_empty());
        assert_eq!(chunk_text("abc", 2), vec!["ab", "c"]);
        assert_eq!(chunk_text(&"x".repeat(1600), 800).len(), 2);
        assert_eq!(chunk_text(&"x".repeat(1601), 800).len(), 3);
    }

    #[test]
    fn chunk_text_respects_multibyte_boundaries() {
        let text = "京都のガイド".repeat(10);
        let chunks = chunk_text(&text, 7);
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 7));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn long_output_is_chunked_with_only_the_final_chunk_marked_success() {
        let output = "a".repeat(1700);
        let queue = Arc::new(ActivityQueue::new());
        let executor = StageExecutor::new(
            Arc::new(FixedRuntime {
                output: output.clone(),
            }),
            Arc::clone(&queue),
        );
        let stage = StageSpec {
            agent: "Travel Planner".to_string(),
            task: "Plan the trip".to_string(),
            expected_output: "An itinerary".to_string(),
        };

        let result = tokio_test::block_on(executor.execute(&stage, None)).unwrap();
        assert_eq!(result, output);

        let records = queue.drain_all();
        // one start record plus ceil(1700 / 800) chunks
        assert_eq!(records.len(), 4);
        assert!(records[0].content.starts_with("🎯 Starting task:"));
        assert!(records[1].content.starts_with(TASK_OUTPUT_PREFIX));
        assert!(records[2].content.starts_with(OUTPUT_CONTINUED_PREFIX));
        assert!(records[3].content.starts_with(OUTPUT_CONTINUED_PREFIX));
        assert_eq!(records[1].kind, ActivityKind::Info);
        assert_eq!(records[2].kind, ActivityKind::Info);
        assert_eq!(records[3].kind, ActivityKind::Success);

        let rebuilt: String = records[1..]
            .iter()
            .map(|record| {
                record
                    .content
                    .trim_start_matches(TASK_OUTPUT_PREFIX)
                    .trim_start_matches(OUTPUT_CONTINUED_PREFIX)
            })
            .collect();
        assert_eq!(rebuilt, output);
    }

    #[test]
    fn short_output_yields_a_single_success_chunk() {
        let queue = Arc::new(ActivityQueue::new());
        let executor = StageExecutor::new(
            Arc::new(FixedRuntime {
                output: "short plan".to_string(),
            }),
            Arc::clone(&queue),
        );
        let stage = StageSpec {
            agent: "Local Expert".to_string(),
            task: "Enhance".to_string(),
            expected_output: "Enhanced plan".to_string(),
        };

        tokio_test::block_on(executor.execute(&stage, None)).unwrap();

        let records = queue.drain_all();
        assert_eq!(records.len(), 2);
        assert!(records[1].content.starts_with(TASK_OUTPUT_PREFIX));
        assert_eq!(records[1].kind, ActivityKind::Success);
    }
}
