use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use travel_crew_rs::{
    ActivityKind, AgentRuntime, Budget, Interest, PipelineRunner, PlannerError, Result,
    SessionState, TravelPreferences, ASSISTANT_ROLE, LOCAL_EXPERT, TRAVEL_PLANNER,
};

/// Replays a scripted list of responses and records every call it sees.
#[derive(Debug)]
struct ScriptedRuntime {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, String, Option<String>)>>,
    delay: Option<Duration>,
}

impl ScriptedRuntime {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> Vec<(String, String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn execute(&self, agent: &str, task: &str, context: Option<&str>) -> Result<String> {
        self.calls.lock().unwrap().push((
            agent.to_string(),
            task.to_string(),
            context.map(str::to_string),
        ));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlannerError::AgentExecution(
                    "no scripted response left".to_string(),
                ))
            })
    }
}

fn kyoto_preferences() -> TravelPreferences {
    TravelPreferences::new(
        "Kyoto",
        5,
        Budget::Moderate,
        vec![Interest::Culture, Interest::Food],
    )
    .unwrap()
}

#[tokio::test]
async fn sync_run_streams_both_stages_and_returns_the_enhanced_plan() {
    let runtime = Arc::new(ScriptedRuntime::new(vec![
        Ok("Day 1: temples. Day 2: markets.".to_string()),
        Ok("Enhanced: Day 1 temples with addresses.".to_string()),
    ]));
    let mut session = SessionState::new();
    session.initialize();
    let runner = PipelineRunner::new(
        Arc::clone(&runtime) as Arc<dyn AgentRuntime>,
        session.activity_queue(),
    );

    session.clear_activities();
    let plan = runner.run(&kyoto_preferences()).await.unwrap();
    assert_eq!(plan, "Enhanced: Day 1 temples with addresses.");

    session.add_message(ASSISTANT_ROLE, plan);
    session.sync_activities();

    let starts: Vec<_> = session
        .activities()
        .iter()
        .filter(|record| record.content.starts_with("🎯 Starting task:"))
        .collect();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[0].agent, TRAVEL_PLANNER);
    assert_eq!(starts[1].agent, LOCAL_EXPERT);

    // the second stage saw the first stage's full output as context
    let calls = runtime.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].2, None);
    assert_eq!(
        calls[1].2.as_deref(),
        Some("Day 1: temples. Day 2: markets.")
    );

    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].role, ASSISTANT_ROLE);

    // rendered order is non-decreasing by timestamp
    let timestamps: Vec<f64> = session
        .activities()
        .iter()
        .map(|record| record.timestamp)
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn failing_first_stage_never_reaches_the_local_expert() {
    let runtime = Arc::new(ScriptedRuntime::new(vec![Err(
        PlannerError::AgentExecution("model unavailable".to_string()),
    )]));
    let mut session = SessionState::new();
    session.initialize();
    let runner = PipelineRunner::new(
        Arc::clone(&runtime) as Arc<dyn AgentRuntime>,
        session.activity_queue(),
    );

    let err = runner.run(&kyoto_preferences()).await.unwrap_err();
    assert!(matches!(err, PlannerError::AgentExecution(_)));
    assert_eq!(runtime.calls().len(), 1);

    session.sync_activities();
    let errors: Vec<_> = session
        .activities()
        .iter()
        .filter(|record| record.kind == ActivityKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].content.contains("model unavailable"));
}

#[tokio::test]
async fn second_background_start_is_rejected_while_one_is_in_flight() {
    let runtime = Arc::new(
        ScriptedRuntime::new(vec![
            Ok("itinerary".to_string()),
            Ok("enhanced itinerary".to_string()),
        ])
        .with_delay(Duration::from_millis(50)),
    );
    let session = SessionState::new();
    let runner = PipelineRunner::new(
        Arc::clone(&runtime) as Arc<dyn AgentRuntime>,
        session.activity_queue(),
    );

    let handle = runner
        .spawn_background(kyoto_preferences(), &session)
        .unwrap();
    let second = runner.spawn_background(kyoto_preferences(), &session);
    assert!(matches!(second, Err(PlannerError::PipelineBusy)));

    handle.await.unwrap();
    assert!(!session.is_processing());
}

#[tokio::test]
async fn background_run_deposits_the_plan_through_the_pending_queue() {
    let runtime = Arc::new(ScriptedRuntime::new(vec![
        Ok("itinerary".to_string()),
        Ok("enhanced itinerary".to_string()),
    ]));
    let mut session = SessionState::new();
    session.initialize();
    session.set_async_mode(true);
    let runner = PipelineRunner::new(
        Arc::clone(&runtime) as Arc<dyn AgentRuntime>,
        session.activity_queue(),
    );

    session.clear_activities();
    let handle = runner
        .spawn_background(kyoto_preferences(), &session)
        .unwrap();
    assert!(session.messages().is_empty());

    handle.await.unwrap();
    session.sync_activities();
    session.process_pending_messages();

    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].role, ASSISTANT_ROLE);
    assert_eq!(session.messages()[0].content, "enhanced itinerary");
    assert!(session
        .activities()
        .iter()
        .any(|record| record.kind == ActivityKind::Success));
    assert!(!session.is_processing());
}

#[tokio::test]
async fn background_failure_clears_processing_and_records_the_error() {
    let runtime = Arc::new(ScriptedRuntime::new(vec![Err(
        PlannerError::AgentExecution("boom".to_string()),
    )]));
    let mut session = SessionState::new();
    session.initialize();
    let runner = PipelineRunner::new(
        Arc::clone(&runtime) as Arc<dyn AgentRuntime>,
        session.activity_queue(),
    );

    let handle = runner
        .spawn_background(kyoto_preferences(), &session)
        .unwrap();
    handle.await.unwrap();

    session.sync_activities();
    session.process_pending_messages();
    assert!(session.messages().is_empty());
    assert!(session
        .activities()
        .iter()
        .any(|record| record.kind == ActivityKind::Error));
    assert!(!session.is_processing());

    // the session accepts a fresh run afterwards
    let retry = Arc::new(ScriptedRuntime::new(vec![
        Ok("plan".to_string()),
        Ok("enhanced plan".to_string()),
    ]));
    let runner = PipelineRunner::new(retry, session.activity_queue());
    let handle = runner
        .spawn_background(kyoto_preferences(), &session)
        .unwrap();
    handle.await.unwrap();
    session.process_pending_messages();
    assert_eq!(session.messages().len(), 1);
}
