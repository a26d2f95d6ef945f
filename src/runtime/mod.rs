pub mod openai;

use async_trait::async_trait;

use crate::core::{LOCAL_EXPERT, TRAVEL_PLANNER};
use crate::error::Result;

pub use openai::OpenAiRuntime;

/// Executes one agent task against an external model.
///
/// Implementations may block for the duration of a network call; callers
/// hold no locks while this runs.
#[async_trait]
pub trait AgentRuntime: Send + Sync + std::fmt::Debug {
    /// Run `task` as `agent`, optionally with the previous stage's full
    /// output as context. Fails when the underlying call errors.
    async fn execute(&self, agent: &str, task: &str, context: Option<&str>) -> Result<String>;
}

/// Persona behind an agent role; feeds the runtime's system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentProfile {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}. {}. Your goal: {}.",
            self.role, self.backstory, self.goal
        )
    }
}

/// The two fixed personas of the travel pipeline.
pub fn travel_agents() -> Vec<AgentProfile> {
    vec![
        AgentProfile::new(
            TRAVEL_PLANNER,
            "Create travel plans based on preferences",
            "Expert travel planner with years of experience",
        ),
        AgentProfile::new(
            LOCAL_EXPERT,
            "Enhance plans with local insights",
            "Local expert with destination knowledge",
        ),
    ]
}
