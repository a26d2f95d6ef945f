use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{AgentProfile, AgentRuntime};
use crate::config::AppConfig;
use crate::error::{PlannerError, Result};
use crate::services::openai_client::{ChatCompletionRequest, OpenAIClient};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat-completion backed runtime. One instance serves every stage; the
/// agent id selects the persona used for the system prompt.
#[derive(Debug)]
pub struct OpenAiRuntime {
    client: OpenAIClient,
    model: String,
    timeout: Duration,
    agents: HashMap<String, AgentProfile>,
}

impl OpenAiRuntime {
    pub fn new(config: &AppConfig) -> Self {
        let mut client = OpenAIClient::new(config.api_key.clone());
        if let Some(base_url) = &config.api_base {
            client.set_base_url(base_url);
        }
        Self {
            client,
            model: config.model_name.clone(),
            timeout: DEFAULT_TIMEOUT,
            agents: HashMap::new(),
        }
    }

    /// Register the personas the runtime answers for.
    pub fn with_agents(mut self, profiles: Vec<AgentProfile>) -> Self {
        for profile in profiles {
            self.agents.insert(profile.role.clone(), profile);
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn system_prompt(&self, agent: &str) -> String {
        match self.agents.get(agent) {
            Some(profile) => profile.system_prompt(),
            None => format!("You are the {agent}, a helpful travel assistant."),
        }
    }
}

#[async_trait]
impl AgentRuntime for OpenAiRuntime {
    async fn execute(&self, agent: &str, task: &str, context: Option<&str>) -> Result<String> {
        let mut user_prompt = task.to_string();
        if let Some(context) = context {
            user_prompt.push_str("\n\nContext from the previous stage:\n");
            user_prompt.push_str(context);
        }

        let request =
            ChatCompletionRequest::new(self.model.clone(), self.system_prompt(agent), user_prompt);

        let response = self
            .client
            .chat_completion(&request.into_value(), self.timeout)
            .await?;

        let content = response
            .get("choices")
            .and_then(|choices| choices.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                PlannerError::AgentExecution(
                    "Completion response missing assistant content".to_string(),
                )
            })?;

        Ok(content.trim().to_string())
    }
}
