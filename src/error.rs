use thiserror::Error;

/// Main error type for the travel planning pipeline
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Agent execution error: {0}")]
    AgentExecution(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A travel plan is already being generated for this session")]
    PipelineBusy,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Check if resubmitting the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::AgentExecution(_)
                | PlannerError::Timeout(_)
                | PlannerError::RateLimit { .. }
                | PlannerError::PipelineBusy
        )
    }
}
