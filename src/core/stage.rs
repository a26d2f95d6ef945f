use crate::types::TravelPreferences;

/// Role name of the first-stage agent.
pub const TRAVEL_PLANNER: &str = "Travel Planner";
/// Role name of the second-stage agent.
pub const LOCAL_EXPERT: &str = "Local Expert";

/// One step of the two-step pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    pub agent: String,
    pub task: String,
    pub expected_output: String,
}

impl StageSpec {
    /// Full prompt handed to the runtime. The start-of-stage activity
    /// record carries only `task`.
    pub fn prompt(&self) -> String {
        format!("{}\n\nExpected output: {}", self.task, self.expected_output)
    }
}

/// Build the fixed two-stage plan for a submitted set of preferences.
///
/// The second stage receives the first stage's full output as context at
/// execution time; it is not encoded here.
pub fn travel_stages(preferences: &TravelPreferences) -> [StageSpec; 2] {
    [
        StageSpec {
            agent: TRAVEL_PLANNER.to_string(),
            task: format!(
                "Create a {}-day {} travel plan for {} focusing on {}",
                preferences.duration(),
                preferences.budget(),
                preferences.destination(),
                preferences.interests_summary(),
            ),
            expected_output: "A detailed day-by-day travel itinerary".to_string(),
        },
        StageSpec {
            agent: LOCAL_EXPERT.to_string(),
            task: "Review and enhance the travel plan with local insights".to_string(),
            expected_output:
                "Enhanced plan with local recommendations and their detailed address/contact"
                    .to_string(),
        },
    ]
}
