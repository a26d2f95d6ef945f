use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Shortest trip the form accepts, in days.
pub const MIN_DURATION_DAYS: u32 = 1;
/// Longest trip the form accepts, in days.
pub const MAX_DURATION_DAYS: u32 = 30;

/// Spending tier selected on the preferences form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Budget {
    Budget,
    Moderate,
    Luxury,
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Budget::Budget => "Budget",
            Budget::Moderate => "Moderate",
            Budget::Luxury => "Luxury",
        };
        f.write_str(name)
    }
}

impl FromStr for Budget {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "budget" => Ok(Budget::Budget),
            "moderate" => Ok(Budget::Moderate),
            "luxury" => Ok(Budget::Luxury),
            other => Err(PlannerError::Validation(format!(
                "Unknown budget tier: {other}"
            ))),
        }
    }
}

/// One of the recognized trip interests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interest {
    Culture,
    Nature,
    Food,
    Adventure,
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interest::Culture => "Culture",
            Interest::Nature => "Nature",
            Interest::Food => "Food",
            Interest::Adventure => "Adventure",
        };
        f.write_str(name)
    }
}

impl FromStr for Interest {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "culture" => Ok(Interest::Culture),
            "nature" => Ok(Interest::Nature),
            "food" => Ok(Interest::Food),
            "adventure" => Ok(Interest::Adventure),
            other => Err(PlannerError::Validation(format!(
                "Unknown interest: {other}"
            ))),
        }
    }
}

/// Trip preferences submitted by the user.
///
/// Validated once at construction and immutable after; the pipeline reads
/// them but never changes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPreferences {
    destination: String,
    duration: u32,
    budget: Budget,
    interests: Vec<Interest>,
}

impl TravelPreferences {
    pub fn new(
        destination: impl Into<String>,
        duration: u32,
        budget: Budget,
        interests: Vec<Interest>,
    ) -> Result<Self> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(PlannerError::Validation(
                "Destination must not be empty".to_string(),
            ));
        }
        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&duration) {
            return Err(PlannerError::Validation(format!(
                "Duration must be between {MIN_DURATION_DAYS} and {MAX_DURATION_DAYS} days, got {duration}"
            )));
        }
        if interests.is_empty() {
            return Err(PlannerError::Validation(
                "At least one interest must be selected".to_string(),
            ));
        }

        Ok(Self {
            destination,
            duration,
            budget,
            interests,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn interests(&self) -> &[Interest] {
        &self.interests
    }

    /// Comma-joined interest list for prompt text.
    pub fn interests_summary(&self) -> String {
        self.interests
            .iter()
            .map(Interest::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
