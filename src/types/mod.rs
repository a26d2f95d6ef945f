pub mod preferences;

pub use preferences::{Budget, Interest, TravelPreferences};
