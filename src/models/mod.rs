pub mod cardio;
pub mod coaching;
pub mod config;
pub mod nutrition;
pub mod sleep;
pub mod strength;

use chrono::NaiveDate;

pub use cardio::{CardioMode, CardioSession, CardioTypeDefinition, IntervalSegment, MetricKind};
pub use nutrition::{NutrientDailyLog, NutrientDefinition};
pub use sleep::SleepEntry;
pub use strength::{RoutineDefinition, StrengthSetEntry};

/// Anything that belongs to one calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}
