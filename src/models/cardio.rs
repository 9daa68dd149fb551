use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::Dated;
use super::strength::default_color;
use crate::core::dates;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardioMode {
    #[default]
    Continuous,
    Interval,
}

impl std::fmt::Display for CardioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continuous => write!(f, "continuous"),
            Self::Interval => write!(f, "interval"),
        }
    }
}

impl FromStr for CardioMode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "continuous" => Ok(Self::Continuous),
            "interval" | "intervals" => Ok(Self::Interval),
            _ => anyhow::bail!("invalid mode: {} (expected continuous/interval)", s),
        }
    }
}

/// A metric a cardio type can track.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Distance,
    Duration,
    HeartRate,
    Power,
    Speed,
    Cadence,
    Calories,
    Elevation,
    Notes,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::HeartRate => "heart_rate",
            Self::Power => "power",
            Self::Speed => "speed",
            Self::Cadence => "cadence",
            Self::Calories => "calories",
            Self::Elevation => "elevation",
            Self::Notes => "notes",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MetricKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "distance" => Ok(Self::Distance),
            "duration" => Ok(Self::Duration),
            "heart_rate" | "hr" => Ok(Self::HeartRate),
            "power" => Ok(Self::Power),
            "speed" => Ok(Self::Speed),
            "cadence" => Ok(Self::Cadence),
            "calories" => Ok(Self::Calories),
            "elevation" => Ok(Self::Elevation),
            "notes" => Ok(Self::Notes),
            _ => anyhow::bail!("unknown metric: {}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardioTypeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mode: CardioMode,
    #[serde(default)]
    pub metrics: Vec<MetricKind>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CardioTypeDefinition {
    pub fn new(name: String, mode: CardioMode, metrics: Vec<MetricKind>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            mode,
            metrics,
            color: default_color(),
            icon: None,
        }
    }

    pub fn tracks(&self, kind: MetricKind) -> bool {
        self.metrics.contains(&kind)
    }

    /// Built-in types used when the cardio type collection was never saved.
    pub fn seed() -> Vec<Self> {
        let seed = |id: &str, name: &str, mode, metrics: &[MetricKind], color: &str| Self {
            id: id.to_string(),
            name: name.to_string(),
            mode,
            metrics: metrics.to_vec(),
            color: color.to_string(),
            icon: None,
        };
        vec![
            seed(
                "seed-running",
                "Running",
                CardioMode::Continuous,
                &[
                    MetricKind::Distance,
                    MetricKind::Duration,
                    MetricKind::Elevation,
                    MetricKind::HeartRate,
                ],
                "orange",
            ),
            seed(
                "seed-cycling",
                "Cycling",
                CardioMode::Continuous,
                &[
                    MetricKind::Distance,
                    MetricKind::Duration,
                    MetricKind::Elevation,
                    MetricKind::Power,
                    MetricKind::Cadence,
                ],
                "sky",
            ),
            seed(
                "seed-track-intervals",
                "Track Intervals",
                CardioMode::Interval,
                &[
                    MetricKind::Distance,
                    MetricKind::Duration,
                    MetricKind::HeartRate,
                    MetricKind::Notes,
                ],
                "rose",
            ),
        ]
    }
}

/// One repetition inside an interval session. Only the metrics tracked by the
/// parent cardio type are populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntervalSegment {
    pub set_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IntervalSegment {
    /// Drop every metric the cardio type does not track.
    pub fn retain_tracked(mut self, def: &CardioTypeDefinition) -> Self {
        if !def.tracks(MetricKind::Distance) {
            self.distance = None;
        }
        if !def.tracks(MetricKind::Duration) {
            self.duration = None;
        }
        if !def.tracks(MetricKind::HeartRate) {
            self.heart_rate = None;
        }
        if !def.tracks(MetricKind::Power) {
            self.power = None;
        }
        if !def.tracks(MetricKind::Speed) {
            self.speed = None;
        }
        if !def.tracks(MetricKind::Notes) {
            self.notes = None;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_none()
            && self.duration.is_none()
            && self.heart_rate.is_none()
            && self.power.is_none()
            && self.speed.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardioSession {
    pub id: String,
    #[serde(with = "dates::serde_date")]
    pub date: NaiveDate,
    #[serde(alias = "cardioTypeName")]
    pub cardio_type_name: String,
    #[serde(default)]
    pub mode: CardioMode,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<IntervalSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub effort: u8,
}

impl Dated for CardioSession {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
