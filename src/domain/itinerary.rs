//! Activities scheduled within a single trip day.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::common::{Displayable, Identifiable};
use crate::errors::{Result, TripError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Kind of activity; serialized with the labels the stored data uses.
pub enum ItineraryCategory {
    #[default]
    #[serde(rename = "景點")]
    Sightseeing,
    #[serde(rename = "住宿")]
    Lodging,
    #[serde(rename = "美食")]
    Food,
    #[serde(rename = "購物")]
    Shopping,
    #[serde(rename = "交通")]
    Transport,
    #[serde(rename = "其他")]
    Other,
    #[serde(rename = "航班")]
    Flight,
}

impl ItineraryCategory {
    pub const ALL: [ItineraryCategory; 7] = [
        ItineraryCategory::Sightseeing,
        ItineraryCategory::Lodging,
        ItineraryCategory::Food,
        ItineraryCategory::Shopping,
        ItineraryCategory::Transport,
        ItineraryCategory::Other,
        ItineraryCategory::Flight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItineraryCategory::Sightseeing => "景點",
            ItineraryCategory::Lodging => "住宿",
            ItineraryCategory::Food => "美食",
            ItineraryCategory::Shopping => "購物",
            ItineraryCategory::Transport => "交通",
            ItineraryCategory::Other => "其他",
            ItineraryCategory::Flight => "航班",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            ItineraryCategory::Sightseeing => "sightseeing",
            ItineraryCategory::Lodging => "lodging",
            ItineraryCategory::Food => "food",
            ItineraryCategory::Shopping => "shopping",
            ItineraryCategory::Transport => "transport",
            ItineraryCategory::Other => "other",
            ItineraryCategory::Flight => "flight",
        }
    }
}

impl fmt::Display for ItineraryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItineraryCategory {
    type Err = TripError;

    fn from_str(value: &str) -> Result<Self> {
        let needle = value.trim();
        ItineraryCategory::ALL
            .into_iter()
            .find(|category| {
                category.label() == needle || category.english().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| TripError::Validation(format!("unknown itinerary category `{needle}`")))
    }
}

/// How the traveller gets to the next stop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walk,
    Car,
    Train,
}

impl TransportMode {
    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Walk => "walk",
            TransportMode::Car => "car",
            TransportMode::Train => "train",
        }
    }
}

impl FromStr for TransportMode {
    type Err = TripError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walk" => Ok(TransportMode::Walk),
            "car" => Ok(TransportMode::Car),
            "train" => Ok(TransportMode::Train),
            other => Err(TripError::Validation(format!(
                "unknown transport mode `{other}` (expected walk, car, or train)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightInfo {
    pub from: String,
    pub to: String,
    pub dep: String,
    pub arr: String,
    pub no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEntry {
    pub id: i64,
    pub name: String,
    /// `HH:MM`, or empty when unscheduled.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub category: ItineraryCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<TransportMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightInfo>,
}

impl ItineraryEntry {
    pub fn new(id: i64, name: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            time: time.into(),
            category: ItineraryCategory::default(),
            note: None,
            transport_mode: None,
            transport_time: None,
            flight: None,
        }
    }

    pub fn with_category(mut self, category: ItineraryCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_transport(mut self, mode: TransportMode, duration: Option<String>) -> Self {
        self.transport_mode = Some(mode);
        self.transport_time = duration;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TripError::Validation("itinerary entry needs a name".into()));
        }
        if !self.time.is_empty() && NaiveTime::parse_from_str(&self.time, "%H:%M").is_err() {
            return Err(TripError::Validation(format!(
                "time `{}` must be HH:MM",
                self.time
            )));
        }
        Ok(())
    }
}

impl Identifiable for ItineraryEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for ItineraryEntry {
    fn display_label(&self) -> String {
        let time = if self.time.is_empty() { "--:--" } else { &self.time };
        match &self.flight {
            Some(flight) => format!(
                "{time} [{}] {} ({} {}→{} {}-{})",
                self.category, self.name, flight.no, flight.from, flight.to, flight.dep, flight.arr
            ),
            None => format!("{time} [{}] {}", self.category, self.name),
        }
    }
}
