//! Request and response bodies exchanged with the dashboard backend.

use crate::error::{Result, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST api/get-graph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRequest {
    pub place: String,
    pub action: String,
    pub year: i32,
    pub month: u32,
}

impl GraphRequest {
    /// Build a request from the string-typed selection fields.
    ///
    /// Only checks that year and month are numeric; range checks belong to
    /// the pickers that produced them.
    pub fn from_selection(place: &str, action: &str, year: &str, month: &str) -> Result<Self> {
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| TransportError::InvalidParam(format!("year {year:?}")))?;
        let month = month
            .trim()
            .parse::<u32>()
            .map_err(|_| TransportError::InvalidParam(format!("month {month:?}")))?;
        Ok(Self {
            place: place.to_string(),
            action: action.to_string(),
            year,
            month,
        })
    }
}

/// Response of `POST api/get-graph`.
///
/// `data` is either a calendar/heatmap grid or a trend series depending on
/// the requested action; the engine does not look inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub advice: Option<Value>,
    #[serde(default, rename = "weather_data")]
    pub weather: Option<Value>,
    #[serde(default, rename = "event_data")]
    pub events: Option<Value>,
}

/// Query of `GET api/foreigners/monthly-ranking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub month: u32,
    /// Fiscal year label; the backend picks the closest year when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub top_n: u32,
}

impl RankingQuery {
    /// Query parameters in wire order, without the year when it is unset.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("month", self.month.to_string())];
        if let Some(year) = &self.year {
            pairs.push(("year", year.clone()));
        }
        pairs.push(("top_n", self.top_n.to_string()));
        pairs
    }
}

/// Envelope of the ranking endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}
