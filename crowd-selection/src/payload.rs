//! Result slots for the main dataset.

use crowd_api::GraphResponse;
use serde_json::Value;
use std::collections::BTreeSet;

/// Which renderer a payload is shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Trend,
    Calendar,
}

/// Dataset plus the auxiliary panels that travel with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub data: Value,
    pub advice: Option<Value>,
    pub weather: Option<Value>,
    pub events: Option<Value>,
}

impl From<GraphResponse> for Dataset {
    fn from(resp: GraphResponse) -> Self {
        Self {
            data: resp.data,
            advice: resp.advice,
            weather: resp.weather,
            events: resp.events,
        }
    }
}

/// The single result slot. Holding one kind excludes the other, so a trend
/// series can never reach a calendar renderer or vice versa.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DataSlot {
    #[default]
    Empty,
    Trend(Dataset),
    Calendar(Dataset),
}

impl DataSlot {
    pub fn kind(&self) -> Option<PayloadKind> {
        match self {
            DataSlot::Empty => None,
            DataSlot::Trend(_) => Some(PayloadKind::Trend),
            DataSlot::Calendar(_) => Some(PayloadKind::Calendar),
        }
    }

    pub fn trend(&self) -> Option<&Dataset> {
        match self {
            DataSlot::Trend(d) => Some(d),
            _ => None,
        }
    }

    pub fn calendar(&self) -> Option<&Dataset> {
        match self {
            DataSlot::Calendar(d) => Some(d),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            DataSlot::Empty => None,
            DataSlot::Trend(d) | DataSlot::Calendar(d) => Some(d),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DataSlot::Empty)
    }
}

/// Purposes whose payload is a time series rather than a calendar grid.
/// Supplied by the hosting page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPurposes(BTreeSet<String>);

impl TrendPurposes {
    pub fn new<I, S>(purposes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(purposes.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, purpose: &str) -> bool {
        self.0.contains(purpose)
    }

    pub fn kind_for(&self, purpose: &str) -> PayloadKind {
        if self.contains(purpose) {
            PayloadKind::Trend
        } else {
            PayloadKind::Calendar
        }
    }

    /// Route a response into the slot its purpose calls for.
    pub fn classify(&self, purpose: &str, response: GraphResponse) -> DataSlot {
        match self.kind_for(purpose) {
            PayloadKind::Trend => DataSlot::Trend(response.into()),
            PayloadKind::Calendar => DataSlot::Calendar(response.into()),
        }
    }
}

impl Default for TrendPurposes {
    fn default() -> Self {
        Self::new(["year_trend", "month_trend", "week_trend"])
    }
}
