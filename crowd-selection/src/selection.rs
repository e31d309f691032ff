//! The selection tuple and its per-field busy flags.

use crate::context::Field;
use crowd_api::{GraphRequest, TransportError};
use serde::{Deserialize, Serialize};

/// What the visitor wants to see. Empty strings mean "not chosen yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub location: String,
    pub purpose: String,
    pub year: String,
    pub month: String,
}

impl Selection {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Location => &self.location,
            Field::Purpose => &self.purpose,
            Field::Year => &self.year,
            Field::Month => &self.month,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Location => self.location = value,
            Field::Purpose => self.purpose = value,
            Field::Year => self.year = value,
            Field::Month => self.month = value,
        }
    }

    /// All four fields are filled in.
    pub fn inputs_complete(&self) -> bool {
        Field::ALL.iter().all(|f| !self.get(*f).is_empty())
    }

    /// Snapshot for a request, or `None` while the selection is incomplete.
    pub fn fetch_params(&self) -> Option<FetchParams> {
        self.inputs_complete().then(|| FetchParams {
            location: self.location.clone(),
            purpose: self.purpose.clone(),
            year: self.year.clone(),
            month: self.month.clone(),
        })
    }
}

/// Parameters captured when a request is issued. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    pub location: String,
    pub purpose: String,
    pub year: String,
    pub month: String,
}

impl FetchParams {
    pub fn new(
        location: impl Into<String>,
        purpose: impl Into<String>,
        year: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            purpose: purpose.into(),
            year: year.into(),
            month: month.into(),
        }
    }

    pub fn to_graph_request(&self) -> Result<GraphRequest, TransportError> {
        GraphRequest::from_selection(&self.location, &self.purpose, &self.year, &self.month)
    }
}

/// Which busy flag a mutation raises. Year and month share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangingFlag {
    Location,
    Purpose,
    Date,
}

impl From<Field> for ChangingFlag {
    fn from(field: Field) -> Self {
        match field {
            Field::Location => ChangingFlag::Location,
            Field::Purpose => ChangingFlag::Purpose,
            Field::Year | Field::Month => ChangingFlag::Date,
        }
    }
}

/// Transient "this control is busy" flags for spinners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangingFlags {
    pub location: bool,
    pub purpose: bool,
    pub date: bool,
}

impl ChangingFlags {
    pub fn get(&self, flag: ChangingFlag) -> bool {
        match flag {
            ChangingFlag::Location => self.location,
            ChangingFlag::Purpose => self.purpose,
            ChangingFlag::Date => self.date,
        }
    }

    pub fn set(&mut self, flag: ChangingFlag, on: bool) {
        match flag {
            ChangingFlag::Location => self.location = on,
            ChangingFlag::Purpose => self.purpose = on,
            ChangingFlag::Date => self.date = on,
        }
    }

    pub fn any(&self) -> bool {
        self.location || self.purpose || self.date
    }

    pub fn clear(&mut self) {
        *self = ChangingFlags::default();
    }
}
