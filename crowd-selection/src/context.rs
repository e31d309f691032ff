//! Page contexts and the selection fields they namespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The hosting route. Decides which purposes are legal and which cookie
/// namespace the selection persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageContext {
    /// Legacy dashboard with every purpose available.
    #[default]
    Default,
    /// Purpose-driven dashboard ("when should I hold my event?").
    Purpose,
    /// Function-driven dashboard ("show me the calendar heatmap").
    Function,
}

impl PageContext {
    pub const ALL: [PageContext; 3] = [
        PageContext::Default,
        PageContext::Purpose,
        PageContext::Function,
    ];

    /// Prefix prepended to every persisted key.
    pub fn prefix(self) -> &'static str {
        match self {
            PageContext::Default => "",
            PageContext::Purpose => "purpose_",
            PageContext::Function => "function_",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageContext::Default => "default",
            PageContext::Purpose => "purpose",
            PageContext::Function => "function",
        }
    }

    /// Map a route path to its context. Unknown routes use the default page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/purpose" => PageContext::Purpose,
            "/function" => PageContext::Function,
            _ => PageContext::Default,
        }
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown page context: {0}")]
pub struct ParseContextError(pub String);

impl FromStr for PageContext {
    type Err = ParseContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageContext::ALL
            .into_iter()
            .find(|ctx| ctx.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseContextError(s.to_string()))
    }
}

/// One of the four selection fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    Purpose,
    Year,
    Month,
}

impl Field {
    /// Resolution order for bootstrap; year comes before month because the
    /// default month depends on the resolved year.
    pub const ALL: [Field; 4] = [Field::Location, Field::Purpose, Field::Year, Field::Month];

    /// Key used both in the query string and (prefixed) in the cookie store.
    pub fn key(self) -> &'static str {
        match self {
            Field::Location => "location",
            Field::Purpose => "action",
            Field::Year => "year",
            Field::Month => "month",
        }
    }
}
