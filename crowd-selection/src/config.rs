//! Engine configuration.

use crate::payload::TrendPurposes;
use crate::policy::Policies;
use chrono::NaiveDate;
use std::time::Duration;

/// Upper bound for one dataset request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a changing flag stays up when no fetch follows the change.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Cookie lifetime for persisted selections.
pub const DEFAULT_COOKIE_TTL_DAYS: u32 = 30;

/// Source of "today" for date defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => crowd_utils::dates::today(),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub request_timeout: Duration,
    pub settle_delay: Duration,
    pub cookie_ttl_days: u32,
    pub policies: Policies,
    pub trend_purposes: TrendPurposes,
    pub clock: Clock,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            cookie_ttl_days: DEFAULT_COOKIE_TTL_DAYS,
            policies: Policies::standard(),
            trend_purposes: TrendPurposes::default(),
            clock: Clock::System,
        }
    }
}
