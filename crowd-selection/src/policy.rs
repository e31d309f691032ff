//! Which purposes each page context accepts.
//!
//! A cookie or shared link can replay a purpose into a page that cannot
//! render it (a heatmap-only purpose on the purpose-driven page). Every
//! replayed purpose passes through [`Policies::resolve`] before it reaches
//! memory.

use crate::context::PageContext;
use std::collections::BTreeSet;

/// Allow-list and fallback for one page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurposePolicy {
    /// `None` accepts every purpose.
    allowed: Option<BTreeSet<String>>,
    default: String,
}

impl PurposePolicy {
    /// Accept anything; fall back to `default` only when nothing was chosen.
    pub fn unrestricted(default: impl Into<String>) -> Self {
        Self {
            allowed: None,
            default: default.into(),
        }
    }

    pub fn allow_list<I, S>(allowed: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Some(allowed.into_iter().map(Into::into).collect()),
            default: default.into(),
        }
    }

    pub fn is_valid(&self, purpose: &str) -> bool {
        match &self.allowed {
            None => true,
            Some(allowed) => allowed.contains(purpose),
        }
    }

    pub fn default_purpose(&self) -> &str {
        &self.default
    }
}

/// Per-context purpose policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policies {
    pub default: PurposePolicy,
    pub purpose: PurposePolicy,
    pub function: PurposePolicy,
}

impl Policies {
    /// Lists offered by the dashboard's purpose and function pickers.
    pub fn standard() -> Self {
        Self {
            default: PurposePolicy::unrestricted(""),
            purpose: PurposePolicy::allow_list(
                [
                    "today_details",
                    "cal_holiday",
                    "cal_shoping_holiday",
                    "cal_long_holiday",
                    "cal_event",
                    "cal_training",
                    "dti_event_time",
                    "wti_shift",
                    "dti_open_hour",
                    "dti_shoping_open_hour",
                ],
                "cal_holiday",
            ),
            function: PurposePolicy::allow_list(
                [
                    "today_details",
                    "cal_cog",
                    "dti_cog",
                    "wti_cog",
                    "month_trend",
                    "week_trend",
                    "event_effect",
                    "foreigners_distribution",
                    "foreigners_yearly_distribution",
                ],
                "cal_cog",
            ),
        }
    }

    pub fn for_context(&self, context: PageContext) -> &PurposePolicy {
        match context {
            PageContext::Default => &self.default,
            PageContext::Purpose => &self.purpose,
            PageContext::Function => &self.function,
        }
    }

    pub fn is_valid(&self, purpose: &str, context: PageContext) -> bool {
        self.for_context(context).is_valid(purpose)
    }

    pub fn default_for(&self, context: PageContext) -> &str {
        self.for_context(context).default_purpose()
    }

    /// The purpose to keep for `context`, and whether it had to be corrected.
    /// Empty counts as missing and resolves to the default.
    pub fn resolve(&self, purpose: &str, context: PageContext) -> (String, bool) {
        if purpose.is_empty() {
            let default = self.default_for(context).to_string();
            let corrected = !default.is_empty();
            return (default, corrected);
        }
        if self.is_valid(purpose, context) {
            (purpose.to_string(), false)
        } else {
            (self.default_for(context).to_string(), true)
        }
    }
}

impl Default for Policies {
    fn default() -> Self {
        Self::standard()
    }
}
