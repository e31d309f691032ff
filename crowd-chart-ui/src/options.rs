//! Choices offered by the header pickers.

use crowd_selection::{PageContext, Policies, Selection};

/// A `<select>` entry: wire value and display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

/// Monitored locations, in header order.
pub const LOCATIONS: &[Choice] = &[
    choice("old-town", "Old Town"),
    choice("station", "Station Front"),
    choice("gyouzinbashi", "Gyoujin Bridge"),
    choice("omotesando", "Omotesando"),
    choice("yottekan", "Yottekan Shimochou"),
    choice("honmachi4", "Honmachi 4-chome"),
    choice("honmachi3", "Honmachi 3-chome"),
    choice("honmachi2", "Honmachi 2-chome"),
    choice("kokubunjidori", "Kokubunji-dori 2nd"),
    choice("yasukawadori", "Yasukawa-dori"),
    choice("jinnya", "Jinya Crossing"),
    choice("nakabashi", "Nakabashi"),
];

/// Every purpose any page offers.
pub const PURPOSES: &[Choice] = &[
    choice("today_details", "Today in detail"),
    choice("cal_holiday", "Plan a shop's closing day"),
    choice("cal_shoping_holiday", "Plan the street's closing day"),
    choice("cal_long_holiday", "Time a long holiday"),
    choice("cal_event", "Schedule an event"),
    choice("cal_training", "Time staff training"),
    choice("dti_event_time", "Pick event hours"),
    choice("wti_shift", "Plan part-time shifts"),
    choice("dti_open_hour", "Set shop opening hours"),
    choice("dti_shoping_open_hour", "Set street opening hours"),
    choice("cal_cog", "Congestion calendar"),
    choice("dti_cog", "Congestion by date and hour"),
    choice("wti_cog", "Congestion by weekday"),
    choice("month_trend", "Monthly trend"),
    choice("week_trend", "Weekly trend"),
    choice("event_effect", "Event effect"),
    choice("foreigners_distribution", "Foreign visitors"),
    choice("foreigners_yearly_distribution", "Foreign visitors through the year"),
];

/// Purposes the page `context` allows, in display order.
pub fn purposes_for(policies: &Policies, context: PageContext) -> Vec<Choice> {
    PURPOSES
        .iter()
        .copied()
        .filter(|c| policies.is_valid(c.value, context))
        .collect()
}

pub fn label_for(choices: &[Choice], value: &str) -> Option<&'static str> {
    choices.iter().find(|c| c.value == value).map(|c| c.label)
}

/// Heading over the result, e.g. "Jinya Crossing / Congestion calendar, 2024-7".
/// Unknown ids are shown as they are.
pub fn caption(selection: &Selection) -> String {
    let location = label_for(LOCATIONS, &selection.location).unwrap_or(selection.location.as_str());
    let purpose = label_for(PURPOSES, &selection.purpose).unwrap_or(selection.purpose.as_str());
    format!("{location} / {purpose}, {}-{}", selection.year, selection.month)
}
