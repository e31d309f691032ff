//! Reusable Dioxus RSX components for the dashboard pages.

mod error_display;
mod loading_spinner;
mod location_selector;
mod purpose_selector;
mod ranking_panel;
mod result_panel;
mod year_month_picker;

pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use location_selector::LocationSelector;
pub use purpose_selector::PurposeSelector;
pub use ranking_panel::RankingPanel;
pub use result_panel::ResultPanel;
pub use year_month_picker::YearMonthPicker;
