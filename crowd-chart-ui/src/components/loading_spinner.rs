//! Loading spinner component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Loading data...".to_string())]
    pub label: String,
    /// Inline variant sits next to a picker instead of filling the panel
    #[props(default = false)]
    pub inline: bool,
}

#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    let style = if props.inline {
        "display: inline-block; margin-left: 6px; font-size: 12px; color: #666;"
    } else {
        "display: flex; justify-content: center; align-items: center; padding: 40px; color: #666;"
    };
    rsx! {
        div { style: "{style}", "{props.label}" }
    }
}
