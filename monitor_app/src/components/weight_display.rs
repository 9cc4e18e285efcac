//! Weight readouts. Every element rendered here carries one of the display
//! classes and follows the same reading.

use leptos::prelude::*;
use crate::state::DashboardState;

/// Large readout on the data panel.
#[component]
pub fn WeightValue() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <div class="weight-card">
            <div class="weight-label">"Gewicht"</div>
            <div class="weight-row">
                <span class="weight-value">{move || state.weight_text()}</span>
                <span class="weight-unit">"kg"</span>
            </div>
        </div>
    }
}

/// Bare number overlaid on the video panel.
#[component]
pub fn CleanNumber() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <div class="weight-overlay">
            <span class="clean-number">{move || state.weight_text()}</span>
            " kg"
        </div>
    }
}
