//! Page shell: header, tab bar and the tabbed panels.

use leptos::prelude::*;
use monitor_common::Panel;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use super::{CleanNumber, VideoPanel, WeightValue};
use crate::state::DashboardState;

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <div class="dashboard">
            <header class="top-bar">
                <h1>"Tractor Monitor"</h1>
            </header>

            <nav class="tab-bar">
                {Panel::ALL
                    .into_iter()
                    .map(|panel| view! { <TabButton panel=panel/> })
                    .collect_view()}
            </nav>

            <section
                id=Panel::Data.id()
                class="tab-content"
                class:active=move || state.is_active(Panel::Data)
            >
                <WeightValue/>
            </section>

            <section
                id=Panel::Stream.id()
                class="tab-content"
                class:active=move || state.is_active(Panel::Stream)
            >
                <VideoPanel/>
                <CleanNumber/>
            </section>
        </div>
    }
}

/// Reads the target panel from the clicked button's `data-tab`.
fn clicked_panel(ev: &MouseEvent) -> Option<Panel> {
    let button = ev.current_target()?.dyn_into::<web_sys::Element>().ok()?;
    let id = button.get_attribute("data-tab")?;
    Panel::from_id(&id)
}

#[component]
fn TabButton(panel: Panel) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <button
            class="tab-link"
            class:active=move || state.is_active(panel)
            data-tab=panel.id()
            on:click=move |ev: MouseEvent| match clicked_panel(&ev) {
                Some(target) => state.select_panel(target),
                None => log::warn!("Tab button without a known data-tab"),
            }
        >
            {panel.label()}
        </button>
    }
}
