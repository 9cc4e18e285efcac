use leptos::prelude::*;
use leptos::mount::mount_to_body;
use wasm_bindgen::prelude::*;

mod components;
pub mod poller;
pub mod state;
pub mod stream;
pub mod tabs;

use components::Dashboard;
use poller::start_polling;
use state::DashboardState;
use stream::{
    load_player_script, page_hostname, player_script, video_strategy, BrowserTimer,
    StreamController, STREAM_BACKEND,
};

#[wasm_bindgen(start)]
pub fn main() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("Tractor monitor loaded");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    if let Some(src) = player_script(STREAM_BACKEND) {
        if let Err(e) = load_player_script(src) {
            log::error!("Failed to load player library: {}", e);
        }
    }
    let stream = StreamController::new(video_strategy(&page_hostname()), BrowserTimer);
    let state = DashboardState::new(stream);
    provide_context(state);

    start_polling(state);

    view! { <Dashboard/> }
}
