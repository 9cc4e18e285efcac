//! Live video area of the stream panel.

use leptos::prelude::*;
use monitor_common::{Camera, StreamBackend};

use crate::state::DashboardState;
use crate::stream::{STREAM_BACKEND, VIDEO_CANVAS_ID};

#[component]
pub fn VideoPanel() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    // The stream controller fills these elements imperatively; they are
    // rendered empty and never touched by the view afterwards.
    let surface = match STREAM_BACKEND {
        StreamBackend::SocketPlayer => view! {
            <canvas id=VIDEO_CANVAS_ID class="video-canvas"></canvas>
        }
        .into_any(),
        StreamBackend::EmbeddedViewer => view! {
            <div class="video-grid">
                {Camera::ALL
                    .into_iter()
                    .map(|camera| view! {
                        <div id=camera.wrapper_id() class="video-wrapper"></div>
                    })
                    .collect_view()}
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="video-panel">
            {surface}
            <button id="restart-btn" class="restart-btn" on:click=move |_| state.restart_stream()>
                "Herstart stream"
            </button>
        </div>
    }
}
