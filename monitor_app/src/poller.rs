//! Status polling.
//!
//! Fetches `/api/status` every [`POLL_INTERVAL_MS`] for the lifetime of the
//! page and forwards the `gewicht` field to a [`ReadingSink`]. A tick is
//! skipped while the previous request is still outstanding, so a slow
//! server never accumulates parallel requests. A request that is still
//! outstanding after [`MAX_SKIPPED_TICKS`] skipped ticks is aborted.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use monitor_common::{Reading, POLL_INTERVAL_MS, STATUS_PATH};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, AbortSignal, RequestInit, Response};

/// Skipped ticks after which the outstanding request is aborted (1 s).
pub const MAX_SKIPPED_TICKS: u32 = 10;

/// Receives every reading the poller accepts.
pub trait ReadingSink {
    fn show(&self, reading: Reading);
}

/// Reasons a single poll produced nothing. None of them stop the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollError {
    /// Request could not be sent or the body could not be read
    Transport(String),
    /// Body was not valid JSON
    Parse(String),
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::Transport(msg) => write!(f, "transport error: {}", msg),
            PollError::Parse(msg) => write!(f, "invalid status body: {}", msg),
        }
    }
}

impl std::error::Error for PollError {}

/// Single in-flight guard shared by all ticks.
#[derive(Clone, Default)]
pub struct PollGate {
    busy: Rc<Cell<bool>>,
    skipped: Rc<Cell<u32>>,
}

/// Marks a request as in flight until dropped.
pub struct PollPermit {
    busy: Rc<Cell<bool>>,
}

impl PollGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a permit, or `None` while another request holds one.
    /// Refused ticks are counted until the next permit is handed out.
    pub fn try_begin(&self) -> Option<PollPermit> {
        if self.busy.replace(true) {
            self.skipped.set(self.skipped.get().saturating_add(1));
            return None;
        }
        self.skipped.set(0);
        Some(PollPermit { busy: Rc::clone(&self.busy) })
    }

    /// Ticks refused since the current request started.
    pub fn skipped_ticks(&self) -> u32 {
        self.skipped.get()
    }

    /// True exactly once per stuck request, on the tick that reaches
    /// [`MAX_SKIPPED_TICKS`].
    pub fn is_overdue(&self) -> bool {
        self.skipped.get() == MAX_SKIPPED_TICKS
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

impl Drop for PollPermit {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// Parse a status body and forward its reading, if any.
///
/// A body without a numeric `gewicht` leaves the sink untouched.
pub fn apply_status_body<S: ReadingSink + ?Sized>(body: &str, sink: &S) -> Result<(), PollError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PollError::Parse(e.to_string()))?;
    if let Some(reading) = Reading::from_status_json(&value) {
        sink.show(reading);
    }
    Ok(())
}

async fn fetch_status(signal: &AbortSignal) -> Result<String, PollError> {
    let window = web_sys::window().ok_or_else(|| PollError::Transport("no window".to_string()))?;
    let init = RequestInit::new();
    init.set_signal(Some(signal));
    let response = JsFuture::from(window.fetch_with_str_and_init(STATUS_PATH, &init))
        .await
        .map_err(|e| PollError::Transport(format!("{:?}", e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| PollError::Transport("fetch did not return a Response".to_string()))?;
    let text = response
        .text()
        .map_err(|e| PollError::Transport(format!("{:?}", e)))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| PollError::Transport(format!("{:?}", e)))?;
    text.as_string()
        .ok_or_else(|| PollError::Parse("body is not text".to_string()))
}

/// Start polling for the rest of the page's life. There is no stop.
pub fn start_polling<S>(sink: S)
where
    S: ReadingSink + Clone + 'static,
{
    log::info!("Polling {} every {}ms", STATUS_PATH, POLL_INTERVAL_MS);
    let gate = PollGate::new();
    let in_flight: Rc<RefCell<Option<AbortController>>> = Rc::default();

    let tick = move || {
        let Some(permit) = gate.try_begin() else {
            if gate.is_overdue() {
                log::warn!("Status request hung for {} ticks, aborting", MAX_SKIPPED_TICKS);
                if let Some(controller) = in_flight.borrow().as_ref() {
                    controller.abort();
                }
            } else {
                log::debug!("Previous status request still in flight, skipping tick");
            }
            return;
        };
        let controller = match AbortController::new() {
            Ok(controller) => controller,
            Err(e) => {
                log::error!("Failed to create AbortController: {:?}", e);
                return;
            }
        };
        let signal = controller.signal();
        *in_flight.borrow_mut() = Some(controller);

        let sink = sink.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let _permit = permit;
            let result = match fetch_status(&signal).await {
                Ok(body) => apply_status_body(&body, &sink),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log::error!("Status poll failed (is the server online?): {}", e);
            }
        });
    };

    if let Err(e) = set_interval_with_handle(tick, Duration::from_millis(POLL_INTERVAL_MS)) {
        log::error!("Failed to start status polling: {:?}", e);
    }
}
