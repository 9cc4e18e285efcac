//! Live video control.
//!
//! The video panel owns at most one stream connection. [`StreamController`]
//! opens it when the panel becomes visible and tears it down when another
//! panel takes over; the actual embedding is a [`StreamStrategy`].

mod embedded_viewer;
mod socket_player;

pub use embedded_viewer::{DomViewerHost, EmbeddedViewerStrategy, ViewerHost};
pub use socket_player::{
    load_player_script, JsmpegFactory, PlayerFactory, PlayerHandle, SocketPlayerStrategy,
    JSMPEG_SCRIPT_URL,
};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use monitor_common::{Panel, StreamBackend, RESTART_DELAY_MS};

/// Canvas the socket player draws onto.
pub const VIDEO_CANVAS_ID: &str = "video-canvas";

/// Backend compiled into this build.
#[cfg(feature = "socket-player")]
pub const STREAM_BACKEND: StreamBackend = StreamBackend::SocketPlayer;
#[cfg(not(feature = "socket-player"))]
pub const STREAM_BACKEND: StreamBackend = StreamBackend::EmbeddedViewer;

/// Strategy for [`STREAM_BACKEND`], pointed at the page's own host.
#[cfg(feature = "socket-player")]
pub fn video_strategy(page_host: &str) -> impl StreamStrategy {
    SocketPlayerStrategy::new(
        JsmpegFactory::new(VIDEO_CANVAS_ID),
        monitor_common::socket_player_url(page_host),
    )
}

#[cfg(not(feature = "socket-player"))]
pub fn video_strategy(page_host: &str) -> impl StreamStrategy {
    EmbeddedViewerStrategy::new(DomViewerHost, page_host, &monitor_common::Camera::ALL)
}

/// Player library a backend needs on the page, if any.
pub fn player_script(backend: StreamBackend) -> Option<&'static str> {
    match backend {
        StreamBackend::SocketPlayer => Some(JSMPEG_SCRIPT_URL),
        StreamBackend::EmbeddedViewer => None,
    }
}

/// Hostname the dashboard was served from.
pub fn page_hostname() -> String {
    web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// One way of putting live video on the page.
pub trait StreamStrategy {
    /// Open the connection. Must be a no-op while already running.
    fn start(&mut self);
    /// Tear the connection down. Must be a no-op while stopped.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Deferred execution, backed by `setTimeout` in the browser.
pub trait Timer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// [`Timer`] on top of Leptos' `set_timeout`.
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        leptos::prelude::set_timeout(task, delay);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Required element is not in the document
    MissingElement(String),
    /// The browser or the player library rejected the call
    Js(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::MissingElement(id) => write!(f, "element #{} not found", id),
            StreamError::Js(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StreamError {}

/// Owns the stream connection slot for the video panel.
///
/// Cloning yields another handle to the same connection.
#[derive(Clone)]
pub struct StreamController {
    strategy: Rc<RefCell<Box<dyn StreamStrategy>>>,
    timer: Rc<dyn Timer>,
    panel_visible: Rc<Cell<bool>>,
}

impl StreamController {
    pub fn new(strategy: impl StreamStrategy + 'static, timer: impl Timer + 'static) -> Self {
        Self {
            strategy: Rc::new(RefCell::new(Box::new(strategy))),
            timer: Rc::new(timer),
            panel_visible: Rc::new(Cell::new(false)),
        }
    }

    pub fn start(&self) {
        self.strategy.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.strategy.borrow_mut().stop();
    }

    pub fn is_running(&self) -> bool {
        self.strategy.borrow().is_running()
    }

    /// Called after every tab click with the panel that is now active.
    pub fn on_panel_activated(&self, panel: Panel) {
        self.panel_visible.set(panel.is_video());
        if panel.is_video() {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Stop now and start again after [`RESTART_DELAY_MS`].
    ///
    /// The delayed start is dropped if the video panel was hidden in the
    /// meantime.
    pub fn restart(&self) {
        log::info!("Restarting stream");
        self.stop();
        let controller = self.clone();
        self.timer.schedule(
            Duration::from_millis(RESTART_DELAY_MS),
            Box::new(move || {
                if controller.panel_visible.get() {
                    controller.start();
                } else {
                    log::debug!("Video panel hidden, skipping delayed restart");
                }
            }),
        );
    }
}
