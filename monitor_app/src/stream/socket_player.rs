//! JSMpeg canvas player fed by the MPEG-TS WebSocket relay.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use super::{StreamError, StreamStrategy};

/// Where the socket-player build loads jsmpeg.min.js from.
pub const JSMPEG_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/gh/phoboslab/jsmpeg/jsmpeg.min.js";

const JSMPEG_SCRIPT_ID: &str = "jsmpeg-script";

#[wasm_bindgen]
extern "C" {
    /// `JSMpeg.Player` from jsmpeg.min.js, see [`load_player_script`].
    #[wasm_bindgen(js_namespace = JSMpeg, js_name = Player)]
    pub type JsmpegPlayer;

    #[wasm_bindgen(catch, constructor, js_namespace = JSMpeg, js_class = "Player")]
    fn new(url: &str, options: &JsValue) -> Result<JsmpegPlayer, JsValue>;

    #[wasm_bindgen(method, js_name = destroy)]
    fn destroy_player(this: &JsmpegPlayer);
}

/// Append the jsmpeg `<script>` to the page once. The library is only
/// usable after the browser has fetched it.
pub fn load_player_script(src: &str) -> Result<(), StreamError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| StreamError::Js("no document".to_string()))?;
    if document.get_element_by_id(JSMPEG_SCRIPT_ID).is_some() {
        return Ok(());
    }
    let root = document
        .document_element()
        .ok_or_else(|| StreamError::MissingElement("html".to_string()))?;
    let js_err = |e: JsValue| StreamError::Js(format!("{:?}", e));

    let script = document.create_element("script").map_err(js_err)?;
    script.set_id(JSMPEG_SCRIPT_ID);
    script.set_attribute("src", src).map_err(js_err)?;
    root.append_child(&script).map_err(js_err)?;
    log::info!("Loading player library from {}", src);
    Ok(())
}

fn jsmpeg_loaded() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str("JSMpeg")).unwrap_or(false)
}

/// A running player. Destroying it closes its socket.
pub trait PlayerHandle {
    fn destroy(self);
}

/// Builds players bound to a stream URL.
pub trait PlayerFactory {
    type Player: PlayerHandle;

    fn create(&self, url: &str) -> Result<Self::Player, StreamError>;
}

impl PlayerHandle for JsmpegPlayer {
    fn destroy(self) {
        self.destroy_player();
    }
}

/// Creates JSMpeg players drawing onto a canvas looked up by id.
pub struct JsmpegFactory {
    canvas_id: String,
}

impl JsmpegFactory {
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self { canvas_id: canvas_id.into() }
    }

    fn canvas(&self) -> Result<HtmlCanvasElement, StreamError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.canvas_id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| StreamError::MissingElement(self.canvas_id.clone()))
    }
}

impl PlayerFactory for JsmpegFactory {
    type Player = JsmpegPlayer;

    fn create(&self, url: &str) -> Result<JsmpegPlayer, StreamError> {
        if !jsmpeg_loaded() {
            return Err(StreamError::Js("JSMpeg is not loaded yet".to_string()));
        }
        let canvas = self.canvas()?;

        // Muted looping autoplay
        let options = Object::new();
        let set = |key: &str, value: &JsValue| {
            Reflect::set(&options, &JsValue::from_str(key), value)
                .map(|_| ())
                .map_err(|e| StreamError::Js(format!("{:?}", e)))
        };
        set("canvas", &canvas.into())?;
        set("autoplay", &JsValue::TRUE)?;
        set("audio", &JsValue::FALSE)?;
        set("loop", &JsValue::TRUE)?;

        JsmpegPlayer::new(url, &options).map_err(|e| StreamError::Js(format!("{:?}", e)))
    }
}

/// Strategy A: a single direct low-latency socket player.
pub struct SocketPlayerStrategy<F: PlayerFactory> {
    factory: F,
    url: String,
    player: Option<F::Player>,
}

impl<F: PlayerFactory> SocketPlayerStrategy<F> {
    pub fn new(factory: F, url: impl Into<String>) -> Self {
        Self { factory, url: url.into(), player: None }
    }
}

impl<F: PlayerFactory> StreamStrategy for SocketPlayerStrategy<F> {
    fn start(&mut self) {
        if self.player.is_some() {
            return;
        }
        log::info!("Starting socket player on {}", self.url);
        match self.factory.create(&self.url) {
            Ok(player) => self.player = Some(player),
            Err(e) => log::error!("Failed to start socket player: {}", e),
        }
    }

    fn stop(&mut self) {
        if let Some(player) = self.player.take() {
            log::info!("Stream stopped");
            player.destroy();
        }
    }

    fn is_running(&self) -> bool {
        self.player.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Counters {
        created: Rc<RefCell<Vec<String>>>,
        destroyed: Rc<Cell<usize>>,
        fail: Rc<Cell<bool>>,
    }

    struct FakePlayer {
        destroyed: Rc<Cell<usize>>,
    }

    impl PlayerHandle for FakePlayer {
        fn destroy(self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    struct FakeFactory(Counters);

    impl PlayerFactory for FakeFactory {
        type Player = FakePlayer;

        fn create(&self, url: &str) -> Result<FakePlayer, StreamError> {
            if self.0.fail.get() {
                return Err(StreamError::MissingElement("video-canvas".to_string()));
            }
            self.0.created.borrow_mut().push(url.to_string());
            Ok(FakePlayer { destroyed: Rc::clone(&self.0.destroyed) })
        }
    }

    fn strategy() -> (SocketPlayerStrategy<FakeFactory>, Counters) {
        let counters = Counters::default();
        let strategy = SocketPlayerStrategy::new(FakeFactory(counters.clone()), "ws://scale.local:8080/");
        (strategy, counters)
    }

    #[test]
    fn test_start_creates_one_player() {
        let (mut strategy, counters) = strategy();
        strategy.start();
        strategy.start();
        assert!(strategy.is_running());
        assert_eq!(*counters.created.borrow(), vec!["ws://scale.local:8080/".to_string()]);
    }

    #[test]
    fn test_stop_destroys_once() {
        let (mut strategy, counters) = strategy();
        strategy.start();
        strategy.stop();
        strategy.stop();
        assert!(!strategy.is_running());
        assert_eq!(counters.destroyed.get(), 1);
    }

    #[test]
    fn test_stop_without_player_is_noop() {
        let (mut strategy, counters) = strategy();
        strategy.stop();
        assert_eq!(counters.destroyed.get(), 0);
    }

    #[test]
    fn test_failed_create_leaves_slot_empty() {
        let (mut strategy, counters) = strategy();
        counters.fail.set(true);
        strategy.start();
        assert!(!strategy.is_running());

        counters.fail.set(false);
        strategy.start();
        assert!(strategy.is_running());
        assert_eq!(counters.created.borrow().len(), 1);
    }
}
