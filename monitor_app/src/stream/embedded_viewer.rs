//! go2rtc WebRTC viewers embedded as iframes, one per camera.

use monitor_common::{embedded_viewer_url, Camera};

use super::{StreamError, StreamStrategy};

/// Document operations the viewer strategy needs.
pub trait ViewerHost {
    fn has_viewer(&self, wrapper_id: &str) -> bool;
    fn embed_viewer(&self, wrapper_id: &str, src: &str) -> Result<(), StreamError>;
    /// Remove everything inside the wrapper. Detaching the iframe closes
    /// its peer connection.
    fn clear(&self, wrapper_id: &str);
}

/// [`ViewerHost`] over the live document.
pub struct DomViewerHost;

impl DomViewerHost {
    fn wrapper(&self, wrapper_id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(wrapper_id)
    }
}

impl ViewerHost for DomViewerHost {
    fn has_viewer(&self, wrapper_id: &str) -> bool {
        self.wrapper(wrapper_id)
            .and_then(|w| w.query_selector("iframe").ok().flatten())
            .is_some()
    }

    fn embed_viewer(&self, wrapper_id: &str, src: &str) -> Result<(), StreamError> {
        let wrapper = self
            .wrapper(wrapper_id)
            .ok_or_else(|| StreamError::MissingElement(wrapper_id.to_string()))?;
        let document = wrapper
            .owner_document()
            .ok_or_else(|| StreamError::Js("wrapper is detached".to_string()))?;
        let js_err = |e: wasm_bindgen::JsValue| StreamError::Js(format!("{:?}", e));

        let iframe = document.create_element("iframe").map_err(js_err)?;
        iframe.set_attribute("src", src).map_err(js_err)?;
        iframe.set_attribute("allow", "autoplay; fullscreen").map_err(js_err)?;
        iframe.set_attribute("frameborder", "0").map_err(js_err)?;
        iframe.set_attribute("class", "video-viewer").map_err(js_err)?;
        wrapper.append_child(&iframe).map_err(js_err)?;
        Ok(())
    }

    fn clear(&self, wrapper_id: &str) {
        if let Some(wrapper) = self.wrapper(wrapper_id) {
            wrapper.set_inner_html("");
        }
    }
}

/// Strategy B: a third-party viewer per camera wrapper.
pub struct EmbeddedViewerStrategy<H: ViewerHost> {
    host: H,
    viewers: Vec<(Camera, String)>,
}

impl<H: ViewerHost> EmbeddedViewerStrategy<H> {
    pub fn new(host: H, page_host: &str, cameras: &[Camera]) -> Self {
        let viewers = cameras
            .iter()
            .map(|c| (*c, embedded_viewer_url(page_host, *c)))
            .collect();
        Self { host, viewers }
    }
}

impl<H: ViewerHost> StreamStrategy for EmbeddedViewerStrategy<H> {
    fn start(&mut self) {
        for (camera, src) in &self.viewers {
            let wrapper_id = camera.wrapper_id();
            if self.host.has_viewer(wrapper_id) {
                continue;
            }
            log::info!("Embedding viewer for {} from {}", camera.source_id(), src);
            if let Err(e) = self.host.embed_viewer(wrapper_id, src) {
                log::error!("Failed to embed viewer for {}: {}", camera.source_id(), e);
            }
        }
    }

    fn stop(&mut self) {
        for (camera, _) in &self.viewers {
            self.host.clear(camera.wrapper_id());
        }
    }

    fn is_running(&self) -> bool {
        self.viewers
            .iter()
            .any(|(camera, _)| self.host.has_viewer(camera.wrapper_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Wrapper id -> embedded iframe srcs.
    #[derive(Clone, Default)]
    struct FakeHost {
        wrappers: Rc<RefCell<HashMap<String, Vec<String>>>>,
        clears: Rc<Cell<usize>>,
    }

    impl FakeHost {
        fn with_wrappers(ids: &[&str]) -> Self {
            let host = FakeHost::default();
            for id in ids {
                host.wrappers.borrow_mut().insert(id.to_string(), Vec::new());
            }
            host
        }

        fn viewers(&self, id: &str) -> Vec<String> {
            self.wrappers.borrow().get(id).cloned().unwrap_or_default()
        }
    }

    impl ViewerHost for FakeHost {
        fn has_viewer(&self, wrapper_id: &str) -> bool {
            self.wrappers
                .borrow()
                .get(wrapper_id)
                .is_some_and(|v| !v.is_empty())
        }

        fn embed_viewer(&self, wrapper_id: &str, src: &str) -> Result<(), StreamError> {
            match self.wrappers.borrow_mut().get_mut(wrapper_id) {
                Some(viewers) => {
                    viewers.push(src.to_string());
                    Ok(())
                }
                None => Err(StreamError::MissingElement(wrapper_id.to_string())),
            }
        }

        fn clear(&self, wrapper_id: &str) {
            self.clears.set(self.clears.get() + 1);
            if let Some(viewers) = self.wrappers.borrow_mut().get_mut(wrapper_id) {
                viewers.clear();
            }
        }
    }

    fn strategy(host: &FakeHost) -> EmbeddedViewerStrategy<FakeHost> {
        EmbeddedViewerStrategy::new(host.clone(), "10.0.0.5", &Camera::ALL)
    }

    #[test]
    fn test_start_embeds_one_viewer_per_camera() {
        let host = FakeHost::with_wrappers(&["video-wrapper-bak", "video-wrapper-cam2"]);
        let mut strategy = strategy(&host);
        strategy.start();

        assert!(strategy.is_running());
        assert_eq!(
            host.viewers("video-wrapper-bak"),
            vec!["http://10.0.0.5:1984/webrtc.html?src=cam_bak".to_string()]
        );
        assert_eq!(
            host.viewers("video-wrapper-cam2"),
            vec!["http://10.0.0.5:1984/webrtc.html?src=cam2".to_string()]
        );
    }

    #[test]
    fn test_start_is_idempotent_per_wrapper() {
        let host = FakeHost::with_wrappers(&["video-wrapper-bak", "video-wrapper-cam2"]);
        let mut strategy = strategy(&host);
        strategy.start();
        // Only one wrapper lost its viewer
        host.clear("video-wrapper-cam2");
        strategy.start();

        assert_eq!(host.viewers("video-wrapper-bak").len(), 1);
        assert_eq!(host.viewers("video-wrapper-cam2").len(), 1);
    }

    #[test]
    fn test_stop_clears_every_wrapper() {
        let host = FakeHost::with_wrappers(&["video-wrapper-bak", "video-wrapper-cam2"]);
        let mut strategy = strategy(&host);
        strategy.start();
        strategy.stop();

        assert!(!strategy.is_running());
        assert!(host.viewers("video-wrapper-bak").is_empty());
        assert!(host.viewers("video-wrapper-cam2").is_empty());
    }

    #[test]
    fn test_missing_wrapper_does_not_block_other_camera() {
        let host = FakeHost::with_wrappers(&["video-wrapper-cam2"]);
        let mut strategy = strategy(&host);
        strategy.start();

        assert!(strategy.is_running());
        assert_eq!(host.viewers("video-wrapper-cam2").len(), 1);
    }
}
