//! Live video backends and the URLs they connect to.

use serde::{Deserialize, Serialize};

/// Port of the MPEG-TS WebSocket relay used by the socket player.
pub const SOCKET_PLAYER_PORT: u16 = 8080;

/// Port of the go2rtc web interface hosting the WebRTC viewer.
pub const EMBEDDED_VIEWER_PORT: u16 = 1984;

/// Delay between stop and start when the user restarts the stream.
pub const RESTART_DELAY_MS: u64 = 500;

/// Which video embedding the dashboard uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamBackend {
    /// JSMpeg player drawing onto a canvas from a WebSocket
    SocketPlayer,
    /// go2rtc WebRTC viewer embedded as one iframe per camera
    EmbeddedViewer,
}

/// Logical camera names known to go2rtc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Camera {
    /// Camera over the loading bin
    Bak,
    Cam2,
}

impl Camera {
    pub const ALL: [Camera; 2] = [Camera::Bak, Camera::Cam2];

    /// Stream name in go2rtc.yaml and the viewer's `src` parameter.
    pub fn source_id(&self) -> &'static str {
        match self {
            Camera::Bak => "cam_bak",
            Camera::Cam2 => "cam2",
        }
    }

    /// Id of the wrapper element the viewer iframe is placed in.
    pub fn wrapper_id(&self) -> &'static str {
        match self {
            Camera::Bak => "video-wrapper-bak",
            Camera::Cam2 => "video-wrapper-cam2",
        }
    }
}

/// `ws://<host>:8080/`
pub fn socket_player_url(host: &str) -> String {
    format!("ws://{}:{}/", host, SOCKET_PLAYER_PORT)
}

/// `http://<host>:1984/webrtc.html?src=<camera>`
pub fn embedded_viewer_url(host: &str, camera: Camera) -> String {
    format!(
        "http://{}:{}/webrtc.html?src={}",
        host,
        EMBEDDED_VIEWER_PORT,
        camera.source_id()
    )
}
