//! Runtime configuration.
//!
//! Camera sources come from `config.json` (shared with the go2rtc setup and
//! the detector); ports and paths of this server come from environment
//! variables.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Searched in order; the first existing file wins.
pub const CONFIG_PATHS: [&str; 2] = ["config.json", "data/config.json"];

/// Loop file used when file mode has no explicit file.
const DEFAULT_VIDEO_FILE: &str = "test/test_video.mp4";

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Failed to read {}: {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "Invalid config in {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where camera video comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSourceType {
    /// Loop a local file as if it were a live camera (testing)
    File,
    /// Live RTSP cameras. Any unrecognised value also means live.
    #[default]
    #[serde(other)]
    Rtsp,
}

/// Contents of `config.json`. Unknown keys (detector settings, secrets)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    #[serde(rename = "VIDEO_SOURCE_TYPE")]
    pub video_source_type: VideoSourceType,
    #[serde(rename = "VIDEO_SOURCE_FILE")]
    pub video_source_file: String,
    /// go2rtc `cam_bak`
    #[serde(rename = "RTSP_URL_1")]
    pub rtsp_url_1: Option<String>,
    /// go2rtc `cam2`
    #[serde(rename = "RTSP_URL_2")]
    pub rtsp_url_2: Option<String>,
    /// Source of the socket player relay
    #[serde(rename = "RTSP_URL_BAK")]
    pub rtsp_url_bak: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            video_source_type: VideoSourceType::Rtsp,
            video_source_file: DEFAULT_VIDEO_FILE.to_string(),
            rtsp_url_1: None,
            rtsp_url_2: None,
            rtsp_url_bak: None,
        }
    }
}

impl MonitorConfig {
    /// Load the first existing file of `paths`. No file at all yields the
    /// defaults; an unreadable or malformed file is an error.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let Some(path) = paths.iter().map(|p| p.as_ref()).find(|p: &&Path| p.exists()) else {
            warn!("No config.json found, using defaults (video will not work)");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn is_file_mode(&self) -> bool {
        self.video_source_type == VideoSourceType::File
    }
}

/// Ports and paths of this process.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub http_port: u16,
    pub relay_port: u16,
    /// Built dashboard bundle (trunk output)
    pub static_dir: PathBuf,
    pub go2rtc_bin: PathBuf,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = |key: &str, default: u16| {
            lookup(key)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(default)
        };
        Self {
            http_port: port("MONITOR_HTTP_PORT", 5000),
            relay_port: port("MONITOR_RELAY_PORT", monitor_common::SOCKET_PLAYER_PORT),
            static_dir: lookup("MONITOR_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("monitor_app/dist")),
            go2rtc_bin: lookup("MONITOR_GO2RTC_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(default_go2rtc_bin),
        }
    }
}

fn default_go2rtc_bin() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("go2rtc.exe")
    } else {
        PathBuf::from("./go2rtc")
    }
}
