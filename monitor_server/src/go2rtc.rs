//! go2rtc integration: keeps go2rtc.yaml in sync with config.json and runs
//! the go2rtc binary next to the server.

use std::path::Path;

use monitor_common::Camera;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

use crate::config::MonitorConfig;

pub const GO2RTC_CONFIG_FILE: &str = "go2rtc.yaml";

/// ffmpeg source that replays a file forever as if it were a live camera.
fn looped_file_source(file: &str) -> String {
    format!(
        "exec:ffmpeg -re -stream_loop -1 -i {} -c:v copy -rtsp_transport tcp -f rtsp {{output}}",
        file
    )
}

/// Render the `streams:` section for both cameras.
///
/// Cameras without an RTSP URL are left out.
pub fn render_config(config: &MonitorConfig) -> String {
    let mut yaml = String::from("streams:\n");

    if config.is_file_mode() {
        let source = looped_file_source(&config.video_source_file);
        for camera in Camera::ALL {
            yaml.push_str(&format!("  {}: '{}'\n", camera.source_id(), source));
        }
        return yaml;
    }

    let urls = [
        (Camera::Bak, config.rtsp_url_1.as_deref()),
        (Camera::Cam2, config.rtsp_url_2.as_deref()),
    ];
    for (camera, url) in urls {
        match url {
            Some(url) if !url.is_empty() => {
                yaml.push_str(&format!("  {}: {}\n", camera.source_id(), url));
            }
            _ => warn!("No RTSP URL for {}, stream left out of go2rtc.yaml", camera.source_id()),
        }
    }
    yaml
}

pub fn write_config(config: &MonitorConfig, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render_config(config))
}

/// The go2rtc child process. Killed when dropped.
pub struct Go2rtcProcess {
    child: Child,
}

impl Go2rtcProcess {
    /// Start go2rtc from `bin`. Returns `None` (after logging) when the
    /// binary is missing or fails to start; the dashboard still works
    /// without video.
    pub fn spawn(bin: &Path) -> Option<Self> {
        if !bin.exists() {
            warn!(
                "{} not found. Download go2rtc and place it next to the server to enable video.",
                bin.display()
            );
            return None;
        }

        info!("Starting {} in the background...", bin.display());
        match Command::new(bin).kill_on_drop(true).spawn() {
            Ok(child) => {
                info!("✓ go2rtc running");
                Some(Self { child })
            }
            Err(e) => {
                error!("✗ Failed to start go2rtc: {}", e);
                None
            }
        }
    }

    pub async fn shutdown(mut self) {
        info!("Stopping go2rtc...");
        if let Err(e) = self.child.kill().await {
            warn!("Failed to stop go2rtc: {}", e);
        }
    }
}
