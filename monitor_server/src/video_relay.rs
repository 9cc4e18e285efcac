//! MPEG-TS over WebSocket relay for the socket player.
//!
//! Every viewer gets its own ffmpeg process that transcodes the camera to
//! mpeg1video; its stdout is forwarded as binary frames until ffmpeg ends
//! or the viewer goes away.

use std::net::SocketAddr;
use std::process::Stdio;

use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::process::Command;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};

use crate::config::MonitorConfig;

/// Bytes read from ffmpeg per WebSocket frame.
const CHUNK_SIZE: usize = 4096;

/// Camera input for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelaySource {
    Rtsp(String),
    /// Replayed forever at native rate
    LoopedFile(String),
}

impl RelaySource {
    /// `None` when live mode has no `RTSP_URL_BAK`.
    pub fn from_config(config: &MonitorConfig) -> Option<Self> {
        if config.is_file_mode() {
            return Some(RelaySource::LoopedFile(config.video_source_file.clone()));
        }
        config
            .rtsp_url_bak
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| RelaySource::Rtsp(url.clone()))
    }

    /// Full ffmpeg argument list writing MPEG-TS to stdout.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let input: Vec<&str> = match self {
            RelaySource::Rtsp(url) => vec!["-rtsp_transport", "tcp", "-i", url.as_str()],
            RelaySource::LoopedFile(file) => vec!["-re", "-stream_loop", "-1", "-i", file.as_str()],
        };
        let output = [
            "-f", "mpegts",
            "-codec:v", "mpeg1video",
            "-b:v", "800k",
            "-r", "25",
            "-s", "640x360",
            "-muxdelay", "0.001",
            "-",
        ];
        input.into_iter().chain(output).map(String::from).collect()
    }
}

/// Accept viewers until the listener fails.
pub async fn run(listener: TcpListener, source: Option<RelaySource>) {
    if source.is_none() {
        warn!("No RTSP_URL_BAK configured, socket player relay will refuse viewers");
    }
    while let Ok((stream, addr)) = listener.accept().await {
        info!("Viewer connecting from {}", addr);
        tokio::spawn(handle_viewer(stream, addr, source.clone()));
    }
}

async fn handle_viewer(stream: TcpStream, addr: SocketAddr, source: Option<RelaySource>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let Some(source) = source else {
        error!("✗ No RTSP URL configured, closing viewer {}", addr);
        let _ = ws_sender.close().await;
        return;
    };

    let mut child = match Command::new("ffmpeg")
        .args(source.ffmpeg_args())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("✗ ffmpeg not found, install it and add it to PATH");
            let _ = ws_sender.close().await;
            return;
        }
        Err(e) => {
            error!("✗ Failed to start ffmpeg: {}", e);
            let _ = ws_sender.close().await;
            return;
        }
    };
    info!("🎥 ffmpeg started for {}", addr);

    let Some(mut stdout) = child.stdout.take() else {
        error!("ffmpeg stdout not captured");
        let _ = child.kill().await;
        return;
    };

    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        tokio::select! {
            read = stdout.read(&mut buf) => match read {
                Ok(0) => {
                    info!("ffmpeg stopped sending data (stream ended?)");
                    break;
                }
                Ok(n) => {
                    if ws_sender.send(Message::Binary(buf[..n].to_vec())).await.is_err() {
                        info!("Viewer {} disconnected", addr);
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from ffmpeg: {}", e);
                    break;
                }
            },
            msg = ws_receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | None => {
                    info!("Viewer {} disconnected", addr);
                    break;
                }
                Some(Err(e)) => {
                    warn!("WebSocket error from {}: {}", addr, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    if let Err(e) = child.kill().await {
        warn!("Failed to stop ffmpeg: {}", e);
    }
    info!("Relay for {} finished", addr);
}
