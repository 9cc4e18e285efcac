//! Shared API types for the weighbridge monitor.
//!
//! This crate provides the types used between the HTTP server and the
//! browser dashboard. All types are WASM-compatible.
//!
//! # Architecture
//!
//! - `monitor_common` - Wire types (StatusResponse, RawReading) and the
//!   fixed panel/camera/stream vocabulary both sides agree on
//! - `monitor_server` - Publishes readings and hosts the video plumbing
//! - `monitor_app` - Leptos dashboard that polls and displays readings
//!
//! # Usage
//!
//! ```rust
//! use monitor_common::{Panel, Reading, StatusResponse};
//! ```

mod status;
mod panels;
mod stream;

pub use status::*;
pub use panels::*;
pub use stream::*;
