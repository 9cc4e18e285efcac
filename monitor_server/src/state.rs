//! Shared weight state behind the status endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;
use monitor_common::StatusResponse;

use crate::stabilizer::WeightStabilizer;

pub type StateHandle = Arc<RwLock<WeightState>>;

#[derive(Debug, Default)]
pub struct WeightState {
    stabilizer: WeightStabilizer,
    /// Raw readings received since startup
    pub readings_received: u64,
}

impl WeightState {
    pub fn status(&self) -> StatusResponse {
        StatusResponse { gewicht: self.stabilizer.current() }
    }

    /// Run a raw detector reading through the stabiliser.
    pub fn ingest(&mut self, raw: Option<i64>) -> StatusResponse {
        self.readings_received += 1;
        StatusResponse { gewicht: self.stabilizer.process(raw) }
    }
}

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(WeightState::default()))
}
