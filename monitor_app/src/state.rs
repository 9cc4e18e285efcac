//! Dashboard-wide reactive state, provided as context.

use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use monitor_common::{Panel, Reading};

use crate::poller::ReadingSink;
use crate::stream::StreamController;
use crate::tabs::TabSwitcher;

/// Shown in weight displays until the first reading arrives.
const NO_READING: &str = "--";

#[derive(Clone, Copy)]
pub struct DashboardState {
    /// Latest reading, overwritten by every accepted poll
    pub reading: ReadSignal<Option<Reading>>,
    set_reading: WriteSignal<Option<Reading>>,
    pub tabs: ReadSignal<TabSwitcher>,
    set_tabs: WriteSignal<TabSwitcher>,
    stream: StoredValue<StreamController, LocalStorage>,
}

impl DashboardState {
    pub fn new(stream: StreamController) -> Self {
        let (reading, set_reading) = signal(None);
        let (tabs, set_tabs) = signal(TabSwitcher::default());
        Self {
            reading,
            set_reading,
            tabs,
            set_tabs,
            stream: StoredValue::new_local(stream),
        }
    }

    /// Text for every weight display. Tracks the reading signal.
    pub fn weight_text(&self) -> String {
        self.reading
            .get()
            .map(|r| r.to_string())
            .unwrap_or_else(|| NO_READING.to_string())
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.tabs.with(|t| t.is_active(panel))
    }

    /// Handle a tab click: swap the active panel, then let the stream
    /// follow it.
    pub fn select_panel(&self, panel: Panel) {
        let mut transition = None;
        self.set_tabs.update(|tabs| transition = Some(tabs.select(panel)));
        if let Some(t) = transition {
            log::debug!("Tab {} -> {}", t.deactivated.id(), t.activated.id());
            self.stream.with_value(|s| s.on_panel_activated(t.activated));
        }
    }

    pub fn restart_stream(&self) {
        self.stream.with_value(|s| s.restart());
    }
}

impl ReadingSink for DashboardState {
    fn show(&self, reading: Reading) {
        self.set_reading.set(Some(reading));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::apply_status_body;
    use crate::stream::testing::{CountingStrategy, ManualTimer};

    fn dashboard() -> (DashboardState, CountingStrategy) {
        let strategy = CountingStrategy::default();
        let controller = StreamController::new(strategy.clone(), ManualTimer::default());
        (DashboardState::new(controller), strategy)
    }

    #[test]
    fn test_weight_text_follows_polled_readings() {
        Owner::new().with(|| {
            let (state, _) = dashboard();
            assert_eq!(state.weight_text(), "--");

            apply_status_body(r#"{"gewicht": 1234}"#, &state).unwrap();
            assert_eq!(state.reading.get_untracked(), Some(Reading(1234.0)));
            assert_eq!(state.weight_text(), "1234");

            // A body without the field keeps the last value on screen
            apply_status_body("{}", &state).unwrap();
            assert_eq!(state.weight_text(), "1234");
        });
    }

    #[test]
    fn test_selecting_panels_drives_the_stream() {
        Owner::new().with(|| {
            let (state, strategy) = dashboard();
            assert!(state.is_active(Panel::Data));

            state.select_panel(Panel::Stream);
            state.select_panel(Panel::Stream);
            assert!(state.is_active(Panel::Stream));
            assert!(!state.is_active(Panel::Data));
            assert_eq!(strategy.starts.get(), 1);
            assert!(strategy.running.get());

            state.select_panel(Panel::Data);
            assert!(state.is_active(Panel::Data));
            assert_eq!(strategy.stops.get(), 1);
            assert!(!strategy.running.get());
        });
    }

    #[test]
    fn test_restart_is_skipped_on_data_panel() {
        Owner::new().with(|| {
            let strategy = CountingStrategy::default();
            let timer = ManualTimer::default();
            let state = DashboardState::new(StreamController::new(strategy.clone(), timer.clone()));

            state.select_panel(Panel::Stream);
            state.restart_stream();
            state.select_panel(Panel::Data);
            timer.fire_all();
            assert!(!strategy.running.get());
            assert_eq!(strategy.starts.get(), 1);
        });
    }
}
