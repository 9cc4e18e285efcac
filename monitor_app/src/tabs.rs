//! Tab switching between the dashboard panels.

use monitor_common::Panel;

/// Result of a tab click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabTransition {
    pub deactivated: Panel,
    pub activated: Panel,
}

/// Tracks the single active panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabSwitcher {
    active: Panel,
}

impl TabSwitcher {
    pub fn new(initial: Panel) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active == panel
    }

    /// Make `panel` the active one. Selecting the already active panel is
    /// allowed and yields a transition onto itself.
    pub fn select(&mut self, panel: Panel) -> TabTransition {
        let deactivated = std::mem::replace(&mut self.active, panel);
        TabTransition { deactivated, activated: panel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(tabs: &TabSwitcher) -> usize {
        Panel::ALL.iter().filter(|p| tabs.is_active(**p)).count()
    }

    #[test]
    fn test_starts_on_data_panel() {
        let tabs = TabSwitcher::default();
        assert_eq!(tabs.active(), Panel::Data);
        assert_eq!(active_count(&tabs), 1);
    }

    #[test]
    fn test_switch_to_stream_panel() {
        let mut tabs = TabSwitcher::new(Panel::Data);
        let transition = tabs.select(Panel::Stream);
        assert_eq!(transition, TabTransition { deactivated: Panel::Data, activated: Panel::Stream });
        assert!(tabs.is_active(Panel::Stream));
        assert!(!tabs.is_active(Panel::Data));
    }

    #[test]
    fn test_exactly_one_active_across_clicks() {
        let mut tabs = TabSwitcher::default();
        let clicks = [Panel::Stream, Panel::Stream, Panel::Data, Panel::Data, Panel::Stream];
        for panel in clicks {
            tabs.select(panel);
            assert_eq!(active_count(&tabs), 1);
            assert_eq!(tabs.active(), panel);
        }
    }

    #[test]
    fn test_reselecting_active_panel() {
        let mut tabs = TabSwitcher::new(Panel::Stream);
        let transition = tabs.select(Panel::Stream);
        assert_eq!(transition.deactivated, Panel::Stream);
        assert_eq!(transition.activated, Panel::Stream);
    }
}
