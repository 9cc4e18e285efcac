//! Tabbed panel identifiers.

use serde::{Deserialize, Serialize};

/// One tabbed section of the dashboard. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    /// Weight readout, active on page load
    #[default]
    Data,
    /// Live video plus a second weight readout
    Stream,
}

impl Panel {
    pub const ALL: [Panel; 2] = [Panel::Data, Panel::Stream];

    /// Element id of the panel, also used as the tab button's `data-tab`.
    pub fn id(&self) -> &'static str {
        match self {
            Panel::Data => "data-tab",
            Panel::Stream => "stream-tab",
        }
    }

    pub fn from_id(id: &str) -> Option<Panel> {
        Panel::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Tab button label.
    pub fn label(&self) -> &'static str {
        match self {
            Panel::Data => "Gewicht",
            Panel::Stream => "Live",
        }
    }

    /// Whether the live video connection belongs to this panel.
    pub fn is_video(&self) -> bool {
        matches!(self, Panel::Stream)
    }
}
