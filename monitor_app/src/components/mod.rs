mod dashboard;
mod video_panel;
mod weight_display;

pub use dashboard::Dashboard;
pub use video_panel::VideoPanel;
pub use weight_display::{CleanNumber, WeightValue};
