mod chart;
mod home;

pub use chart::{Chart, ChartView};
pub use home::Home;
