//! Per-render snapshot of everything the renderer needs.
//!
//! Building a frame runs the whole computation for one render: resolve the
//! group's items, extract observations, calculate limits, then construct the
//! scales (the value scale depends on the upper limit, so it comes last).

use crate::chart::palette;
use crate::core::config::RenderConfig;
use crate::core::format::category_label;
use crate::core::limits::{calculate_limits, ChartLimits, ChartType, LimitError};
use crate::core::model::ChartData;
use crate::core::scale::{BandScale, LinearScale};

/// A point in plot-area coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub category_id: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub x: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub group: String,
    pub chart_type: ChartType,
    pub color: &'static str,
    pub observations: Vec<f64>,
    /// `None` when no observation resolves; nothing is plotted then.
    pub limits: Option<ChartLimits>,
    pub points: Vec<PlotPoint>,
    pub skipped: usize,
    pub categories: Vec<AxisLabel>,
    pub x: BandScale,
    pub y: LinearScale,
    pub plot_width: f64,
    pub plot_height: f64,
}

impl ChartFrame {
    pub fn build(
        data: &ChartData,
        group: &str,
        chart_type: ChartType,
        config: &RenderConfig,
    ) -> Result<Self, LimitError> {
        let plot_width = config.plot_width();
        let plot_height = config.plot_height();
        let resolved = data.resolve_group(group);

        let observations: Vec<f64> = resolved.iter().filter_map(|r| r.value).collect();
        let limits = if observations.is_empty() {
            None
        } else {
            Some(calculate_limits(chart_type, &observations)?)
        };

        let x = BandScale::new(
            resolved.iter().map(|r| r.item.category_id.as_str()),
            (0.0, plot_width),
            config.band_padding,
        );
        let y = LinearScale::for_values(
            &observations,
            limits.map(|l| l.ucl),
            config.domain_headroom,
            plot_height,
        );

        let mut categories: Vec<AxisLabel> = Vec::with_capacity(x.len());
        let mut points = Vec::with_capacity(observations.len());
        for entry in &resolved {
            let category_id = entry.item.category_id.as_str();
            let Some(center) = x.center(category_id) else {
                continue;
            };
            if !categories.iter().any(|label| label.x == center) {
                categories.push(AxisLabel {
                    x: center,
                    text: category_label(category_id).to_string(),
                });
            }
            if let Some(value) = entry.value {
                points.push(PlotPoint {
                    category_id: category_id.to_string(),
                    value,
                    x: center,
                    y: y.map(value),
                });
            }
        }

        Ok(Self {
            group: group.to_string(),
            chart_type,
            color: palette::group_color(group),
            skipped: resolved.len() - points.len(),
            observations,
            limits,
            points,
            categories,
            x,
            y,
            plot_width,
            plot_height,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
