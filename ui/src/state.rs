//! Chart page state as immutable snapshots.
//!
//! Every user action produces a new [`ChartState`] through
//! [`ChartState::apply`]; the view then rebuilds the frame and redraws from
//! that snapshot. Nothing is patched in place.

use std::sync::Arc;

use crate::chart::{encode_png, png_data_url, ChartFrame, ChartRenderer, RenderError};
use crate::core::config::RenderConfig;
use crate::core::limits::{ChartLimits, ChartType, LimitError};
use crate::core::model::{ChartData, LoadError, DEFAULT_GROUP};

#[derive(Debug, Clone)]
pub enum ChartAction {
    Load(ChartData),
    SelectGroup(String),
    SelectChartType(ChartType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub document: Option<Arc<ChartData>>,
    pub group: String,
    pub chart_type: ChartType,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            document: None,
            group: DEFAULT_GROUP.to_string(),
            chart_type: ChartType::default(),
        }
    }
}

impl ChartState {
    pub fn apply(&self, action: ChartAction) -> ChartState {
        match action {
            ChartAction::Load(data) => {
                let group = data.default_group();
                tracing::info!(
                    groups = data.group_mapping.len(),
                    rows = data.data_row_mapping.len(),
                    group = %group,
                    "chart document loaded"
                );
                ChartState {
                    document: Some(Arc::new(data)),
                    group,
                    chart_type: ChartType::default(),
                }
            }
            ChartAction::SelectGroup(group) => {
                let available = self
                    .document
                    .as_ref()
                    .is_some_and(|doc| doc.has_group(&group));
                if !available {
                    tracing::warn!(group = %group, "ignoring selection of unavailable group");
                    return self.clone();
                }
                tracing::info!(group = %group, "group selected");
                ChartState {
                    group,
                    ..self.clone()
                }
            }
            ChartAction::SelectChartType(chart_type) => {
                tracing::info!(chart_type = %chart_type, "chart type selected");
                ChartState {
                    chart_type,
                    ..self.clone()
                }
            }
        }
    }

    /// Parse `text` and load it; on failure the current state is kept.
    pub fn load_json(&self, text: &str) -> Result<ChartState, LoadError> {
        let data = ChartData::from_json(text).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected chart file");
        })?;
        Ok(self.apply(ChartAction::Load(data)))
    }

    pub fn group_names(&self) -> Vec<String> {
        self.document
            .as_ref()
            .map(|doc| doc.group_names())
            .unwrap_or_default()
    }

    /// Recompute everything the renderer needs for this snapshot.
    pub fn frame(&self, config: &RenderConfig) -> Option<Result<ChartFrame, LimitError>> {
        self.document
            .as_ref()
            .map(|doc| ChartFrame::build(doc, &self.group, self.chart_type, config))
    }
}

/// Encoded output of one redraw, ready for an `img` element.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub data_url: String,
    pub points: usize,
    pub skipped: usize,
    pub limits: Option<ChartLimits>,
}

/// Full recompute and redraw for a snapshot. `Ok(None)` means nothing is
/// loaded yet.
pub fn redraw(
    renderer: &mut ChartRenderer,
    snapshot: &ChartState,
) -> Result<Option<ChartImage>, RenderError> {
    let Some(frame) = snapshot.frame(renderer.config()) else {
        return Ok(None);
    };
    let frame = frame?;
    let surface = renderer.render(&frame)?;
    let png = encode_png(&surface)?;
    tracing::debug!(
        group = %frame.group,
        chart_type = %frame.chart_type,
        points = frame.points.len(),
        bytes = png.len(),
        "chart redrawn"
    );
    Ok(Some(ChartImage {
        data_url: png_data_url(&png),
        points: frame.points.len(),
        skipped: frame.skipped,
        limits: frame.limits,
    }))
}
