use serde::Deserialize;

use crate::error::{DashError, Result};
use crate::model::{ChartKind, ChartSize, ChartSpec, IndexHandle, ReducerKind, DEFAULT_INDEX_NAME};
use crate::visualization::Resources;

pub const DEFAULT_OUTPUT_NAME: &str = "crossfilter";

/// On-disk dashboard description
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_index_name")]
    pub index_name: String,
    /// Base name of the saved artifacts
    #[serde(default = "default_output")]
    pub output: String,
    /// Columns to load as categorical
    #[serde(default)]
    pub categorical: Vec<String>,
    #[serde(default)]
    pub resources: Resources,
    pub charts: Vec<ChartConfig>,
}

/// A chart entry as written by the user, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub kind: String,
    pub axis: AxisConfig,
    #[serde(default = "default_reducer")]
    pub reducer: String,
    #[serde(default)]
    pub dimension_reducer: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Index the chart expects to attach to
    #[serde(default)]
    pub crossfilter_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AxisConfig {
    Single(String),
    Many(Vec<String>),
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT_NAME.to_string()
}

fn default_reducer() -> String {
    ReducerKind::None.name().to_string()
}

pub fn parse_config(json: &str) -> Result<DashboardConfig> {
    Ok(serde_json::from_str(json)?)
}

impl DashboardConfig {
    pub fn index(&self) -> Result<IndexHandle> {
        IndexHandle::new(self.index_name.clone())
    }

    /// Validate every chart entry against the dashboard's index
    pub fn chart_specs(&self, index: &IndexHandle) -> Result<Vec<ChartSpec>> {
        self.charts.iter().map(|c| c.to_spec(index)).collect()
    }
}

impl ChartConfig {
    pub fn to_spec(&self, index: &IndexHandle) -> Result<ChartSpec> {
        let kind = ChartKind::from_str(&self.kind)
            .ok_or_else(|| DashError::UnknownChartKind(self.kind.clone()))?;
        let reducer = ReducerKind::from_str(&self.reducer)
            .ok_or_else(|| DashError::UnknownReducer(self.reducer.clone()))?;

        let axis = match &self.axis {
            AxisConfig::Single(field) => vec![field.clone()],
            AxisConfig::Many(fields) => fields.clone(),
        };

        if let Some(name) = &self.crossfilter_name {
            if name != index.name() {
                return Err(DashError::IndexNameMismatch {
                    chart: format!("{}({})", kind.name(), axis.join(", ")),
                    expected: index.name().to_string(),
                    found: name.clone(),
                });
            }
        }

        let defaults = ChartSize::default();
        let size = ChartSize {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
        };

        ChartSpec::new(kind, axis, reducer, self.dimension_reducer.clone(), size)
    }
}
