//! Chart specification chosen by the model, and the renderer seam.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Upper bound on rows accepted from the model. The prompt asks for 4-7
/// but models do not reliably respect that.
pub const MAX_CHART_ROWS: usize = 10;

/// How a row's values should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    /// 12.3
    #[default]
    Number,
    /// 52.1%
    Percent,
    /// +4.2
    Plus,
}

/// A single stat row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// e.g. "PPG", "FG%"
    pub label: String,
    pub value_a: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_b: Option<f64>,
    #[serde(default)]
    pub fmt: ChartFormat,
    #[serde(default = "default_true")]
    pub higher_is_better: bool,
}

fn default_true() -> bool {
    true
}

/// Model-provided chart: one entity, or two when `label_b` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub label_a: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_b: Option<String>,
    pub rows: Vec<ChartRow>,
}

impl ChartSpec {
    /// Decode and validate a chart spec from a JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ChartError> {
        let spec: ChartSpec = serde_json::from_value(value.clone())
            .map_err(|e| ChartError::InvalidSpec(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.rows.is_empty() || self.rows.len() > MAX_CHART_ROWS {
            return Err(ChartError::InvalidSpec(format!(
                "expected 1-{MAX_CHART_ROWS} rows, got {}",
                self.rows.len()
            )));
        }
        Ok(())
    }

    /// Whether this is a two-entity comparison chart.
    pub fn is_comparison(&self) -> bool {
        self.label_b.is_some()
    }
}

/// Renders a chart spec to image bytes (PNG).
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, ChartError>;
}
