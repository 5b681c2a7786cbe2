use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, StyleOptions};

/// Resolved description of one visible chart instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub height: u32,
    pub style_options: StyleOptions,
}

impl ChartSpec {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: ChartKind,
        height: u32,
        style_options: StyleOptions,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            height,
            style_options,
        }
    }

    /// Key under which the live renderer handle is published.
    #[must_use]
    pub fn handle_key(&self) -> String {
        format!("chart:{}", self.id)
    }
}
