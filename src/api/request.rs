use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, HostElement, SeriesData, StyleOptions};
use crate::error::{ChartError, ChartResult};
use crate::interaction::ShortcutConfig;

pub const CHART_REQUEST_JSON_SCHEMA_V1: u32 = 1;

/// Everything a page supplies to mount one chart.
///
/// Omitted fields fall back to the catalog entry of the resolved kind:
/// no `series` means the sample series and categories are shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartRequest {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
    pub host: HostElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_options: Option<StyleOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequestJsonContractV1 {
    pub schema_version: u32,
    pub request: ChartRequest,
}

impl ChartRequest {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: HostElement) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: SeriesData, categories: Option<&[&str]>) -> Self {
        self.series = Some(series);
        self.categories =
            categories.map(|labels| labels.iter().map(|label| (*label).to_owned()).collect());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style_options = Some(style);
        self
    }

    /// Id used for naming-convention resolution: the host's own id when
    /// given, the chart region id otherwise.
    #[must_use]
    pub fn resolution_id(&self) -> &str {
        self.host.id.as_deref().unwrap_or(&self.id)
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartRequestJsonContractV1 {
            schema_version: CHART_REQUEST_JSON_SCHEMA_V1,
            request: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::Serialization(format!("failed to serialize chart request contract v1: {e}"))
        })
    }

    /// Accepts either a bare request or a versioned `{schema_version, request}`
    /// envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::Serialization(format!("failed to parse chart request json: {e}"))
        })?;
        if value.get("schema_version").is_none() {
            return serde_json::from_value(value).map_err(|e| {
                ChartError::Serialization(format!("invalid chart request: {e}"))
            });
        }

        let payload: ChartRequestJsonContractV1 = serde_json::from_value(value).map_err(|e| {
            ChartError::Serialization(format!("failed to parse chart request contract: {e}"))
        })?;
        if payload.schema_version != CHART_REQUEST_JSON_SCHEMA_V1 {
            return Err(ChartError::Serialization(format!(
                "unsupported chart request schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.request)
    }
}

/// Accessibility and export behaviour shared by every chart on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    pub shortcuts: ShortcutConfig,
    /// Whether the data table starts expanded while the live chart is shown.
    /// It is always expanded in fallback.
    pub table_initially_visible: bool,
    /// File name stem for exports; the chart id when unset.
    pub export_file_stem: Option<String>,
}

impl OverlayConfig {
    #[must_use]
    pub fn with_shortcuts(mut self, shortcuts: ShortcutConfig) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    #[must_use]
    pub fn with_table_initially_visible(mut self, visible: bool) -> Self {
        self.table_initially_visible = visible;
        self
    }

    #[must_use]
    pub fn with_export_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.export_file_stem = Some(stem.into());
        self
    }
}
