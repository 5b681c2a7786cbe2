use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed horizontal reference line drawn across a chart (milestone marker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub y: f64,
    pub label: String,
    #[serde(default = "default_annotation_color")]
    pub color: String,
}

impl Annotation {
    #[must_use]
    pub fn new(y: f64, label: impl Into<String>) -> Self {
        Self {
            y,
            label: label.into(),
            color: default_annotation_color(),
        }
    }
}

fn default_annotation_color() -> String {
    "#ff4560".to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeCurve {
    #[default]
    Smooth,
    Straight,
    Stepline,
}

/// Rendering defaults handed to the primary renderer and the fallback generator.
///
/// `extra` keeps renderer-specific options the engine does not interpret,
/// in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub colors: Vec<String>,
    pub curve: StrokeCurve,
    pub annotation: Option<Annotation>,
    pub extra: IndexMap<String, serde_json::Value>,
}

impl StyleOptions {
    #[must_use]
    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    #[must_use]
    pub fn with_curve(mut self, curve: StrokeCurve) -> Self {
        self.curve = curve;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Color for series `index`, cycling through the palette.
    #[must_use]
    pub fn color_at(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        &self.colors[index % self.colors.len()]
    }

    /// Overlays `overrides` on top of `self`; set fields in `overrides` win.
    #[must_use]
    pub fn merged_with(&self, overrides: &StyleOptions) -> StyleOptions {
        let mut merged = self.clone();
        if overrides.title.is_some() {
            merged.title.clone_from(&overrides.title);
        }
        if overrides.subtitle.is_some() {
            merged.subtitle.clone_from(&overrides.subtitle);
        }
        if !overrides.colors.is_empty() {
            merged.colors.clone_from(&overrides.colors);
        }
        if overrides.curve != StrokeCurve::default() {
            merged.curve = overrides.curve;
        }
        if overrides.annotation.is_some() {
            merged.annotation.clone_from(&overrides.annotation);
        }
        for (key, value) in &overrides.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }
}

pub const DEFAULT_PALETTE: [&str; 6] = [
    "#008ffb", "#00e396", "#feb019", "#ff4560", "#775dd0", "#3f51b5",
];
