use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, ChartRegistry};

pub const CHART_CLASS_SUFFIX: &str = "-chart";

/// Naming facts about the element hosting a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostElement {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub parent_classes: Vec<String>,
}

impl HostElement {
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes = classes.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    #[must_use]
    pub fn with_parent_classes(mut self, classes: &[&str]) -> Self {
        self.parent_classes = classes.iter().map(|c| (*c).to_owned()).collect();
        self
    }
}

/// Id substrings checked in order; the first key contained in the host id wins.
pub const BUILTIN_ID_RULES: [(&str, ChartKind); 16] = [
    ("quantumMarketForecast", ChartKind::Area),
    ("marketGrowth", ChartKind::Area),
    ("fundingAllocation", ChartKind::Donut),
    ("revenueStreams", ChartKind::Pie),
    ("competitiveLandscape", ChartKind::Radar),
    ("revenueProjection", ChartKind::Bar),
    ("userGrowth", ChartKind::Line),
    ("customerSegments", ChartKind::Scatter),
    ("riskMatrix", ChartKind::Heatmap),
    ("roadmap", ChartKind::Timeline),
    ("unitEconomics", ChartKind::Mixed),
    ("tokenPrice", ChartKind::Candlestick),
    ("latencyDistribution", ChartKind::BoxPlot),
    ("marketShare", ChartKind::Treemap),
    ("scenarioRange", ChartKind::RangeArea),
    ("teamComposition", ChartKind::Polar),
];

/// Infers a chart kind from host naming conventions only.
///
/// Priority: host class tokens, parent class tokens, id substring table,
/// then `line`. Class tokens only count when the kind has a registry entry.
#[derive(Debug, Clone)]
pub struct ChartTypeResolver<'a> {
    registry: &'a ChartRegistry,
    id_rules: Vec<(String, ChartKind)>,
}

impl<'a> ChartTypeResolver<'a> {
    #[must_use]
    pub fn new(registry: &'a ChartRegistry) -> Self {
        Self::with_id_rules(
            registry,
            BUILTIN_ID_RULES.iter().map(|(key, kind)| ((*key).to_owned(), *kind)),
        )
    }

    #[must_use]
    pub fn with_id_rules(
        registry: &'a ChartRegistry,
        rules: impl IntoIterator<Item = (String, ChartKind)>,
    ) -> Self {
        Self {
            registry,
            id_rules: rules.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn resolve(
        &self,
        host_classes: &[String],
        parent_classes: &[String],
        host_id: Option<&str>,
    ) -> ChartKind {
        self.kind_from_classes(host_classes)
            .or_else(|| self.kind_from_classes(parent_classes))
            .or_else(|| host_id.and_then(|id| self.kind_from_id(id)))
            .unwrap_or(ChartKind::Line)
    }

    #[must_use]
    pub fn resolve_host(&self, host: &HostElement) -> ChartKind {
        self.resolve(&host.classes, &host.parent_classes, host.id.as_deref())
    }

    fn kind_from_classes(&self, classes: &[String]) -> Option<ChartKind> {
        classes.iter().find_map(|token| {
            let prefix = token.strip_suffix(CHART_CLASS_SUFFIX)?;
            let kind = ChartKind::from_name(prefix)?;
            self.registry.contains(kind).then_some(kind)
        })
    }

    fn kind_from_id(&self, id: &str) -> Option<ChartKind> {
        self.id_rules
            .iter()
            .find(|(key, _)| id.contains(key.as_str()))
            .map(|(_, kind)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::ChartTypeResolver;
    use crate::core::{ChartKind, ChartRegistry};

    #[test]
    fn class_tokens_without_registry_entry_are_skipped() {
        let registry = ChartRegistry::builtin();
        let resolver = ChartTypeResolver::new(&registry);
        let classes = vec!["funnel-chart".to_owned(), "bar-chart".to_owned()];
        assert_eq!(resolver.resolve(&classes, &[], None), ChartKind::Bar);
    }
}
