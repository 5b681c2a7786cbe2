pub mod kind;
pub mod registry;
pub mod resolver;
pub mod series;
pub mod spec;
pub mod style;
pub mod table;

pub use kind::ChartKind;
pub use registry::{ChartRegistry, DEFAULT_CHART_HEIGHT, MILESTONE_LABEL, RegistryEntry};
pub use resolver::{BUILTIN_ID_RULES, CHART_CLASS_SUFFIX, ChartTypeResolver, HostElement};
pub use series::{LabeledPoint, NamedSeries, NestedSeries, SeriesData, SeriesValue};
pub use spec::ChartSpec;
pub use style::{Annotation, DEFAULT_PALETTE, StrokeCurve, StyleOptions};
pub use table::{DataTableModel, PLACEHOLDER, TableRow, format_cell};
