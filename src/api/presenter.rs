use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use crate::core::DataTableModel;
use crate::error::{ChartError, ChartResult};
use crate::render::LiveChart;

use super::ExportArtifact;

/// What occupies a chart region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionContent {
    /// The live renderer draws into the region itself.
    Primary,
    /// Static fallback graphic markup.
    Fallback { svg: String },
}

/// Shared, read-only view of a live chart instance.
///
/// Published once per entry into `PrimaryActive`. Consumers may query the
/// chart but never mutate it; only the owning wrapper repaints through it.
#[derive(Clone)]
pub struct RendererHandle {
    inner: Rc<RefCell<Box<dyn LiveChart>>>,
}

impl RendererHandle {
    pub(crate) fn new(chart: Box<dyn LiveChart>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(chart)),
        }
    }

    /// Runs `f` against the live chart. Returns `None` while the owning
    /// wrapper is repainting.
    pub fn query<R>(&self, f: impl FnOnce(&dyn LiveChart) -> R) -> Option<R> {
        let chart = self.inner.try_borrow().ok()?;
        Some(f(&**chart))
    }

    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn with_mut<R>(
        &self,
        f: impl FnOnce(&mut dyn LiveChart) -> ChartResult<R>,
    ) -> ChartResult<R> {
        let mut chart = self.inner.try_borrow_mut().map_err(|_| {
            ChartError::RendererFailed("live chart is borrowed by a handle consumer".to_owned())
        })?;
        f(&mut **chart)
    }
}

impl fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererHandle")
            .field("references", &Rc::strong_count(&self.inner))
            .finish()
    }
}

/// Page capability the wrapper drives.
///
/// Implementations own the real surface (a DOM, a widget tree, a test
/// double). Every call is infallible from the wrapper's point of view.
pub trait Presenter {
    fn host_exists(&self, chart_id: &str) -> bool;

    fn mount(&mut self, chart_id: &str, content: RegionContent);

    fn unmount(&mut self, chart_id: &str);

    /// Creates the table toggle and table container next to the region,
    /// unless they already exist for `chart_id`.
    fn ensure_table_controls(&mut self, chart_id: &str);

    fn show_table(&mut self, chart_id: &str, table: &DataTableModel, visible: bool);

    fn set_table_visible(&mut self, chart_id: &str, visible: bool);

    /// Polite live-region announcement.
    fn announce(&mut self, chart_id: &str, message: &str);

    fn publish_handle(&mut self, key: &str, handle: RendererHandle);

    fn withdraw_handle(&mut self, key: &str);

    fn set_png_export_enabled(&mut self, chart_id: &str, enabled: bool);

    fn deliver_export(&mut self, chart_id: &str, artifact: ExportArtifact);
}

/// Everything a `MemoryPresenter` holds for one chart id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSnapshot {
    pub content: Option<RegionContent>,
    pub table: Option<DataTableModel>,
    pub table_visible: bool,
    pub table_controls_created: usize,
    pub announcements: Vec<String>,
    pub png_export_enabled: bool,
    pub exports: Vec<ExportArtifact>,
}

/// Headless presenter backed by plain collections.
#[derive(Debug, Default)]
pub struct MemoryPresenter {
    hosts: IndexSet<String>,
    regions: IndexMap<String, RegionSnapshot>,
    handles: IndexMap<String, RendererHandle>,
    publications: Vec<String>,
}

impl MemoryPresenter {
    #[must_use]
    pub fn with_hosts(ids: &[&str]) -> Self {
        Self {
            hosts: ids.iter().map(|id| (*id).to_owned()).collect(),
            ..Self::default()
        }
    }

    pub fn add_host(&mut self, chart_id: impl Into<String>) {
        self.hosts.insert(chart_id.into());
    }

    pub fn remove_host(&mut self, chart_id: &str) {
        self.hosts.shift_remove(chart_id);
    }

    #[must_use]
    pub fn region(&self, chart_id: &str) -> Option<&RegionSnapshot> {
        self.regions.get(chart_id)
    }

    #[must_use]
    pub fn handle(&self, key: &str) -> Option<&RendererHandle> {
        self.handles.get(key)
    }

    /// Keys in publication order, one entry per publish call.
    #[must_use]
    pub fn publications(&self) -> &[String] {
        &self.publications
    }

    fn region_mut(&mut self, chart_id: &str) -> &mut RegionSnapshot {
        self.regions.entry(chart_id.to_owned()).or_default()
    }
}

impl Presenter for MemoryPresenter {
    fn host_exists(&self, chart_id: &str) -> bool {
        self.hosts.contains(chart_id)
    }

    fn mount(&mut self, chart_id: &str, content: RegionContent) {
        self.region_mut(chart_id).content = Some(content);
    }

    fn unmount(&mut self, chart_id: &str) {
        self.regions.shift_remove(chart_id);
    }

    fn ensure_table_controls(&mut self, chart_id: &str) {
        let region = self.region_mut(chart_id);
        if region.table_controls_created == 0 {
            region.table_controls_created = 1;
        }
    }

    fn show_table(&mut self, chart_id: &str, table: &DataTableModel, visible: bool) {
        let region = self.region_mut(chart_id);
        region.table = Some(table.clone());
        region.table_visible = visible;
    }

    fn set_table_visible(&mut self, chart_id: &str, visible: bool) {
        self.region_mut(chart_id).table_visible = visible;
    }

    fn announce(&mut self, chart_id: &str, message: &str) {
        self.region_mut(chart_id)
            .announcements
            .push(message.to_owned());
    }

    fn publish_handle(&mut self, key: &str, handle: RendererHandle) {
        self.handles.insert(key.to_owned(), handle);
        self.publications.push(key.to_owned());
    }

    fn withdraw_handle(&mut self, key: &str) {
        self.handles.shift_remove(key);
    }

    fn set_png_export_enabled(&mut self, chart_id: &str, enabled: bool) {
        self.region_mut(chart_id).png_export_enabled = enabled;
    }

    fn deliver_export(&mut self, chart_id: &str, artifact: ExportArtifact) {
        self.region_mut(chart_id).exports.push(artifact);
    }
}
