#![forbid(unsafe_code)]

//! The table/URL state-synchronization engine.
//!
//! [`UrlStateEngine`] owns a [`TableConfig`] and a [`Navigator`] and keeps
//! one table's view state canonical in the URL. State is re-derived from
//! the navigator's current parameters on every read; there is no cached
//! copy to drift out of sync across back/forward navigation or deep
//! links.
//!
//! Every setter issues exactly one navigation patch, merged into the
//! previous full parameter set so unrelated keys survive. Every setter
//! except [`UrlStateEngine::set_pagination`] also resets the page
//! parameter to its default in the same patch; changing what the user is
//! looking at must not strand them on a page that no longer exists.
//!
//! ```
//! use gridsync_codec::{FilterField, FilterValue, SortConfig, SortRule};
//! use gridsync_engine::{MemoryNavigator, TableConfig, UrlStateEngine};
//!
//! let config = TableConfig::new()
//!     .with_sort(SortConfig::multi())
//!     .with_filter(FilterField::set("status"));
//! let mut engine = UrlStateEngine::new(config, MemoryNavigator::new());
//!
//! engine.set_sorting(vec![SortRule::desc("createdAt"), SortRule::asc("title")]);
//! assert_eq!(engine.navigator().query(), "sort=-createdAt%2Ctitle");
//!
//! let mut filters = engine.state().column_filters;
//! filters.insert("status".into(), FilterValue::set(["active"]));
//! engine.set_column_filters(filters);
//! assert_eq!(engine.navigator().query(), "sort=-createdAt%2Ctitle&status=active");
//! ```

use gridsync_codec::{PageState, ParamMap, ParamPatch, SortRule};

use crate::navigator::{NavigateRequest, Navigator};
use crate::query::DataQuery;
use crate::state::{ColumnFilters, TableConfig, TableViewState, Update};

/// Where the page-range guard sends an out-of-range page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageReset {
    /// Back to the first page.
    #[default]
    First,
    /// To the last page that still exists.
    Last,
}

/// One table instance's URL-state orchestrator.
#[derive(Debug)]
pub struct UrlStateEngine<N: Navigator> {
    config: TableConfig,
    navigator: N,
}

impl<N: Navigator> UrlStateEngine<N> {
    /// Build an engine over a host navigator.
    pub fn new(config: TableConfig, navigator: N) -> Self {
        Self { config, navigator }
    }

    /// The static configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The host navigator.
    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Consume the engine, returning the navigator.
    pub fn into_navigator(self) -> N {
        self.navigator
    }

    /// The current full parameter set.
    #[must_use]
    pub fn params(&self) -> ParamMap {
        self.navigator.params()
    }

    /// The canonical state, derived from the current URL.
    #[must_use]
    pub fn state(&self) -> TableViewState {
        TableViewState::from_params(&self.config, &self.params())
    }

    /// The committed state as data-source parameters.
    #[must_use]
    pub fn data_query(&self) -> DataQuery {
        DataQuery::from_state(self.state())
    }

    /// Change pagination. The only setter that does not reset the page.
    pub fn set_pagination(&mut self, update: impl Into<Update<PageState>>) {
        let next = update.into().apply(&self.state().pagination);
        let patch = self.config.pagination().to_patch(&next);
        self.push(patch, false);
    }

    /// Change sorting. The patch always removes the inactive sort mode's
    /// keys, so stale parameters cannot resurrect on reload.
    pub fn set_sorting(&mut self, update: impl Into<Update<Vec<SortRule>>>) {
        let next = update.into().apply(&self.state().sorting);
        let patch = self.config.sort().to_patch(&next);
        self.push(patch, true);
    }

    /// Change the per-column filters. The patch covers the whole filter
    /// domain: every configured field is set or removed.
    pub fn set_column_filters(&mut self, update: impl Into<Update<ColumnFilters>>) {
        let next = update.into().apply(&self.state().column_filters);
        let patch = self.filters_patch(&next);
        self.push(patch, true);
    }

    /// Change the global filter. A no-op unless global-filter support is
    /// enabled in the configuration.
    pub fn set_global_filter(&mut self, update: impl Into<Update<Option<String>>>) {
        if !self.config.global().is_enabled() {
            return;
        }
        let next = update.into().apply(&self.state().global_filter);
        let patch = self.global_patch(next);
        self.push(patch, true);
    }

    /// Clear every column filter and the global filter, resetting
    /// pagination, in one patch.
    pub fn reset_filters(&mut self) {
        let mut patch = self.filters_patch(&ColumnFilters::new());
        if self.config.global().is_enabled() {
            patch.unset(self.config.global().key().to_owned());
        }
        self.push(patch, true);
    }

    /// Commit a full filter state, and optionally a global-filter change,
    /// in one patch. This is the staged-apply path: several staged
    /// edits become one navigation.
    pub fn commit_filters(&mut self, filters: ColumnFilters, global: Option<Option<String>>) {
        let mut patch = self.filters_patch(&filters);
        if let Some(global) = global {
            patch.merge(self.global_patch(global));
        }
        self.push(patch, true);
    }

    /// Correct an out-of-range page after the result set shrank.
    ///
    /// When the current URL page exceeds `page_count` (and `page_count`
    /// is non-zero), navigates replace-style (browser history must not
    /// grow) to page 1 or the last valid page. Idempotent: once the page
    /// is in range this does nothing.
    pub fn ensure_page_in_range(&mut self, page_count: u64, reset: PageReset) {
        if page_count == 0 {
            return;
        }
        let params = self.params();
        let current = self.config.pagination().from_params(&params).page();
        if current <= page_count {
            return;
        }
        let target = match reset {
            PageReset::First => 1,
            PageReset::Last => page_count,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(current, page_count, target, "page out of range; correcting");
        let pagination = self.config.pagination();
        let mut patch = ParamPatch::new();
        if target == pagination.default_page() {
            patch.unset(pagination.page_key().to_owned());
        } else {
            patch.set(pagination.page_key().to_owned(), target);
        }
        self.navigator.navigate(NavigateRequest::replace_patch(patch));
    }

    /// Full filter-domain patch: every configured field set or removed.
    fn filters_patch(&self, filters: &ColumnFilters) -> ParamPatch {
        let mut patch = ParamPatch::new();
        for field in self.config.filters() {
            let value = filters
                .get(field.column())
                .and_then(|value| field.to_param(value));
            patch.set_or_unset(field.param_key().to_owned(), value);
        }
        patch
    }

    fn global_patch(&self, value: Option<String>) -> ParamPatch {
        let global = self.config.global();
        let mut patch = ParamPatch::new();
        match global.normalize(value) {
            Some(text) => patch.set(global.key().to_owned(), text),
            None => patch.unset(global.key().to_owned()),
        };
        patch
    }

    fn push(&mut self, mut patch: ParamPatch, reset_page: bool) {
        if reset_page {
            patch.merge(self.config.pagination().reset_page_patch());
        }
        self.navigator.navigate(NavigateRequest::patch(patch));
    }
}
