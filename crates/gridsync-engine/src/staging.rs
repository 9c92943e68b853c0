#![forbid(unsafe_code)]

//! Staged filter edits with an explicit apply.
//!
//! A filter toolbar runs each of its two surfaces (the search inputs and
//! the faceted filter groups) in one of two modes:
//!
//! - [`EditMode::Instant`]: every edit goes straight to the engine and
//!   the URL.
//! - [`EditMode::Manual`]: edits accumulate in a local staging area,
//!   invisible to the committed state and the URL, until the user applies
//!   them (apply button, or Enter in a search field). Apply flushes every
//!   staged value in ONE navigation patch.
//!
//! Staging state never appears in the URL; only the committed state does.
//! A second apply while one is in flight is dropped; a double-clicked
//! apply button must not issue duplicate navigation patches.

use std::collections::{BTreeMap, BTreeSet};

use gridsync_codec::FilterValue;

use crate::engine::UrlStateEngine;
use crate::navigator::Navigator;

/// How a toolbar surface propagates edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    /// Edits hit the engine immediately.
    #[default]
    Instant,
    /// Edits stage locally until an explicit apply.
    Manual,
}

/// Staged, not-yet-committed filter edits for one toolbar.
#[derive(Debug, Clone, Default)]
pub struct StagedFilters {
    search_mode: EditMode,
    filter_mode: EditMode,
    staged_search: BTreeMap<String, String>,
    staged_filters: BTreeMap<String, BTreeSet<String>>,
    staged_global: Option<String>,
    is_applying: bool,
}

impl StagedFilters {
    /// Manager with both surfaces in instant mode.
    #[must_use]
    pub fn instant() -> Self {
        Self::default()
    }

    /// Manager with both surfaces in manual mode.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            search_mode: EditMode::Manual,
            filter_mode: EditMode::Manual,
            ..Self::default()
        }
    }

    /// Set the search-surface mode (builder).
    #[must_use]
    pub fn with_search_mode(mut self, mode: EditMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Set the filter-group mode (builder).
    #[must_use]
    pub fn with_filter_mode(mut self, mode: EditMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// The search-surface mode.
    #[must_use]
    pub fn search_mode(&self) -> EditMode {
        self.search_mode
    }

    /// The filter-group mode.
    #[must_use]
    pub fn filter_mode(&self) -> EditMode {
        self.filter_mode
    }

    /// Whether an apply is in flight.
    #[must_use]
    pub fn is_applying(&self) -> bool {
        self.is_applying
    }

    /// The staged text for a search field, if any.
    #[must_use]
    pub fn staged_search(&self, column: &str) -> Option<&str> {
        self.staged_search.get(column).map(String::as_str)
    }

    /// The staged option set for a filter group, if any.
    #[must_use]
    pub fn staged_filter(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.staged_filters.get(column)
    }

    /// The staged global search text, if any.
    #[must_use]
    pub fn staged_global(&self) -> Option<&str> {
        self.staged_global.as_deref()
    }

    /// Edit a per-column search field.
    pub fn set_search<N: Navigator>(
        &mut self,
        column: impl Into<String>,
        value: impl Into<String>,
        engine: &mut UrlStateEngine<N>,
    ) {
        let column = column.into();
        let value = value.into();
        match self.search_mode {
            EditMode::Instant => {
                let mut filters = engine.state().column_filters;
                if value.trim().is_empty() {
                    filters.remove(&column);
                } else {
                    filters.insert(column, FilterValue::Text(value));
                }
                engine.set_column_filters(filters);
            }
            EditMode::Manual => {
                self.staged_search.insert(column, value);
            }
        }
    }

    /// Edit the global search field.
    pub fn set_global_search<N: Navigator>(
        &mut self,
        value: impl Into<String>,
        engine: &mut UrlStateEngine<N>,
    ) {
        let value = value.into();
        match self.search_mode {
            EditMode::Instant => engine.set_global_filter(Some(value)),
            EditMode::Manual => self.staged_global = Some(value),
        }
    }

    /// Toggle one option in a faceted filter group.
    ///
    /// In manual mode the staged set seeds from the committed value on
    /// first touch, so the toggle flips exactly the option the user sees.
    pub fn toggle_filter_option<N: Navigator>(
        &mut self,
        column: impl Into<String>,
        option: impl Into<String>,
        engine: &mut UrlStateEngine<N>,
    ) {
        let column = column.into();
        let option = option.into();
        match self.filter_mode {
            EditMode::Instant => {
                let mut filters = engine.state().column_filters;
                let mut set = filters
                    .get(&column)
                    .and_then(FilterValue::as_set)
                    .cloned()
                    .unwrap_or_default();
                toggle(&mut set, option);
                if set.is_empty() {
                    filters.remove(&column);
                } else {
                    filters.insert(column, FilterValue::Set(set));
                }
                engine.set_column_filters(filters);
            }
            EditMode::Manual => {
                let committed = engine.state();
                let set = self.staged_filters.entry(column.clone()).or_insert_with(|| {
                    committed
                        .column_filters
                        .get(&column)
                        .and_then(FilterValue::as_set)
                        .cloned()
                        .unwrap_or_default()
                });
                toggle(set, option);
            }
        }
    }

    /// Replace a filter group's option set outright.
    pub fn set_filter<N: Navigator>(
        &mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
        engine: &mut UrlStateEngine<N>,
    ) {
        let column = column.into();
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        match self.filter_mode {
            EditMode::Instant => {
                let mut filters = engine.state().column_filters;
                if set.is_empty() {
                    filters.remove(&column);
                } else {
                    filters.insert(column, FilterValue::Set(set));
                }
                engine.set_column_filters(filters);
            }
            EditMode::Manual => {
                self.staged_filters.insert(column, set);
            }
        }
    }

    /// Flush every staged edit into the engine in one navigation patch,
    /// then clear staging.
    ///
    /// Returns `false`, and changes nothing, when an apply is already
    /// in flight.
    pub fn apply_all<N: Navigator>(&mut self, engine: &mut UrlStateEngine<N>) -> bool {
        if !self.begin_apply(engine) {
            return false;
        }
        self.finish_apply();
        true
    }

    /// Like [`StagedFilters::apply_all`], but leaves the in-flight flag
    /// held. Hosts that refresh data asynchronously after the flush call
    /// [`StagedFilters::finish_apply`] when that work completes; apply
    /// requests in between are dropped.
    pub fn apply_all_deferred<N: Navigator>(&mut self, engine: &mut UrlStateEngine<N>) -> bool {
        self.begin_apply(engine)
    }

    /// Release the in-flight flag after a deferred apply.
    pub fn finish_apply(&mut self) {
        self.is_applying = false;
    }

    /// Clear staged edits only; committed state and URL are untouched.
    pub fn clear_staged(&mut self) {
        self.staged_search.clear();
        self.staged_filters.clear();
        self.staged_global = None;
    }

    /// Clear staged edits AND all committed filters, global filter, and
    /// pagination, in one navigation patch. Usable from either mode.
    pub fn reset_all<N: Navigator>(&mut self, engine: &mut UrlStateEngine<N>) {
        self.clear_staged();
        engine.reset_filters();
    }

    /// Whether any staged or committed filter/search value is non-empty.
    /// Pure display predicate; no side effects.
    #[must_use]
    pub fn has_active_filters<N: Navigator>(&self, engine: &UrlStateEngine<N>) -> bool {
        if self.staged_search.values().any(|v| !v.trim().is_empty())
            || self.staged_filters.values().any(|set| !set.is_empty())
            || self.staged_global.as_deref().is_some_and(|v| !v.trim().is_empty())
        {
            return true;
        }
        let state = engine.state();
        !state.column_filters.is_empty() || state.global_filter.is_some()
    }

    fn begin_apply<N: Navigator>(&mut self, engine: &mut UrlStateEngine<N>) -> bool {
        if self.is_applying {
            return false;
        }
        self.is_applying = true;

        let mut filters = engine.state().column_filters;
        for (column, text) in std::mem::take(&mut self.staged_search) {
            if text.trim().is_empty() {
                filters.remove(&column);
            } else {
                filters.insert(column, FilterValue::Text(text));
            }
        }
        for (column, set) in std::mem::take(&mut self.staged_filters) {
            if set.is_empty() {
                filters.remove(&column);
            } else {
                filters.insert(column, FilterValue::Set(set));
            }
        }
        let global = self.staged_global.take().map(Some);
        engine.commit_filters(filters, global);
        true
    }
}

fn toggle(set: &mut BTreeSet<String>, option: String) {
    if !set.remove(&option) {
        set.insert(option);
    }
}
