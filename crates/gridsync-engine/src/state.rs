#![forbid(unsafe_code)]

//! Canonical table-view state and its configuration.
//!
//! [`TableViewState`] is the single source of truth for one table
//! instance: pagination, sorting, per-column filters, and the optional
//! global filter. It has no independent persistence: it is derived from
//! the URL's parameter set through a [`TableConfig`] and written back as
//! navigation patches.

use std::collections::BTreeMap;
use std::fmt;

use gridsync_codec::{
    FilterField, FilterValue, PageState, PaginationConfig, ParamMap, SortConfig, SortRule,
};

/// Per-column filters, keyed by column id. Empty filters are never
/// materialized; a missing key IS "no filter".
pub type ColumnFilters = BTreeMap<String, FilterValue>;

/// The canonical, URL-backed state of one table instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableViewState {
    /// Current page and page size.
    pub pagination: PageState,
    /// Ordered sorting, primary sort first.
    pub sorting: Vec<SortRule>,
    /// Per-column filters.
    pub column_filters: ColumnFilters,
    /// Global filter text, when enabled for the table.
    pub global_filter: Option<String>,
}

impl TableViewState {
    /// Derive the full state from a URL parameter set.
    #[must_use]
    pub fn from_params(config: &TableConfig, params: &ParamMap) -> Self {
        let mut column_filters = ColumnFilters::new();
        for field in config.filters() {
            if let Some(value) = field.from_param(params.get(field.param_key())) {
                column_filters.insert(field.column().to_owned(), value);
            }
        }
        let global_filter = config.global().from_params(params);
        Self {
            pagination: config.pagination().from_params(params),
            sorting: config.sort().from_params(params),
            column_filters,
            global_filter,
        }
    }
}

/// Global-filter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalFilterConfig {
    enabled: bool,
    key: String,
    trim: bool,
}

impl Default for GlobalFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            key: "filter".to_owned(),
            trim: true,
        }
    }
}

impl GlobalFilterConfig {
    /// Enabled global filter with the default `filter` key.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Override the parameter key (builder).
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Disable whitespace trimming (builder).
    #[must_use]
    pub fn without_trim(mut self) -> Self {
        self.trim = false;
        self
    }

    /// Whether global-filter support is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The URL parameter key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Normalize a candidate value: trim when configured, empty means
    /// absent.
    #[must_use]
    pub fn normalize(&self, value: Option<String>) -> Option<String> {
        let value = value?;
        let value = if self.trim {
            value.trim().to_owned()
        } else {
            value
        };
        (!value.is_empty()).then_some(value)
    }

    /// Decode the global filter from the current parameters.
    #[must_use]
    pub fn from_params(&self, params: &ParamMap) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let text = params.get(&self.key)?.as_text()?.into_owned();
        self.normalize(Some(text))
    }
}

/// Static configuration of one table instance: every codec plus the
/// global-filter toggle. Built once by the caller, never mutated at
/// runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableConfig {
    pagination: PaginationConfig,
    sort: SortConfig,
    filters: Vec<FilterField>,
    global: GlobalFilterConfig,
}

impl TableConfig {
    /// Configuration with default pagination and single-column sort, no
    /// filter fields, global filter off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pagination codec (builder).
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Replace the sort codec (builder).
    #[must_use]
    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }

    /// Add one filter field (builder).
    #[must_use]
    pub fn with_filter(mut self, field: FilterField) -> Self {
        self.filters.push(field);
        self
    }

    /// Add many filter fields (builder).
    #[must_use]
    pub fn with_filters(mut self, fields: impl IntoIterator<Item = FilterField>) -> Self {
        self.filters.extend(fields);
        self
    }

    /// Replace the global-filter configuration (builder).
    #[must_use]
    pub fn with_global(mut self, global: GlobalFilterConfig) -> Self {
        self.global = global;
        self
    }

    /// The pagination codec.
    #[must_use]
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// The sort codec.
    #[must_use]
    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    /// The configured filter fields.
    #[must_use]
    pub fn filters(&self) -> &[FilterField] {
        &self.filters
    }

    /// The filter field for a column, if configured.
    #[must_use]
    pub fn filter_for(&self, column: &str) -> Option<&FilterField> {
        self.filters.iter().find(|field| field.column() == column)
    }

    /// The global-filter configuration.
    #[must_use]
    pub fn global(&self) -> &GlobalFilterConfig {
        &self.global
    }
}

/// A state update: either a new value or a function of the previous one.
///
/// ```
/// use gridsync_engine::Update;
///
/// let set: Update<u32> = 5.into();
/// assert_eq!(set.apply(&1), 5);
///
/// let bump = Update::with(|previous: &u32| previous + 1);
/// assert_eq!(bump.apply(&1), 2);
/// ```
pub enum Update<T> {
    /// Replace with this value.
    Value(T),
    /// Compute the next value from the previous one.
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    /// Functional update from the previous value.
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::With(Box::new(f))
    }

    /// Resolve against the previous value.
    #[must_use]
    pub fn apply(self, previous: &T) -> T {
        match self {
            Self::Value(value) => value,
            Self::With(f) => f(previous),
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::With(_) => f.debug_tuple("With").finish(),
        }
    }
}
