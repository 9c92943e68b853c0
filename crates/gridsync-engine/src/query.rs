#![forbid(unsafe_code)]

//! Data-source contract types.
//!
//! The engine never fetches data; the host forwards a [`DataQuery`] (the
//! committed view state in data-source terms) to whatever returns a
//! page of rows, and hands the resulting [`Paged`] metadata back to the
//! page-range guard.

use gridsync_codec::SortRule;

use crate::state::{ColumnFilters, TableViewState};

/// The committed table-view state, shaped for a paginated data source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataQuery {
    /// 1-based page number.
    pub page: u64,
    /// Rows per page.
    pub page_size: u64,
    /// Ordered sorting, primary sort first.
    pub sort: Vec<SortRule>,
    /// Global filter text, when present.
    pub global: Option<String>,
    /// Per-column filters.
    pub filters: ColumnFilters,
}

impl DataQuery {
    /// Shape a committed state for the data source.
    #[must_use]
    pub fn from_state(state: TableViewState) -> Self {
        Self {
            page: state.pagination.page(),
            page_size: state.pagination.page_size,
            sort: state.sorting,
            global: state.global_filter,
            filters: state.column_filters,
        }
    }
}

/// One page of rows plus the counts the guard and the pager need.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paged<T> {
    /// The rows of this page.
    pub items: Vec<T>,
    /// Total row count across all pages.
    pub total: u64,
    /// 1-based page number this page answers.
    pub page: u64,
    /// Rows per page the query asked for.
    pub page_size: u64,
    /// Total page count; zero when there are no rows.
    pub total_pages: u64,
}

impl<T> Paged<T> {
    /// Build a page, computing `total_pages` from the counts.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// An empty result for a query.
    #[must_use]
    pub fn empty(page: u64, page_size: u64) -> Self {
        Self::new(Vec::new(), 0, page, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsync_codec::{FilterValue, PageState};

    #[test]
    fn data_query_reflects_state() {
        let mut filters = ColumnFilters::new();
        filters.insert("status".into(), FilterValue::set(["active"]));
        let state = TableViewState {
            pagination: PageState::new(2, 25),
            sorting: vec![SortRule::desc("createdAt")],
            column_filters: filters.clone(),
            global_filter: Some("dune".to_owned()),
        };
        let query = DataQuery::from_state(state);
        assert_eq!(query.page, 3);
        assert_eq!(query.page_size, 25);
        assert_eq!(query.sort, vec![SortRule::desc("createdAt")]);
        assert_eq!(query.global.as_deref(), Some("dune"));
        assert_eq!(query.filters, filters);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Paged::<u8>::new(Vec::new(), 41, 1, 10).total_pages, 5);
        assert_eq!(Paged::<u8>::new(Vec::new(), 40, 1, 10).total_pages, 4);
        assert_eq!(Paged::<u8>::empty(1, 10).total_pages, 0);
    }

    #[test]
    fn zero_page_size_never_divides() {
        assert_eq!(Paged::<u8>::new(Vec::new(), 10, 1, 0).total_pages, 0);
    }
}
