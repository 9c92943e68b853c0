#![forbid(unsafe_code)]

//! gridsync public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the codec and engine crates and offers a lightweight
//! prelude for day-to-day usage.
//!
//! ```
//! use gridsync::prelude::*;
//!
//! let config = TableConfig::new()
//!     .with_sort(SortConfig::multi())
//!     .with_filter(FilterField::set("status"))
//!     .with_global(GlobalFilterConfig::enabled());
//!
//! // Deep link in: the URL is the state.
//! let nav = MemoryNavigator::from_query("sort=-createdAt,title&status=active&page=3");
//! let mut engine = UrlStateEngine::new(config, nav);
//! let state = engine.state();
//! assert_eq!(state.pagination.page_index, 2);
//! assert_eq!(state.sorting[0], SortRule::desc("createdAt"));
//!
//! // State change out: one navigation patch, page reset included.
//! engine.set_global_filter(Some("dune".to_owned()));
//! assert_eq!(
//!     engine.navigator().query(),
//!     "filter=dune&sort=-createdAt%2Ctitle&status=active",
//! );
//! ```

// --- Codec re-exports ------------------------------------------------------

pub use gridsync_codec::params::{ParamMap, ParamPatch, ParamValue};
pub use gridsync_codec::percent::{decode_component, encode_component};
pub use gridsync_codec::{
    DeserializeFn, FilterField, FilterKind, FilterValue, PageState, PaginationConfig, SerializeFn,
    SortConfig, SortMode, SortRule,
};

// --- Engine re-exports -----------------------------------------------------

pub use gridsync_engine::{
    ColumnFilters, DataQuery, EditMode, GlobalFilterConfig, MemoryNavigator, NavigateRequest,
    Navigator, PageReset, Paged, SearchUpdate, StagedFilters, TableConfig, TableViewState,
    Update, UrlStateEngine,
};

/// Common imports for building a table-backed view.
pub mod prelude {
    pub use gridsync_codec::{
        FilterField, FilterKind, FilterValue, PageState, PaginationConfig, ParamMap, ParamPatch,
        ParamValue, SortConfig, SortMode, SortRule,
    };
    pub use gridsync_engine::{
        ColumnFilters, DataQuery, EditMode, GlobalFilterConfig, MemoryNavigator, NavigateRequest,
        Navigator, PageReset, Paged, StagedFilters, TableConfig, TableViewState, Update,
        UrlStateEngine,
    };
}
