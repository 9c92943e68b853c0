#![forbid(unsafe_code)]

//! Table/URL state-synchronization engine.
//!
//! Keeps one data grid's pagination, sorting, column filters, and global
//! filter canonical in the URL query string, so every view is shareable,
//! reload-safe, and back/forward-correct. The engine's entire boundary is
//! a typed parameter map and a host-supplied [`Navigator`]; rendering and
//! data fetching stay outside.
//!
//! - [`UrlStateEngine`]: derives [`TableViewState`] from the URL and
//!   turns each state change into exactly one navigation patch.
//! - [`StagedFilters`]: instant or staged-edit/apply interaction per
//!   toolbar surface.
//! - [`DataQuery`] / [`Paged`]: the data-source contract, whose
//!   `total_pages` feeds [`UrlStateEngine::ensure_page_in_range`].

pub mod engine;
pub mod navigator;
pub mod query;
pub mod staging;
pub mod state;

pub use engine::{PageReset, UrlStateEngine};
pub use navigator::{MemoryNavigator, NavigateRequest, Navigator, SearchUpdate};
pub use query::{DataQuery, Paged};
pub use staging::{EditMode, StagedFilters};
pub use state::{ColumnFilters, GlobalFilterConfig, TableConfig, TableViewState, Update};
