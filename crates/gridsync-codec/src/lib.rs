#![forbid(unsafe_code)]

//! Codecs between table-view state and URL search parameters.
//!
//! Each slice of table state has a paired encode/decode: sorting
//! ([`sort::SortConfig`]), per-column filters ([`filter::FilterField`]),
//! and pagination ([`page::PaginationConfig`]), all over a typed
//! parameter model ([`params`]) with percent encoding in [`percent`].
//!
//! Two laws hold across the crate:
//!
//! 1. **Round-trip**: decoding an encoded state reproduces the state.
//! 2. **Leniency**: decoding never fails; malformed or missing input
//!    degrades to configured defaults.

pub mod filter;
pub mod page;
pub mod params;
pub mod percent;
pub mod sort;

pub use filter::{DeserializeFn, FilterField, FilterKind, FilterValue, SerializeFn};
pub use page::{PageState, PaginationConfig};
pub use params::{ParamMap, ParamPatch, ParamValue};
pub use sort::{SortConfig, SortMode, SortRule};
