#![forbid(unsafe_code)]

//! Pagination codec.
//!
//! The in-memory page index is 0-based; the URL page is 1-based. Values
//! equal to the configured defaults are omitted so shareable URLs stay
//! minimal. Missing or non-numeric parameters fall back to the defaults,
//! and a URL claiming page 0 clamps to the first page rather than
//! producing a negative index.

use crate::params::{ParamMap, ParamPatch, ParamValue};

/// Pagination state of one table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageState {
    /// 0-based page index.
    pub page_index: u64,
    /// Rows per page.
    pub page_size: u64,
}

impl PageState {
    /// Build from a 0-based index and page size.
    #[must_use]
    pub fn new(page_index: u64, page_size: u64) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// The 1-based page number shown in the URL.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page_index + 1
    }
}

/// Pagination codec configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    page_key: String,
    page_size_key: String,
    default_page: u64,
    default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_key: "page".to_owned(),
            page_size_key: "pageSize".to_owned(),
            default_page: 1,
            default_page_size: 10,
        }
    }
}

impl PaginationConfig {
    /// Codec with the default keys (`page`, `pageSize`) and defaults
    /// (page 1, 10 rows).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the parameter keys (builder).
    #[must_use]
    pub fn with_keys(
        mut self,
        page_key: impl Into<String>,
        page_size_key: impl Into<String>,
    ) -> Self {
        self.page_key = page_key.into();
        self.page_size_key = page_size_key.into();
        self
    }

    /// Override the default 1-based page (builder).
    #[must_use]
    pub fn with_default_page(mut self, default_page: u64) -> Self {
        self.default_page = default_page.max(1);
        self
    }

    /// Override the default page size (builder).
    #[must_use]
    pub fn with_default_page_size(mut self, default_page_size: u64) -> Self {
        self.default_page_size = default_page_size.max(1);
        self
    }

    /// The page parameter key.
    #[must_use]
    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    /// The page-size parameter key.
    #[must_use]
    pub fn page_size_key(&self) -> &str {
        &self.page_size_key
    }

    /// The default 1-based page.
    #[must_use]
    pub fn default_page(&self) -> u64 {
        self.default_page
    }

    /// The default page size.
    #[must_use]
    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// The state a URL with no pagination parameters decodes to.
    #[must_use]
    pub fn default_state(&self) -> PageState {
        PageState::new(self.default_page - 1, self.default_page_size)
    }

    /// Encode pagination into a patch, omitting values equal to the
    /// defaults.
    #[must_use]
    pub fn to_patch(&self, state: &PageState) -> ParamPatch {
        let mut patch = ParamPatch::new();
        let page = state.page();
        if page == self.default_page {
            patch.unset(self.page_key.clone());
        } else {
            patch.set(self.page_key.clone(), page);
        }
        if state.page_size == self.default_page_size {
            patch.unset(self.page_size_key.clone());
        } else {
            patch.set(self.page_size_key.clone(), state.page_size);
        }
        patch
    }

    /// A patch entry resetting the page to its default (omitted).
    #[must_use]
    pub fn reset_page_patch(&self) -> ParamPatch {
        let mut patch = ParamPatch::new();
        patch.unset(self.page_key.clone());
        patch
    }

    /// Decode pagination from the current parameters.
    #[must_use]
    pub fn from_params(&self, params: &ParamMap) -> PageState {
        let page = params
            .get(&self.page_key)
            .and_then(ParamValue::as_number)
            .unwrap_or(self.default_page);
        let page_size = params
            .get(&self.page_size_key)
            .and_then(ParamValue::as_number)
            .filter(|size| *size > 0)
            .unwrap_or(self.default_page_size);
        PageState::new(page.saturating_sub(1), page_size)
    }
}
