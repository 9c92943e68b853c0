#![forbid(unsafe_code)]

//! Navigation capability.
//!
//! The engine's only write path to the outside world. A host router
//! supplies a [`Navigator`]; the engine issues one [`NavigateRequest`]
//! per logical state change. [`MemoryNavigator`] is a self-contained host
//! for tests, doctests, and non-browser embeddings.

use gridsync_codec::{ParamMap, ParamPatch};

/// How a navigation changes the search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchUpdate {
    /// Keep the current search unchanged (no-op marker).
    Keep,
    /// Merge a partial update into the previous parameter set. Entries of
    /// `None` remove their key from the resulting URL.
    Patch(ParamPatch),
    /// Replace the whole parameter set.
    Replace(ParamMap),
}

/// One navigation issued by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateRequest {
    /// The search-parameter change.
    pub search: SearchUpdate,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateRequest {
    /// Push-style navigation applying a patch.
    #[must_use]
    pub fn patch(patch: ParamPatch) -> Self {
        Self {
            search: SearchUpdate::Patch(patch),
            replace: false,
        }
    }

    /// Replace-style navigation applying a patch (no history growth).
    #[must_use]
    pub fn replace_patch(patch: ParamPatch) -> Self {
        Self {
            search: SearchUpdate::Patch(patch),
            replace: true,
        }
    }

    /// Push-style navigation replacing the whole parameter set.
    #[must_use]
    pub fn replace_all(params: ParamMap) -> Self {
        Self {
            search: SearchUpdate::Replace(params),
            replace: false,
        }
    }

    /// Navigation that keeps the search untouched.
    #[must_use]
    pub fn keep() -> Self {
        Self {
            search: SearchUpdate::Keep,
            replace: false,
        }
    }
}

/// Host-supplied navigation capability.
///
/// Implementations must honor patch semantics: keys patched to `None`
/// disappear from the resulting URL, and unrelated keys are preserved.
pub trait Navigator {
    /// The current full search-parameter set.
    fn params(&self) -> ParamMap;

    /// Apply one navigation.
    fn navigate(&mut self, request: NavigateRequest);
}

/// In-memory navigator backed by a history stack of canonical query
/// strings.
///
/// ```
/// use gridsync_codec::ParamPatch;
/// use gridsync_engine::{MemoryNavigator, NavigateRequest, Navigator};
///
/// let mut nav = MemoryNavigator::from_query("page=2");
/// let mut patch = ParamPatch::new();
/// patch.set("filter", "dune").unset("page");
/// nav.navigate(NavigateRequest::patch(patch));
/// assert_eq!(nav.query(), "filter=dune");
/// assert_eq!(nav.depth(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    history: Vec<String>,
    navigations: usize,
}

impl MemoryNavigator {
    /// Navigator positioned at an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::from_query("")
    }

    /// Navigator positioned at the given initial query string.
    #[must_use]
    pub fn from_query(query: impl Into<String>) -> Self {
        Self {
            history: vec![query.into()],
            navigations: 0,
        }
    }

    /// The current query string.
    #[must_use]
    pub fn query(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or("")
    }

    /// Every query string ever current, oldest first. Replace-style
    /// navigations rewrite the last entry instead of appending.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Number of history entries.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Total navigations applied, counting replacements.
    #[must_use]
    pub fn navigations(&self) -> usize {
        self.navigations
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for MemoryNavigator {
    fn params(&self) -> ParamMap {
        ParamMap::parse(self.query())
    }

    fn navigate(&mut self, request: NavigateRequest) {
        let next = match request.search {
            SearchUpdate::Keep => self.params(),
            SearchUpdate::Patch(patch) => patch.apply_to(&self.params()),
            SearchUpdate::Replace(params) => params,
        };
        let next = next.to_query();
        self.navigations += 1;
        if request.replace {
            match self.history.last_mut() {
                Some(current) => *current = next,
                None => self.history.push(next),
            }
        } else {
            self.history.push(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsync_codec::ParamValue;

    #[test]
    fn patch_pushes_history() {
        let mut nav = MemoryNavigator::from_query("a=1");
        let mut patch = ParamPatch::new();
        patch.set("b", "2");
        nav.navigate(NavigateRequest::patch(patch));
        assert_eq!(nav.query(), "a=1&b=2");
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.history()[0], "a=1");
    }

    #[test]
    fn replace_rewrites_top_entry() {
        let mut nav = MemoryNavigator::from_query("page=9");
        let mut patch = ParamPatch::new();
        patch.unset("page");
        nav.navigate(NavigateRequest::replace_patch(patch));
        assert_eq!(nav.query(), "");
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.navigations(), 1);
    }

    #[test]
    fn none_entries_remove_keys() {
        let mut nav = MemoryNavigator::from_query("sort=-a,b&page=3");
        let mut patch = ParamPatch::new();
        patch.set("sort_by", "a");
        patch.set("sort_order", "desc");
        patch.unset("sort");
        patch.unset("page");
        nav.navigate(NavigateRequest::patch(patch));
        assert_eq!(nav.query(), "sort_by=a&sort_order=desc");
    }

    #[test]
    fn keep_preserves_search() {
        let mut nav = MemoryNavigator::from_query("a=1");
        nav.navigate(NavigateRequest::keep());
        assert_eq!(nav.query(), "a=1");
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    fn replace_all_swaps_params() {
        let mut nav = MemoryNavigator::from_query("a=1&b=2");
        let mut params = ParamMap::new();
        params.insert("c", ParamValue::text("3"));
        nav.navigate(NavigateRequest::replace_all(params));
        assert_eq!(nav.query(), "c=3");
    }
}
