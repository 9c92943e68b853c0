#![forbid(unsafe_code)]

//! Sort codec.
//!
//! Two mutually exclusive wire encodings over the same in-memory shape
//! (an ordered list of [`SortRule`]s, primary sort first):
//!
//! - **Single mode**: a pair of scalar parameters, `sort_by=title` and
//!   `sort_order=desc`. At most one rule.
//! - **Multi mode**: one delimited parameter, `sort=-createdAt,title`,
//!   where a leading `-` marks a descending column.
//!
//! Every patch produced by one mode explicitly removes the other mode's
//! keys, so stale parameters cannot resurrect on the next reload.
//! Decoding is lenient: unknown directions mean ascending, malformed
//! multi-sort tokens are dropped silently, and an absent parameter falls
//! back to the configured default rules.

use crate::params::{ParamMap, ParamPatch, ParamValue};

/// One column ordering, primary sort first in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortRule {
    /// Column identifier.
    pub column: String,
    /// Descending when true, ascending otherwise.
    pub descending: bool,
}

impl SortRule {
    /// Ascending rule for a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    /// Descending rule for a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Multi-mode token form: `name` or `-name`.
    #[must_use]
    pub fn to_token(&self) -> String {
        if self.descending {
            format!("-{}", self.column)
        } else {
            self.column.clone()
        }
    }

    /// Parse a multi-mode token. A leading `-` marks descending. A token
    /// is malformed, and yields `None`, unless its column part is a
    /// non-empty run of ASCII alphanumerics, `_`, `.`, or `-` that does
    /// not itself start with `-`.
    #[must_use]
    pub fn parse_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let (descending, column) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let well_formed = !column.is_empty()
            && !column.starts_with('-')
            && column
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if !well_formed {
            return None;
        }
        Some(Self {
            column: column.to_owned(),
            descending,
        })
    }
}

/// Which wire encoding is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// `sort_by` + `sort_order` scalar pair, at most one rule.
    #[default]
    Single,
    /// One delimited `sort` parameter, any number of rules.
    Multi,
}

/// Sort codec configuration.
///
/// All parameter keys are carried regardless of the active mode; switching
/// modes must be able to clean the other mode's keys out of the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    mode: SortMode,
    sort_by_key: String,
    sort_order_key: String,
    multi_key: String,
    delimiter: char,
    default: Vec<SortRule>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            mode: SortMode::Single,
            sort_by_key: "sort_by".to_owned(),
            sort_order_key: "sort_order".to_owned(),
            multi_key: "sort".to_owned(),
            delimiter: ',',
            default: Vec::new(),
        }
    }
}

impl SortConfig {
    /// Single-mode codec with the default keys.
    #[must_use]
    pub fn single() -> Self {
        Self::default()
    }

    /// Multi-mode codec with the default key and `,` delimiter.
    #[must_use]
    pub fn multi() -> Self {
        Self {
            mode: SortMode::Multi,
            ..Self::default()
        }
    }

    /// Override the single-mode parameter keys (builder).
    #[must_use]
    pub fn with_single_keys(
        mut self,
        sort_by_key: impl Into<String>,
        sort_order_key: impl Into<String>,
    ) -> Self {
        self.sort_by_key = sort_by_key.into();
        self.sort_order_key = sort_order_key.into();
        self
    }

    /// Override the multi-mode parameter key (builder).
    #[must_use]
    pub fn with_multi_key(mut self, multi_key: impl Into<String>) -> Self {
        self.multi_key = multi_key.into();
        self
    }

    /// Override the multi-mode delimiter (builder).
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Default rules used when the URL carries no sort parameters
    /// (builder). Single mode uses at most the first rule.
    #[must_use]
    pub fn with_default(mut self, default: impl IntoIterator<Item = SortRule>) -> Self {
        self.default = default.into_iter().collect();
        self
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Encode a sorting into a patch.
    ///
    /// The inactive mode's keys are always removed in the same patch.
    #[must_use]
    pub fn to_patch(&self, sorting: &[SortRule]) -> ParamPatch {
        let mut patch = ParamPatch::new();
        match self.mode {
            SortMode::Single => {
                match sorting.first() {
                    Some(rule) => {
                        patch.set(self.sort_by_key.clone(), rule.column.as_str());
                        patch.set(
                            self.sort_order_key.clone(),
                            if rule.descending { "desc" } else { "asc" },
                        );
                    }
                    None => {
                        patch.unset(self.sort_by_key.clone());
                        patch.unset(self.sort_order_key.clone());
                    }
                }
                patch.unset(self.multi_key.clone());
            }
            SortMode::Multi => {
                if sorting.is_empty() {
                    patch.unset(self.multi_key.clone());
                } else {
                    let joined = sorting
                        .iter()
                        .map(SortRule::to_token)
                        .collect::<Vec<_>>()
                        .join(&self.delimiter.to_string());
                    patch.set(self.multi_key.clone(), joined);
                }
                patch.unset(self.sort_by_key.clone());
                patch.unset(self.sort_order_key.clone());
            }
        }
        patch
    }

    /// Decode the sorting from the current parameters.
    #[must_use]
    pub fn from_params(&self, params: &ParamMap) -> Vec<SortRule> {
        match self.mode {
            SortMode::Single => {
                let column = params
                    .get(&self.sort_by_key)
                    .and_then(ParamValue::as_text)
                    .map(|text| text.trim().to_owned())
                    .filter(|text| !text.is_empty());
                match column {
                    Some(column) => {
                        let descending = params
                            .get(&self.sort_order_key)
                            .and_then(ParamValue::as_text)
                            .is_some_and(|order| order.trim().eq_ignore_ascii_case("desc"));
                        vec![SortRule { column, descending }]
                    }
                    None => self.default.iter().take(1).cloned().collect(),
                }
            }
            SortMode::Multi => match params.get(&self.multi_key).and_then(ParamValue::as_text) {
                Some(raw) => raw
                    .split(self.delimiter)
                    .filter_map(|token| {
                        let rule = SortRule::parse_token(token);
                        #[cfg(feature = "tracing")]
                        if rule.is_none() && !token.trim().is_empty() {
                            tracing::debug!(token, "dropping malformed sort token");
                        }
                        rule
                    })
                    .collect(),
                None => self.default.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mode_round_trip() {
        let config = SortConfig::single();
        let sorting = vec![SortRule::desc("createdAt")];
        let patch = config.to_patch(&sorting);
        let params = patch.apply_to(&ParamMap::new());
        assert_eq!(params.to_query(), "sort_by=createdAt&sort_order=desc");
        assert_eq!(config.from_params(&params), sorting);
    }

    #[test]
    fn single_mode_empty_removes_both_keys() {
        let config = SortConfig::single();
        let params = ParamMap::parse("sort_by=a&sort_order=asc&page=2");
        let next = config.to_patch(&[]).apply_to(&params);
        assert_eq!(next.to_query(), "page=2");
    }

    #[test]
    fn single_mode_falls_back_to_default() {
        let config = SortConfig::single().with_default([SortRule::desc("createdAt")]);
        assert_eq!(
            config.from_params(&ParamMap::new()),
            vec![SortRule::desc("createdAt")]
        );
        // Default only applies when the parameter is absent.
        let explicit = ParamMap::parse("sort_by=title");
        assert_eq!(
            config.from_params(&explicit),
            vec![SortRule::asc("title")]
        );
    }

    #[test]
    fn single_mode_direction_is_case_insensitive_and_lenient() {
        let config = SortConfig::single();
        let desc = ParamMap::parse("sort_by=a&sort_order=DESC");
        assert!(config.from_params(&desc)[0].descending);
        let junk = ParamMap::parse("sort_by=a&sort_order=sideways");
        assert!(!config.from_params(&junk)[0].descending);
        let missing = ParamMap::parse("sort_by=a");
        assert!(!config.from_params(&missing)[0].descending);
    }

    #[test]
    fn multi_mode_round_trip() {
        let config = SortConfig::multi();
        let sorting = vec![SortRule::desc("createdAt"), SortRule::asc("title")];
        let patch = config.to_patch(&sorting);
        let params = patch.apply_to(&ParamMap::new());
        assert_eq!(params.to_query(), "sort=-createdAt%2Ctitle");
        assert_eq!(config.from_params(&params), sorting);
    }

    #[test]
    fn multi_mode_decodes_mixed_directions() {
        let config = SortConfig::multi();
        let params = ParamMap::parse("sort=-createdAt,title");
        assert_eq!(
            config.from_params(&params),
            vec![SortRule::desc("createdAt"), SortRule::asc("title")]
        );
    }

    #[test]
    fn multi_mode_drops_malformed_tokens_silently() {
        let config = SortConfig::multi();
        let params = ParamMap::parse("sort=-a,,-,--b,c");
        assert_eq!(
            config.from_params(&params),
            vec![SortRule::desc("a"), SortRule::asc("c")]
        );
        // A fully malformed value decodes to no sorting, not the default.
        let garbage = ParamMap::parse("sort=%");
        assert_eq!(config.from_params(&garbage), Vec::<SortRule>::new());
    }

    #[test]
    fn modes_clean_each_other() {
        // Stale multi key, single-mode engine.
        let single = SortConfig::single();
        let stale = ParamMap::parse("sort=-a,b");
        let next = single.to_patch(&[SortRule::desc("a")]).apply_to(&stale);
        assert!(!next.contains_key("sort"));
        assert_eq!(next.to_query(), "sort_by=a&sort_order=desc");

        // Stale single keys, multi-mode engine.
        let multi = SortConfig::multi();
        let stale = ParamMap::parse("sort_by=a&sort_order=desc");
        let next = multi.to_patch(&[SortRule::asc("b")]).apply_to(&stale);
        assert!(!next.contains_key("sort_by"));
        assert!(!next.contains_key("sort_order"));
        assert_eq!(next.to_query(), "sort=b");
    }

    #[test]
    fn custom_keys_and_delimiter() {
        let config = SortConfig::multi()
            .with_multi_key("order")
            .with_delimiter('|');
        let sorting = vec![SortRule::asc("a"), SortRule::desc("b")];
        let params = config.to_patch(&sorting).apply_to(&ParamMap::new());
        assert_eq!(params.get("order"), Some(&ParamValue::text("a|-b")));
        assert_eq!(config.from_params(&params), sorting);
    }
}
