#![forbid(unsafe_code)]

//! Typed URL search-parameter model.
//!
//! A query string is modeled as an ordered mapping from key to a tagged
//! value rather than an untyped bag of strings, so invalid shapes are
//! caught at the codec boundary instead of propagating:
//!
//! - [`ParamValue`]: `Text`, `List` (repeated keys), or `Number`.
//! - [`ParamMap`]: the full parameter set of one URL, with a canonical,
//!   deterministic serialization.
//! - [`ParamPatch`]: a partial update; an entry of `None` removes the key
//!   when the patch is merged. Removal is how default values stay out of
//!   shareable URLs.
//!
//! Parsing is lenient and never fails. `Number` only appears on the encode
//! side; decoding always yields `Text`/`List`, and numeric interpretation
//! happens through [`ParamValue::as_number`].
//!
//! ```
//! use gridsync_codec::params::{ParamMap, ParamPatch, ParamValue};
//!
//! let params = ParamMap::parse("page=2&status=active&status=invited");
//! assert_eq!(params.get("page").and_then(|v| v.as_number()), Some(2));
//! assert_eq!(
//!     params.get("status").map(|v| v.as_list()),
//!     Some(vec!["active".to_string(), "invited".to_string()]),
//! );
//!
//! let mut patch = ParamPatch::new();
//! patch.unset("page");
//! patch.set("filter", ParamValue::Text("dune".into()));
//! assert_eq!(patch.apply_to(&params).to_query(), "filter=dune&status=active&status=invited");
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::percent::encode_component;

/// One URL parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// A single scalar value.
    Text(String),
    /// A multi-valued parameter, serialized as repeated keys.
    List(Vec<String>),
    /// A numeric value. Encode-side only; parsing yields `Text`.
    Number(u64),
}

impl ParamValue {
    /// Build a `Text` value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a `List` value.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// The value as a single text, if it has one. `List` values are not
    /// scalars and return `None`.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::List(_) => None,
        }
    }

    /// The value as a non-negative number, if it parses as one.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::List(_) => None,
        }
    }

    /// The value as a list. A scalar is a one-element list, matching
    /// `URLSearchParams::getAll` semantics for a key that appears once.
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Text(text) => vec![text.clone()],
            Self::Number(n) => vec![n.to_string()],
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// The full search-parameter set of one URL.
///
/// Keys are kept sorted so the serialized query string is canonical: two
/// equal states always produce byte-identical, shareable URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: BTreeMap<String, ParamValue>,
}

impl ParamMap {
    /// An empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. Lenient: a leading `?` is ignored, `+` means
    /// space, repeated keys collect into a `List`, malformed percent
    /// sequences pass through literally. Never fails.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut entries: BTreeMap<String, ParamValue> = BTreeMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let key = key.into_owned();
            let value = value.into_owned();
            match entries.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(ParamValue::Text(value));
                }
                btree_map::Entry::Occupied(mut slot) => {
                    let previous =
                        std::mem::replace(slot.get_mut(), ParamValue::List(Vec::new()));
                    let mut items = match previous {
                        ParamValue::List(items) => items,
                        ParamValue::Text(text) => vec![text],
                        ParamValue::Number(n) => vec![n.to_string()],
                    };
                    items.push(value);
                    *slot.get_mut() = ParamValue::List(items);
                }
            }
        }
        Self { entries }
    }

    /// Serialize to a canonical query string (no leading `?`). `List`
    /// values emit repeated keys; an empty map yields an empty string.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            let pairs: Vec<Cow<'_, str>> = match value {
                ParamValue::Text(text) => vec![encode_component(text)],
                ParamValue::Number(n) => vec![Cow::Owned(n.to_string())],
                ParamValue::List(items) => items.iter().map(|i| encode_component(i)).collect(),
            };
            for encoded in pairs {
                if !out.is_empty() {
                    out.push('&');
                }
                out.push_str(&encode_component(key));
                out.push('=');
                out.push_str(&encoded);
            }
        }
        out
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a parameter.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and values in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, ParamValue)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A partial update to a [`ParamMap`].
///
/// `Some(value)` sets the key, `None` removes it. Merging a patch never
/// drops unrelated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamPatch {
    entries: BTreeMap<String, Option<ParamValue>>,
}

impl ParamPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key to a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.entries.insert(key.into(), Some(value.into()));
        self
    }

    /// Mark a key for removal.
    pub fn unset(&mut self, key: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), None);
        self
    }

    /// Set or remove a key depending on `value`.
    pub fn set_or_unset(&mut self, key: impl Into<String>, value: Option<ParamValue>) -> &mut Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Fold another patch into this one; the other patch wins on conflict.
    pub fn merge(&mut self, other: ParamPatch) -> &mut Self {
        self.entries.extend(other.entries);
        self
    }

    /// The staged change for a key: `None` = untouched,
    /// `Some(None)` = removal, `Some(Some(_))` = new value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&ParamValue>> {
        self.entries.get(key).map(Option::as_ref)
    }

    /// Whether the patch touches no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge into a previous full parameter set, producing the next one.
    #[must_use]
    pub fn apply_to(&self, previous: &ParamMap) -> ParamMap {
        let mut next = previous.clone();
        for (key, change) in &self.entries {
            match change {
                Some(value) => next.insert(key.clone(), value.clone()),
                None => {
                    next.remove(key);
                }
            }
        }
        next
    }
}

impl FromIterator<(String, Option<ParamValue>)> for ParamPatch {
    fn from_iter<I: IntoIterator<Item = (String, Option<ParamValue>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_scalars_and_repeats() {
        let params = ParamMap::parse("?a=1&b=two&a=3");
        assert_eq!(params.get("a"), Some(&ParamValue::list(["1", "3"])));
        assert_eq!(params.get("b"), Some(&ParamValue::text("two")));
    }

    #[test]
    fn parses_plus_and_percent() {
        let params = ParamMap::parse("q=hello+world&r=caf%C3%A9");
        assert_eq!(params.get("q"), Some(&ParamValue::text("hello world")));
        assert_eq!(params.get("r"), Some(&ParamValue::text("café")));
    }

    #[test]
    fn malformed_percent_never_fails() {
        let params = ParamMap::parse("sort=%&page=abc&status=");
        assert_eq!(params.get("sort"), Some(&ParamValue::text("%")));
        assert_eq!(params.get("page").and_then(|v| v.as_number()), None);
        assert_eq!(params.get("status"), Some(&ParamValue::text("")));
    }

    #[test]
    fn query_is_canonical() {
        let mut params = ParamMap::new();
        params.insert("b", "2");
        params.insert("a", ParamValue::list(["x", "y"]));
        assert_eq!(params.to_query(), "a=x&a=y&b=2");
    }

    #[test]
    fn query_encodes_reserved_characters() {
        let mut params = ParamMap::new();
        params.insert("q", "a&b=c");
        assert_eq!(params.to_query(), "q=a%26b%3Dc");
        assert_eq!(ParamMap::parse(&params.to_query()), params);
    }

    #[test]
    fn patch_sets_and_removes() {
        let params = ParamMap::parse("page=3&filter=x");
        let mut patch = ParamPatch::new();
        patch.unset("page");
        patch.set("sort", "-name");
        let next = patch.apply_to(&params);
        assert!(!next.contains_key("page"));
        assert_eq!(next.get("filter"), Some(&ParamValue::text("x")));
        assert_eq!(next.get("sort"), Some(&ParamValue::text("-name")));
    }

    #[test]
    fn patch_merge_last_writer_wins() {
        let mut first = ParamPatch::new();
        first.set("page", 2u64);
        let mut second = ParamPatch::new();
        second.unset("page");
        first.merge(second);
        assert_eq!(first.get("page"), Some(None));
    }

    #[test]
    fn number_coercion_is_lenient() {
        assert_eq!(ParamValue::text("5").as_number(), Some(5));
        assert_eq!(ParamValue::text(" 5 ").as_number(), Some(5));
        assert_eq!(ParamValue::text("abc").as_number(), None);
        assert_eq!(ParamValue::text("-1").as_number(), None);
        assert_eq!(ParamValue::Number(9).as_text().as_deref(), Some("9"));
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        "\\PC{0,20}"
    }

    proptest! {
        #[test]
        fn map_round_trips(
            entries in proptest::collection::btree_map(
                "[a-z][a-z0-9_]{0,8}",
                prop_oneof![
                    text_strategy().prop_map(ParamValue::Text),
                    proptest::collection::vec(text_strategy(), 1..4).prop_map(ParamValue::List),
                ],
                0..6,
            )
        ) {
            let params: ParamMap = entries.into_iter().collect();
            let reparsed = ParamMap::parse(&params.to_query());
            // A one-element list reparses as a scalar; compare through the
            // list view, which is what array consumers read.
            prop_assert_eq!(params.len(), reparsed.len());
            for (key, value) in params.iter() {
                let got = reparsed.get(key).expect("key survives round trip");
                prop_assert_eq!(value.as_list(), got.as_list());
            }
        }

        #[test]
        fn parse_never_panics(query in "\\PC*") {
            let _ = ParamMap::parse(&query);
        }
    }
}
