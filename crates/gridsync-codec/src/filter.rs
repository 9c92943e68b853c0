#![forbid(unsafe_code)]

//! Per-field column filter codec.
//!
//! Each filterable column declares one URL parameter, a value kind, and
//! optional custom serialize/deserialize hooks. A filter is present in the
//! URL iff it holds a value: a text filter with only whitespace, or an
//! empty option set, is absence, not an empty parameter.
//!
//! Decoding is lenient. A value whose shape does not match the declared
//! kind decodes as "no filter"; a table with one misconfigured column must
//! keep rendering.

use std::collections::BTreeSet;

use crate::params::ParamValue;

/// A column filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FilterValue {
    /// Free-text filter.
    Text(String),
    /// Discrete option set (faceted filter). Ordered so the encoded URL is
    /// canonical; a new set is constructed on every toggle.
    Set(BTreeSet<String>),
}

impl FilterValue {
    /// Build a text filter.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build an option-set filter.
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// Whether the filter holds no value. Empty filters are never
    /// materialized in state or URL.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Set(values) => values.is_empty(),
        }
    }

    /// The text value, if this is a text filter.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Set(_) => None,
        }
    }

    /// The option set, if this is a set filter.
    #[must_use]
    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Set(values) => Some(values),
            Self::Text(_) => None,
        }
    }
}

/// Declared value kind of a filter field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// Free-text; one scalar parameter.
    #[default]
    Text,
    /// Option set; repeated-key parameter.
    Set,
}

/// Custom encode hook: receives the (trimmed) filter value, returns the
/// parameter value, or `None` for "omit from the URL".
pub type SerializeFn = fn(&FilterValue) -> Option<ParamValue>;

/// Custom decode hook: receives the raw parameter value, returns the
/// filter value, or `None` for "no filter".
pub type DeserializeFn = fn(&ParamValue) -> Option<FilterValue>;

/// One filterable column's codec configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    column: String,
    param_key: String,
    kind: FilterKind,
    serialize: Option<SerializeFn>,
    deserialize: Option<DeserializeFn>,
}

impl FilterField {
    /// Text-kind field; the parameter key defaults to the column id.
    pub fn text(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            param_key: column.clone(),
            column,
            kind: FilterKind::Text,
            serialize: None,
            deserialize: None,
        }
    }

    /// Set-kind field; the parameter key defaults to the column id.
    pub fn set(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            param_key: column.clone(),
            column,
            kind: FilterKind::Set,
            serialize: None,
            deserialize: None,
        }
    }

    /// Override the URL parameter key (builder).
    #[must_use]
    pub fn with_param_key(mut self, param_key: impl Into<String>) -> Self {
        self.param_key = param_key.into();
        self
    }

    /// Custom serialize hook (builder).
    #[must_use]
    pub fn with_serialize(mut self, serialize: SerializeFn) -> Self {
        self.serialize = Some(serialize);
        self
    }

    /// Custom deserialize hook (builder).
    #[must_use]
    pub fn with_deserialize(mut self, deserialize: DeserializeFn) -> Self {
        self.deserialize = Some(deserialize);
        self
    }

    /// Column identifier.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// URL parameter key.
    #[must_use]
    pub fn param_key(&self) -> &str {
        &self.param_key
    }

    /// Declared value kind.
    #[must_use]
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Encode a filter value for the URL. `None` means the parameter is
    /// omitted/removed.
    ///
    /// A value whose shape does not match the declared kind encodes as
    /// absent rather than an error.
    #[must_use]
    pub fn to_param(&self, value: &FilterValue) -> Option<ParamValue> {
        let normalized = match (self.kind, value) {
            (FilterKind::Text, FilterValue::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                FilterValue::Text(trimmed.to_owned())
            }
            (FilterKind::Set, FilterValue::Set(values)) => {
                if values.is_empty() {
                    return None;
                }
                FilterValue::Set(values.clone())
            }
            (kind, mismatched) => {
                self.warn_kind_mismatch(kind, mismatched);
                return None;
            }
        };
        match self.serialize {
            Some(serialize) => serialize(&normalized),
            None => Some(match normalized {
                FilterValue::Text(text) => ParamValue::Text(text),
                FilterValue::Set(values) => ParamValue::List(values.into_iter().collect()),
            }),
        }
    }

    /// Decode a filter value from the URL. `None` means no filter.
    ///
    /// For set kind, a lone scalar decodes as a one-element set (a key
    /// that appears once in the query string is still a facet selection).
    #[must_use]
    pub fn from_param(&self, value: Option<&ParamValue>) -> Option<FilterValue> {
        let value = value?;
        let decoded = match self.deserialize {
            Some(deserialize) => deserialize(value)?,
            None => match self.kind {
                FilterKind::Text => FilterValue::Text(value.as_text()?.into_owned()),
                FilterKind::Set => FilterValue::set(value.as_list()),
            },
        };
        if decoded.is_empty() {
            return None;
        }
        match (self.kind, &decoded) {
            (FilterKind::Text, FilterValue::Text(_)) | (FilterKind::Set, FilterValue::Set(_)) => {
                Some(decoded)
            }
            (kind, mismatched) => {
                self.warn_kind_mismatch(kind, mismatched);
                None
            }
        }
    }

    #[cfg(feature = "tracing")]
    fn warn_kind_mismatch(&self, kind: FilterKind, value: &FilterValue) {
        tracing::warn!(
            column = %self.column,
            declared = ?kind,
            got = ?value,
            "filter value shape does not match declared kind; treating as empty"
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn warn_kind_mismatch(&self, _kind: FilterKind, _value: &FilterValue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_trims_and_omits_empty() {
        let field = FilterField::text("title");
        assert_eq!(
            field.to_param(&FilterValue::text("  dune ")),
            Some(ParamValue::text("dune"))
        );
        assert_eq!(field.to_param(&FilterValue::text("   ")), None);
        assert_eq!(field.to_param(&FilterValue::text("")), None);
    }

    #[test]
    fn text_field_decodes_scalars_only() {
        let field = FilterField::text("title");
        assert_eq!(
            field.from_param(Some(&ParamValue::text("dune"))),
            Some(FilterValue::text("dune"))
        );
        assert_eq!(field.from_param(Some(&ParamValue::text(""))), None);
        assert_eq!(field.from_param(None), None);
        // A repeated key is not a valid text filter.
        assert_eq!(field.from_param(Some(&ParamValue::list(["a", "b"]))), None);
    }

    #[test]
    fn set_field_round_trips_repeated_keys() {
        let field = FilterField::set("status");
        let value = FilterValue::set(["active", "invited"]);
        let param = field.to_param(&value).expect("non-empty set encodes");
        assert_eq!(param, ParamValue::list(["active", "invited"]));
        assert_eq!(field.from_param(Some(&param)), Some(value));
    }

    #[test]
    fn set_field_accepts_lone_scalar() {
        let field = FilterField::set("status");
        assert_eq!(
            field.from_param(Some(&ParamValue::text("active"))),
            Some(FilterValue::set(["active"]))
        );
    }

    #[test]
    fn empty_set_is_absent() {
        let field = FilterField::set("status");
        assert_eq!(field.to_param(&FilterValue::set(Vec::<String>::new())), None);
        assert_eq!(field.from_param(Some(&ParamValue::List(Vec::new()))), None);
    }

    #[test]
    fn kind_mismatch_degrades_to_empty() {
        let text = FilterField::text("title");
        assert_eq!(text.to_param(&FilterValue::set(["x"])), None);
        let set = FilterField::set("status");
        assert_eq!(set.to_param(&FilterValue::text("x")), None);
    }

    #[test]
    fn custom_param_key() {
        let field = FilterField::text("fullName").with_param_key("name");
        assert_eq!(field.param_key(), "name");
        assert_eq!(field.column(), "fullName");
    }

    #[test]
    fn custom_hooks_run_on_whole_value() {
        fn join(value: &FilterValue) -> Option<ParamValue> {
            let set = value.as_set()?;
            Some(ParamValue::text(
                set.iter().cloned().collect::<Vec<_>>().join("."),
            ))
        }
        fn split(value: &ParamValue) -> Option<FilterValue> {
            let text = value.as_text()?;
            Some(FilterValue::set(
                text.split('.').filter(|part| !part.is_empty()),
            ))
        }
        let field = FilterField::set("roles")
            .with_serialize(join)
            .with_deserialize(split);
        let value = FilterValue::set(["admin", "editor"]);
        let param = field.to_param(&value).expect("encodes");
        assert_eq!(param, ParamValue::text("admin.editor"));
        assert_eq!(field.from_param(Some(&param)), Some(value));
    }

    #[test]
    fn deserialize_hook_kind_mismatch_is_absent() {
        fn wrong_shape(value: &ParamValue) -> Option<FilterValue> {
            value.as_text().map(|text| FilterValue::text(text))
        }
        let field = FilterField::set("status").with_deserialize(wrong_shape);
        assert_eq!(field.from_param(Some(&ParamValue::text("active"))), None);
    }
}
