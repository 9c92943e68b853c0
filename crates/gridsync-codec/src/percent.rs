#![forbid(unsafe_code)]

//! Percent codec for URL search-parameter components.
//!
//! Encoding mirrors the component encoding browsers apply to query values:
//! everything except unreserved characters and `- _ . ! ~ * ' ( )` is
//! percent-encoded, so reserved characters (space, `&`, `=`, `#`) and
//! non-ASCII scripts survive a round trip through the address bar.
//!
//! Decoding never fails. A value with malformed percent sequences or
//! invalid UTF-8 comes back unchanged; a shared deep link with a mangled
//! query must degrade to defaults downstream, not break the page.
//!
//! ```
//! use gridsync_codec::percent::{decode_component, encode_component};
//!
//! let encoded = encode_component("name=Dune & Dune II");
//! assert_eq!(encoded, "name%3DDune%20%26%20Dune%20II");
//! assert_eq!(decode_component(&encoded), "name=Dune & Dune II");
//!
//! // Malformed input is returned as-is, never an error.
//! assert_eq!(decode_component("100%C3"), "100%C3");
//! ```

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::params::{ParamMap, ParamValue};

/// Characters left verbatim by [`encode_component`]: alphanumerics plus
/// `- _ . ! ~ * ' ( )`.
pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single component value.
#[must_use]
pub fn encode_component(raw: &str) -> Cow<'_, str> {
    utf8_percent_encode(raw, COMPONENT).into()
}

/// Percent-decode a single component value.
///
/// Invalid percent sequences pass through literally; sequences that decode
/// to invalid UTF-8 leave the whole input unchanged.
#[must_use]
pub fn decode_component(raw: &str) -> Cow<'_, str> {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Encode a parameter value element-wise.
///
/// `Text` is encoded directly, `List` element by element, `Number` is
/// already URL-safe and passes through.
#[must_use]
pub fn encode_value(value: &ParamValue) -> ParamValue {
    match value {
        ParamValue::Text(text) => ParamValue::Text(encode_component(text).into_owned()),
        ParamValue::List(items) => ParamValue::List(
            items
                .iter()
                .map(|item| encode_component(item).into_owned())
                .collect(),
        ),
        ParamValue::Number(n) => ParamValue::Number(*n),
    }
}

/// Decode a parameter value element-wise. Never fails; malformed elements
/// come back unchanged.
#[must_use]
pub fn decode_value(value: &ParamValue) -> ParamValue {
    match value {
        ParamValue::Text(text) => ParamValue::Text(decode_component(text).into_owned()),
        ParamValue::List(items) => ParamValue::List(
            items
                .iter()
                .map(|item| decode_component(item).into_owned())
                .collect(),
        ),
        ParamValue::Number(n) => ParamValue::Number(*n),
    }
}

/// Encode every key and value of a parameter mapping.
#[must_use]
pub fn encode_map(map: &ParamMap) -> ParamMap {
    map.iter()
        .map(|(key, value)| (encode_component(key).into_owned(), encode_value(value)))
        .collect()
}

/// Decode every key and value of a parameter mapping.
#[must_use]
pub fn decode_map(map: &ParamMap) -> ParamMap {
    map.iter()
        .map(|(key, value)| (decode_component(key).into_owned(), decode_value(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode_component("a&b=c#d"), "a%26b%3Dc%23d");
        assert_eq!(encode_component("hello world"), "hello%20world");
    }

    #[test]
    fn keeps_unreserved_characters() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
    }

    #[test]
    fn encodes_non_ascii_scripts() {
        assert_eq!(encode_component("café"), "caf%C3%A9");
        assert_eq!(decode_component("caf%C3%A9"), "café");
        assert_eq!(decode_component(&encode_component("検索")), "検索");
    }

    #[test]
    fn malformed_percent_passes_through() {
        assert_eq!(decode_component("%"), "%");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component("50%"), "50%");
    }

    #[test]
    fn invalid_utf8_returns_input_unchanged() {
        // %C3 alone is a truncated UTF-8 sequence.
        assert_eq!(decode_component("%C3"), "%C3");
        assert_eq!(decode_component("a%FFb"), "a%FFb");
    }

    #[test]
    fn map_forms_round_trip() {
        let map: ParamMap = [
            ("q".to_owned(), ParamValue::text("a&b c")),
            ("tags".to_owned(), ParamValue::list(["x y", "z"])),
        ]
        .into_iter()
        .collect();
        assert_eq!(decode_map(&encode_map(&map)), map);
    }

    #[test]
    fn value_forms_are_element_wise() {
        let list = ParamValue::List(vec!["a b".into(), "c&d".into()]);
        let encoded = encode_value(&list);
        assert_eq!(
            encoded,
            ParamValue::List(vec!["a%20b".into(), "c%26d".into()])
        );
        assert_eq!(decode_value(&encoded), list);
        assert_eq!(encode_value(&ParamValue::Number(7)), ParamValue::Number(7));
    }

    proptest! {
        #[test]
        fn component_round_trips(s in "\\PC*") {
            let encoded = encode_component(&s);
            let decoded = decode_component(&encoded);
            prop_assert_eq!(decoded.as_ref(), s.as_str());
        }

        #[test]
        fn decode_never_panics(s in "\\PC*") {
            let _ = decode_component(&s);
        }
    }
}
