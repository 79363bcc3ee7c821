//! Ordered, append-only list of searched city names, carried by the client.
//!
//! The canonical token is a compact JSON array of strings. Cookie transport
//! may percent-encode it, and older clients hold a JSON string that itself
//! contains the array; both forms are accepted when decoding.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::error::HistoryDecodeError;

/// Occurrence count per exact city name.
pub type FrequencyMap = HashMap<String, u64>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum Token {
    List(Vec<String>),
    Nested(String),
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a token, reporting why it could not be read.
    ///
    /// An empty token is an empty history, not an error.
    pub fn try_decode(raw: &str) -> Result<Self, HistoryDecodeError> {
        if raw.is_empty() {
            return Ok(Self::default());
        }

        match parse(raw) {
            Ok(entries) => Ok(Self(entries)),
            Err(err) if raw.contains('%') => {
                let decoded = percent_decode_str(raw).decode_utf8()?;
                parse(&decoded).map(Self).map_err(|_| err)
            }
            Err(err) => Err(err),
        }
    }

    /// Decode a token, falling back to an empty history on any failure.
    pub fn decode(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::try_decode(raw).ok())
            .unwrap_or_default()
    }

    pub fn encode(&self) -> String {
        // Serializing a list of strings cannot fail.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// New history with `city` at the end; `self` is left untouched.
    #[must_use]
    pub fn append(&self, city: impl Into<String>) -> Self {
        let mut entries = Vec::with_capacity(self.0.len() + 1);
        entries.extend(self.0.iter().cloned());
        entries.push(city.into());
        Self(entries)
    }

    /// Count occurrences of each name. Case-sensitive, no trimming.
    pub fn to_frequency_map(&self) -> FrequencyMap {
        let mut counts = FrequencyMap::with_capacity(self.0.len());
        for city in &self.0 {
            *counts.entry(city.clone()).or_default() += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for History {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

fn parse(raw: &str) -> Result<Vec<String>, HistoryDecodeError> {
    match serde_json::from_str::<Token>(raw)? {
        Token::List(entries) => Ok(entries),
        Token::Nested(inner) => Ok(serde_json::from_str(&inner)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_encode_is_identity() {
        let cases = [
            History::new(),
            History::from_iter(["Москва"]),
            History::from_iter(["Москва", "Париж", "Москва"]),
            History::from_iter(["", " padded ", "quote\"d", "semi;colon, comma"]),
        ];

        for history in cases {
            let token = history.encode();
            assert_eq!(History::decode(Some(&token)), history);
        }
    }

    #[test]
    fn test_encode_is_compact_json() {
        let history = History::from_iter(["Москва", "Париж"]);
        assert_eq!(history.encode(), r#"["Москва","Париж"]"#);
        assert_eq!(History::new().encode(), "[]");
    }

    #[test]
    fn test_decode_missing_empty_or_invalid_is_empty() {
        assert!(History::decode(None).is_empty());
        assert!(History::decode(Some("")).is_empty());
        assert!(History::decode(Some("[]")).is_empty());
        assert!(History::decode(Some("invalid")).is_empty());
        assert!(History::decode(Some("[1, 2]")).is_empty());
        assert!(History::decode(Some("{\"a\": 1}")).is_empty());
        assert!(History::decode(Some("%FF%FE")).is_empty());
    }

    #[test]
    fn test_try_decode_reports_failures() {
        assert!(History::try_decode("invalid").is_err());
        assert!(History::try_decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_accepts_legacy_double_encoding() {
        let legacy = serde_json::to_string(r#"["Москва","Париж"]"#).unwrap();
        assert_eq!(
            History::decode(Some(&legacy)),
            History::from_iter(["Москва", "Париж"])
        );
    }

    #[test]
    fn test_decode_accepts_percent_encoded_token() {
        let encoded = "%5B%22%D0%9C%D0%BE%D1%81%D0%BA%D0%B2%D0%B0%22%5D";
        assert_eq!(
            History::decode(Some(encoded)),
            History::from_iter(["Москва"])
        );
    }

    #[test]
    fn test_append_is_non_destructive() {
        let before = History::from_iter(["Москва"]);
        let after = before.append("Москва");

        assert_eq!(before.len(), 1);
        assert_eq!(after, History::from_iter(["Москва", "Москва"]));
        assert_eq!(after.last(), Some("Москва"));
    }

    #[test]
    fn test_frequency_map_counts_exact_names() {
        let history = History::from_iter(["Москва", "Париж", "Москва"]);
        let expected = FrequencyMap::from([
            ("Москва".to_string(), 2),
            ("Париж".to_string(), 1),
        ]);
        assert_eq!(history.to_frequency_map(), expected);

        let history = History::from_iter(["Paris", "paris", "Paris "]);
        assert_eq!(history.to_frequency_map().len(), 3);

        assert!(History::new().to_frequency_map().is_empty());
    }
}
