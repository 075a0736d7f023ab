//! Caller-supplied field exclusions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Field names excluded unconditionally from comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoredFields(BTreeSet<String>);

impl IgnoredFields {
    /// No ignored fields.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn insert(&mut self, field: impl Into<String>) -> bool {
        self.0.insert(field.into())
    }

    /// Add every field of `other`.
    pub fn merge(&mut self, other: &IgnoredFields) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoredFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for IgnoredFields {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_and_merges() {
        let mut ignored: IgnoredFields = ["updatedAt", "version"].into_iter().collect();
        assert!(ignored.contains("version"));
        assert!(!ignored.contains("name"));

        let extra: IgnoredFields = ["etag".to_string()].into_iter().collect();
        ignored.merge(&extra);
        ignored.extend(["version"]);
        assert_eq!(ignored.len(), 3);
        assert_eq!(ignored.iter().collect::<Vec<_>>(), ["etag", "updatedAt", "version"]);
    }

    #[test]
    fn serde_as_plain_array() {
        let ignored: IgnoredFields = serde_json::from_str(r#"["b", "a"]"#).unwrap();
        assert!(ignored.contains("a"));
        assert_eq!(serde_json::to_string(&ignored).unwrap(), r#"["a","b"]"#);
        assert!(IgnoredFields::none().is_empty());
    }
}
