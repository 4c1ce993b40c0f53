use std::collections::HashMap;

/// Host-supplied key to string-list data (platform version, user groups and
/// the like). Read-only during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SupplementaryData {
    entries: HashMap<String, Vec<String>>,
}

impl SupplementaryData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(key, values);
        self
    }

    pub fn insert<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// First value recorded under `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(<[String]>::first).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value() {
        let data = SupplementaryData::new().with("android_version", ["19", "20"]);
        assert_eq!(data.first("android_version"), Some("19"));
        assert_eq!(data.get("android_version").map(<[String]>::len), Some(2));
    }

    #[test]
    fn empty_list_has_no_first() {
        let data = SupplementaryData::new().with("android_version", Vec::<String>::new());
        assert_eq!(data.first("android_version"), None);
        assert_eq!(data.first("missing"), None);
    }
}
