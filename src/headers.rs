//! Case-insensitive response header map.
//!
//! Header names are lower-cased on insertion so lookups are case-insensitive.
//! Repeated header names collapse to the last value seen.

use std::collections::HashMap;

/// Mapping from lower-cased header name to header value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from pre-split header lines such as `"Content-Type: text/html"`.
    ///
    /// Each line is split on its first `:`. A line without a colon becomes a
    /// header with an empty value. Later lines overwrite earlier ones with the
    /// same name.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut map = Self::new();
        for line in lines {
            let line = line.as_ref();
            match line.split_once(':') {
                Some((name, value)) => map.insert(name, value),
                None => map.insert(line, ""),
            }
        }
        map
    }

    /// Builds a map from a raw multi-line header block.
    pub fn from_raw(raw: &str) -> Self {
        let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
        Self::from_lines(&lines)
    }

    /// Builds a map from live response headers.
    ///
    /// Non-UTF-8 values are converted lossily rather than dropped.
    pub fn from_response(headers: &reqwest::header::HeaderMap) -> Self {
        let mut map = Self::new();
        for (name, value) in headers {
            map.insert(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
        }
        map
    }

    /// Inserts a header, replacing any previous value for the same name.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.inner.insert(name.trim().to_lowercase(), value.trim().to_string());
    }

    /// Looks up a header value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns true if the header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_lowercase())
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no headers are present.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name.as_ref(), value.as_ref());
        }
        map
    }
}
