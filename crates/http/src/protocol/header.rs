//! Ordered, case-insensitive, multi-valued header storage.
//!
//! [`HeaderBag`] keeps every distinct header name in the order it was first seen,
//! together with all values recorded under it. Lookups ignore ascii case, while the
//! casing of the first insertion is kept for serialization.

use std::fmt;

/// A single header name and every value recorded under it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    values: Vec<String>,
}

impl Entry {
    #[inline]
    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered mapping from a case-insensitive header name to a list of values.
///
/// Values are stored verbatim; no trimming or folding is applied.
///
/// # Example
///
/// ```
/// use micro_sapi::protocol::HeaderBag;
///
/// let mut headers = HeaderBag::new();
/// headers.add("Content-Type", "a");
/// headers.add("content-type", "b");
///
/// assert_eq!(headers.get("CONTENT-TYPE"), Some("a"));
/// assert_eq!(headers.get_all("Content-Type"), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Vec<Entry>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.matches(name))
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.matches(name))
    }

    /// Replaces all values under `name` with a single value.
    ///
    /// An existing entry keeps its position and its first-seen casing.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set_all(name, [value]);
    }

    /// Replaces all values under `name` with `values`.
    pub fn set_all<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values = values.into_iter().map(Into::into).collect();
        match self.position(&name) {
            Some(index) => self.entries[index].values = values,
            None => self.entries.push(Entry { name, values }),
        }
    }

    /// Appends a value under `name`, creating the entry if absent.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].values.push(value),
            None => self.entries.push(Entry { name, values: vec![value] }),
        }
    }

    /// Returns the first value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|entry| entry.values.first()).map(String::as_str)
    }

    /// Returns every value recorded under `name` in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entry(name).map(|entry| entry.values.iter().map(String::as_str).collect()).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes the entry for `name` entirely, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).values)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates `(name, values)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Iterates every `(name, value)` line, repeating the name for each value.
    pub fn lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|entry| entry.values.iter().map(move |value| (entry.name.as_str(), value.as_str())))
    }

    /// Snapshot of the bag keyed by the first-seen name casing.
    pub fn as_map(&self) -> Vec<(String, Vec<String>)> {
        self.entries.iter().map(|entry| (entry.name.clone(), entry.values.clone())).collect()
    }
}

impl<K, V> Extend<(K, V)> for HeaderBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.add(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = HeaderBag::new();
        headers.extend(iter);
        headers
    }
}

impl fmt::Display for HeaderBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.lines() {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut headers = HeaderBag::new();
        headers.set("Content-Type", "text/html");

        assert_eq!(headers.get("content-TYPE"), Some("text/html"));
        assert!(headers.contains("CONTENT-TYPE"));
        assert_eq!(headers.get("Content-Length"), None);
        assert!(headers.get_all("Content-Length").is_empty());
    }

    #[test]
    fn test_add_keeps_order_and_multiplicity() {
        let mut headers = HeaderBag::new();
        headers.add("Content-Type", "a");
        headers.add("X-Other", "x");
        headers.add("content-type", "b");

        assert_eq!(headers.get_all("Content-Type"), vec!["a", "b"]);
        assert_eq!(headers.len(), 2);

        let lines: Vec<_> = headers.lines().collect();
        assert_eq!(lines, vec![("Content-Type", "a"), ("Content-Type", "b"), ("X-Other", "x")]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers = HeaderBag::new();
        headers.add("X-First", "1");
        headers.add("X-Second", "2");
        headers.add("x-first", "3");

        headers.set("X-FIRST", "4");

        assert_eq!(headers.get_all("x-first"), vec!["4"]);
        assert_eq!(
            headers.as_map(),
            vec![("X-First".to_string(), vec!["4".to_string()]), ("X-Second".to_string(), vec!["2".to_string()])]
        );
    }

    #[test]
    fn test_remove() {
        let mut headers: HeaderBag = [("A", "1"), ("B", "2"), ("a", "3")].into_iter().collect();

        assert_eq!(headers.remove("a"), Some(vec!["1".to_string(), "3".to_string()]));
        assert_eq!(headers.remove("a"), None);
        assert_eq!(headers.get("A"), None);
        assert_eq!(headers.len(), 1);

        headers.add("a", "4");
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["B", "a"]);
    }

    #[test]
    fn test_values_are_verbatim() {
        let mut headers = HeaderBag::new();
        headers.add("X-Padded", "  spaced value ");

        assert_eq!(headers.get("x-padded"), Some("  spaced value "));
    }

    #[test]
    fn test_display() {
        let mut headers = HeaderBag::new();
        headers.add("Content-Type", "a");
        headers.add("Content-Type", "b");
        headers.set("Content-Length", "0");

        assert_eq!(headers.to_string(), "Content-Type: a\r\nContent-Type: b\r\nContent-Length: 0\r\n");
    }
}
