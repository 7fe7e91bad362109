//! Ordered, case-insensitive header mapping.
//!
//! Header names compare by ASCII case folding, so `content-length`,
//! `Content-Length` and `CONTENT-LENGTH` all name the same entry. Insertion
//! order is kept, which is also the order headers go out on the wire.

/// Ordered list of `(name, value)` header pairs with case-insensitive names.
///
/// ```rust
/// use tsu_length::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "text/plain");
///
/// assert_eq!(headers.get("content-type"), Some("text/plain"));
/// assert!(headers.contains("CONTENT-TYPE"));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Case-insensitive lookup of the first entry named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if an entry named `name` exists, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Sets `name` to `value`.
    ///
    /// An existing entry is overwritten in place (its position is kept and its
    /// name takes the casing passed here); later duplicates are dropped.
    /// Otherwise the pair is appended.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(i) => {
                self.0[i] = (name.to_owned(), value);
                let mut seen = 0;
                self.0.retain(|(k, _)| {
                    if !k.eq_ignore_ascii_case(name) {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.0.push((name.to_owned(), value)),
        }
    }

    /// Appends a pair without touching existing entries of the same name.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((name.to_owned(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Headers {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
