use std::collections::btree_map::{self, BTreeMap};
use std::iter::FromIterator;
use std::str;

/// Multi-valued parameter map.
///
/// OAuth parameters may repeat (`a3=a&a3=2+q`), so every name keeps all of
/// its values in insertion order. Names iterate in sorted order.
///
/// Names and values are octets: a percent-decoded query may carry bytes that
/// are not UTF-8, and they must be signed as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    inner: BTreeMap<Vec<u8>, Vec<Vec<u8>>>,
}

impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends `value` to the values of `name`.
    pub fn add<K, V>(&mut self, name: K, value: V)
    where
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        self.inner
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Appends every value of `other`, keeping duplicates.
    pub fn extend_from(&mut self, other: &Parameters) {
        for (name, values) in &other.inner {
            self.inner
                .entry(name.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    /// First value of `name`, when it is UTF-8.
    pub fn get<K: AsRef<[u8]> + ?Sized>(&self, name: &K) -> Option<&str> {
        self.get_bytes(name)
            .and_then(|value| str::from_utf8(value).ok())
    }

    /// First value of `name`.
    pub fn get_bytes<K: AsRef<[u8]> + ?Sized>(&self, name: &K) -> Option<&[u8]> {
        self.get_all(name).first().map(Vec::as_slice)
    }

    pub fn get_all<K: AsRef<[u8]> + ?Sized>(&self, name: &K) -> &[Vec<u8>] {
        self.inner
            .get(name.as_ref())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_key<K: AsRef<[u8]> + ?Sized>(&self, name: &K) -> bool {
        self.inner.contains_key(name.as_ref())
    }

    /// Drops `name` with all of its values.
    pub fn remove<K: AsRef<[u8]> + ?Sized>(&mut self, name: &K) -> Option<Vec<Vec<u8>>> {
        self.inner.remove(name.as_ref())
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &[u8]> {
        self.inner.keys().map(Vec::as_slice)
    }

    /// Iterates `(name, values)` groups.
    pub fn groups(&self) -> btree_map::Iter<'_, Vec<u8>, Vec<Vec<u8>>> {
        self.inner.iter()
    }

    /// Iterates every `(name, value)` pair, one per value.
    pub fn pairs(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.inner.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_slice(), value.as_slice()))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Parameters
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.add(name, value);
        }
    }
}
