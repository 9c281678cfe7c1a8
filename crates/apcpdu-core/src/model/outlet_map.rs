// ── Outlet-keyed results ──

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::Serialize;

use super::outlet::OutletIndex;

/// Key of an enumerated entry: the last arc of the returned OID.
///
/// Orders numerically where the key is a number, so outlet 10 sorts
/// after outlet 9; non-numeric keys sort after all numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OutletKey(String);

impl OutletKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The outlet this key names, if it is a valid outlet number.
    pub fn outlet(&self) -> Option<OutletIndex> {
        self.0.parse().ok().and_then(OutletIndex::new)
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for OutletKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for OutletKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OutletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OutletIndex> for OutletKey {
    fn from(index: OutletIndex) -> Self {
        Self(index.to_string())
    }
}

impl From<u32> for OutletKey {
    fn from(arc: u32) -> Self {
        Self(arc.to_string())
    }
}

/// Per-outlet values keyed by [`OutletKey`], iterated in outlet order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutletMap<T>(BTreeMap<OutletKey, T>);

impl<T> OutletMap<T> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<OutletKey>, value: T) -> Option<T> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.get(&OutletKey::new(key))
    }

    pub fn get_outlet(&self, index: OutletIndex) -> Option<&T> {
        self.0.get(&OutletKey::from(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &OutletKey> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, OutletKey, T> {
        self.0.iter()
    }
}

impl<T> Default for OutletMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for OutletMap<T> {
    type Item = (OutletKey, T);
    type IntoIter = btree_map::IntoIter<OutletKey, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OutletMap<T> {
    type Item = (&'a OutletKey, &'a T);
    type IntoIter = btree_map::Iter<'a, OutletKey, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<OutletKey>, T> FromIterator<(K, T)> for OutletMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
