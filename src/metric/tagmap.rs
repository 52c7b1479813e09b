//! tagmap is the set of key, value pairs that identifies the series a
//! `Record` belongs to. The store indexes points by their tags only, so two
//! records with equal tags and measurement land in the same series. Think of
//! it as a specialized hashmap, sorted by key.

use std::iter::FromIterator;
use std::slice::Iter;

/// The tagmap key, value collection. Behaves similarly to
/// `std::collections::BTreeMap<String, String>` but with a specialized
/// implementation for fast searching over a small collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagMap {
    inner: Vec<(String, String)>,
}

impl TagMap {
    /// Create a `tagmap::Iter`. Pairs come back sorted by key.
    pub fn iter(&self) -> Iter<(String, String)> {
        self.inner.iter()
    }

    /// Get a value from the tagmap, if it exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.inner.binary_search_by(|entry| entry.0.as_str().cmp(key)) {
            Ok(idx) => Some(&self.inner[idx].1),
            Err(_) => None,
        }
    }

    /// Insert a key / value into self
    ///
    /// This method will return the value previously stored under the given key,
    /// if there was such a value.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let val = val.into();
        match self.inner.binary_search_by(|entry| entry.0.cmp(&key)) {
            Ok(idx) => {
                let old = ::std::mem::replace(&mut self.inner[idx].1, val);
                Some(old)
            }
            Err(idx) => {
                self.inner.insert(idx, (key, val));
                None
            }
        }
    }

    /// Overlay `other` onto self
    ///
    /// Values in `other` win over values already present in self. Keys only
    /// present in self are left as they are.
    pub fn overlay(&mut self, other: &TagMap) {
        for &(ref key, ref val) in &other.inner {
            self.insert(key.clone(), val.clone());
        }
    }

    /// Determine if the tagmap is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Return the length of the tagmap. This is the total number of key /
    /// values stored in the map.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a> IntoIterator for &'a TagMap {
    type Item = &'a (String, String);
    type IntoIter = Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for TagMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> TagMap {
        let mut tags = TagMap::default();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}
