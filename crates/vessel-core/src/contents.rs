//! Ordered entry collections.
//!
//! [`OrderedEntries`] is the registry's backing store: insertion-ordered,
//! keyed by [`EntryHash`], and limited to insert / remove / clear / iterate.
//! There is no positional write and no way to overwrite a key.
//!
//! [`EntryList`] is the read-only snapshot a vessel hands out as its
//! contents. Callers can index and iterate it but never mutate the vessel
//! through it.

use std::ops::Index;

use indexmap::IndexMap;
use vessel_types::EntryHash;

use crate::entry::Entry;
use crate::item::Item;

#[derive(Debug, Default)]
pub(crate) struct OrderedEntries {
    map: IndexMap<EntryHash, Entry>,
}

impl OrderedEntries {
    /// Append an entry. Returns `false`, leaving the store untouched, if
    /// the key is already present.
    pub(crate) fn insert(&mut self, entry: Entry) -> bool {
        if self.map.contains_key(entry.hash()) {
            return false;
        }
        self.map.insert(*entry.hash(), entry);
        true
    }

    /// Remove an entry, keeping the relative order of the rest.
    pub(crate) fn remove(&mut self, hash: &EntryHash) -> Option<Entry> {
        self.map.shift_remove(hash)
    }

    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.map.len();
        self.map.clear();
        removed
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.map.values()
    }

    pub(crate) fn get(&self, hash: &EntryHash) -> Option<&Entry> {
        self.map.get(hash)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

/// Read-only, ordered snapshot of entries.
#[derive(Clone, Debug, Default)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    pub(crate) fn collect<'a>(entries: impl Iterator<Item = &'a Entry>) -> Self {
        Self {
            entries: entries.cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Entry names, in order.
    pub fn names(&self) -> Vec<Option<String>> {
        self.entries
            .iter()
            .map(|e| e.name().map(String::from))
            .collect()
    }

    /// Items, in order.
    pub fn items(&self) -> Vec<Item> {
        self.entries.iter().map(|e| e.item().clone()).collect()
    }

    /// `(name, item)` pairs, in order.
    pub fn name_items(&self) -> Vec<(Option<String>, Item)> {
        self.entries
            .iter()
            .map(|e| (e.name().map(String::from), e.item().clone()))
            .collect()
    }

    /// First entry carrying `name`.
    pub fn find_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name() == Some(name))
    }

    /// First entry whose item equals `item`.
    pub fn find_item(&self, item: &Item) -> Option<&Entry> {
        self.entries.iter().find(|e| e.item() == item)
    }
}

impl Index<usize> for EntryList {
    type Output = Entry;

    fn index(&self, index: usize) -> &Entry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
