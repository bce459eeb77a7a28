use vessel_types::{EntryHash, ItemIdentity, TypeTag, VesselId};

use crate::item::Item;

/// Immutable registry record.
///
/// A rename never edits an entry in place: the registry removes the old
/// record and inserts a new one under a freshly derived hash.
#[derive(Clone, Debug)]
pub struct Entry {
    hash: EntryHash,
    identity: ItemIdentity,
    name: Option<String>,
    item: Item,
    type_tag: TypeTag,
    owner: Option<VesselId>,
}

impl Entry {
    pub(crate) fn new(
        identity: ItemIdentity,
        name: Option<String>,
        item: Item,
        owner: Option<VesselId>,
    ) -> Self {
        let hash = EntryHash::derive(&identity, name.as_deref(), owner, &item.canonical_bytes());
        let type_tag = item.type_tag();
        Self {
            hash,
            identity,
            name,
            item,
            type_tag,
            owner,
        }
    }

    /// A copy of this entry under a new name (and therefore a new hash).
    pub(crate) fn renamed(&self, name: Option<String>) -> Self {
        Self::new(self.identity, name, self.item.clone(), self.owner)
    }

    /// A copy of this entry held by `owner` (and therefore a new hash).
    pub(crate) fn relocated(&self, owner: Option<VesselId>) -> Self {
        Self::new(self.identity, self.name.clone(), self.item.clone(), owner)
    }

    /// The registry key.
    pub fn hash(&self) -> &EntryHash {
        &self.hash
    }

    pub fn identity(&self) -> &ItemIdentity {
        &self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// The vessel holding this entry; `None` for a top-level vessel's own
    /// entry.
    pub fn owner(&self) -> Option<VesselId> {
        self.owner
    }

    pub fn is_top_level(&self) -> bool {
        self.owner.is_none()
    }

    pub(crate) fn is_vessel(&self, id: VesselId) -> bool {
        self.identity == ItemIdentity::Vessel(id)
    }
}
