//! The registry: one store of entries shared by every vessel.
//!
//! Every vessel and every item placed into one is an [`Entry`] here, keyed
//! by its [`EntryHash`]. Names are unique across the whole registry; vessel
//! names and item names share one namespace.
//!
//! # Concurrency
//!
//! A single `Mutex` guards the store. Each public method takes it once and
//! runs its whole check-then-act sequence (duplicate check then insert,
//! lookup then remove) under that one guard, so uniqueness holds under
//! concurrent callers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use vessel_types::{EntryHash, ItemIdentity, VesselError, VesselId, VesselResult};

use crate::contents::{EntryList, OrderedEntries};
use crate::entry::Entry;
use crate::item::{Item, VesselRef};
use crate::selector::Selector;

/// Registry of all entries across all vessels.
///
/// Create one at startup and share it (`Arc<Registry>`) with every vessel.
pub struct Registry {
    entries: Mutex<OrderedEntries>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(OrderedEntries::default()),
        }
    }

    /// Create a new empty registry ready to be handed to vessels.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn state(&self) -> MutexGuard<'_, OrderedEntries> {
        self.entries.lock().expect("registry lock poisoned")
    }

    /// Register `item` under `name`, held by `owner`.
    ///
    /// Fails with [`VesselError::Duplicate`] if the name is used anywhere,
    /// if `owner` already holds an item with the same identity, or if the
    /// derived hash is already present.
    pub fn register(
        &self,
        item: Item,
        name: Option<String>,
        owner: Option<VesselId>,
    ) -> VesselResult<Entry> {
        let mut state = self.state();
        let identity = match &item {
            Item::Value(value) => ItemIdentity::for_value(value),
            Item::Vessel(vessel) => ItemIdentity::Vessel(vessel.id()),
        };

        ensure_name_free(&state, name.as_deref(), None)?;
        if let Item::Vessel(vessel) = &item {
            if state.iter().any(|e| e.is_vessel(vessel.id())) {
                return Err(VesselError::Duplicate(format!(
                    "{vessel} is already registered"
                )));
            }
        }
        if let Some(owner) = owner {
            let held = state
                .iter()
                .any(|e| e.owner() == Some(owner) && *e.identity() == identity);
            if held {
                return Err(VesselError::Duplicate(format!(
                    "{item} has already been boxed"
                )));
            }
        }

        let entry = Entry::new(identity, name, item, owner);
        if !state.insert(entry.clone()) {
            return Err(VesselError::Duplicate(format!(
                "{} is already registered under this name",
                entry.item()
            )));
        }
        debug!(
            hash = %entry.hash().short_hex(),
            name = ?entry.name(),
            owner = ?entry.owner(),
            "registered entry"
        );
        Ok(entry)
    }

    /// Remove the entry stored under `hash`.
    ///
    /// Callers pass a hash they just looked up; an absent hash means the
    /// bookkeeping is broken and is reported as
    /// [`VesselError::Implementation`].
    pub fn unregister(&self, hash: &EntryHash) -> VesselResult<Entry> {
        let entry = self.state().remove(hash).ok_or_else(|| missing(hash))?;
        debug!(hash = %hash.short_hex(), name = ?entry.name(), "unregistered entry");
        Ok(entry)
    }

    /// Give the entry under `hash` a new name.
    ///
    /// The old hash is removed and a new entry with the same owner and item
    /// is inserted under the recomputed hash. Renaming to the current name
    /// is a no-op.
    pub fn rename(&self, hash: &EntryHash, new_name: Option<String>) -> VesselResult<Entry> {
        let mut state = self.state();
        rename_locked(&mut state, hash, new_name)
    }

    /// Locate an entry held by `owner` and rename it, atomically.
    ///
    /// A taken name is reported before a failed lookup.
    pub fn rename_in(
        &self,
        owner: VesselId,
        selector: &Selector,
        new_name: Option<String>,
    ) -> VesselResult<Entry> {
        let mut state = self.state();
        let entries = owned_by(&state, owner);
        let located = selector.locate(&entries);
        let current = located.as_ref().ok().map(|e| e.hash());
        ensure_name_free(&state, new_name.as_deref(), current)?;
        let hash = *located?.hash();
        rename_locked(&mut state, &hash, new_name)
    }

    /// Rename a vessel's own entry, wherever it is held.
    ///
    /// A vessel whose entry was cleared away is registered again at top
    /// level under the new name.
    pub fn rename_vessel(
        &self,
        vessel: &VesselRef,
        new_name: Option<String>,
    ) -> VesselResult<Entry> {
        let mut state = self.state();
        let existing = state
            .iter()
            .find(|e| e.is_vessel(vessel.id()))
            .map(|e| *e.hash());
        match existing {
            Some(hash) => rename_locked(&mut state, &hash, new_name),
            None => {
                ensure_name_free(&state, new_name.as_deref(), None)?;
                let entry = Entry::new(
                    ItemIdentity::Vessel(vessel.id()),
                    new_name,
                    Item::Vessel(vessel.clone()),
                    None,
                );
                state.insert(entry.clone());
                sync_vessel_name(&entry);
                debug!(hash = %entry.hash().short_hex(), name = ?entry.name(), "re-registered vessel");
                Ok(entry)
            }
        }
    }

    /// Place `vessel` inside `owner` under `name`, or under its own name
    /// when `name` is `None`.
    ///
    /// A top-level vessel's own entry moves under the new owner (renamed if
    /// `name` differs). A vessel already held by some vessel is a
    /// duplicate; placing a vessel inside itself or its own contents is a
    /// type error.
    pub fn adopt(
        &self,
        vessel: &VesselRef,
        name: Option<String>,
        owner: VesselId,
    ) -> VesselResult<Entry> {
        let mut state = self.state();
        if would_nest_in_itself(&state, vessel.id(), owner) {
            return Err(VesselError::Type(format!(
                "{vessel} cannot be placed inside itself"
            )));
        }

        let existing = state.iter().find(|e| e.is_vessel(vessel.id())).cloned();
        if let Some(holder) = existing.as_ref().and_then(Entry::owner) {
            let reason = if holder == owner {
                "has already been boxed"
            } else {
                "is held by another vessel"
            };
            return Err(VesselError::Duplicate(format!("{vessel} {reason}")));
        }
        let name = name.or_else(|| vessel.name());
        ensure_name_free(&state, name.as_deref(), existing.as_ref().map(Entry::hash))?;

        let entry = match &existing {
            Some(old) if old.name() == name.as_deref() => old.relocated(Some(owner)),
            _ => Entry::new(
                ItemIdentity::Vessel(vessel.id()),
                name,
                Item::Vessel(vessel.clone()),
                Some(owner),
            ),
        };
        if let Some(old) = &existing {
            state.remove(old.hash());
        }
        if !state.insert(entry.clone()) {
            if let Some(old) = existing {
                state.insert(old);
            }
            return Err(VesselError::Duplicate(format!(
                "{vessel} is already registered under this name"
            )));
        }
        sync_vessel_name(&entry);
        debug!(
            hash = %entry.hash().short_hex(),
            name = ?entry.name(),
            owner = %owner,
            "relocated vessel"
        );
        Ok(entry)
    }

    /// Entries held by `owner`, in registration order.
    pub fn entries_for(&self, owner: VesselId) -> EntryList {
        owned_by(&self.state(), owner)
    }

    /// Entries of top-level vessels, in registration order.
    pub fn top_level(&self) -> EntryList {
        EntryList::collect(self.state().iter().filter(|e| e.is_top_level()))
    }

    /// Locate an entry held by `owner`.
    pub fn find(&self, owner: VesselId, selector: &Selector) -> VesselResult<Entry> {
        let state = self.state();
        let entries = owned_by(&state, owner);
        selector.locate(&entries).cloned()
    }

    /// Locate an entry held by `owner` and unregister it, atomically.
    pub fn take(&self, owner: VesselId, selector: &Selector) -> VesselResult<Entry> {
        let mut state = self.state();
        let hash = *selector.locate(&owned_by(&state, owner))?.hash();
        let entry = state.remove(&hash).ok_or_else(|| missing(&hash))?;
        debug!(hash = %hash.short_hex(), name = ?entry.name(), owner = %owner, "took entry");
        Ok(entry)
    }

    /// The entry representing `vessel` itself, if registered.
    pub fn entry_of(&self, vessel: VesselId) -> Option<Entry> {
        self.state().iter().find(|e| e.is_vessel(vessel)).cloned()
    }

    /// Look up an entry by hash.
    pub fn get(&self, hash: &EntryHash) -> Option<Entry> {
        self.state().get(hash).cloned()
    }

    /// Returns `true` if any entry carries `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.state().iter().any(|e| e.name() == Some(name))
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.state().len()
    }

    /// Returns `true` if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry, for every vessel. Returns how many were removed.
    pub fn clear(&self) -> usize {
        self.state().clear()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.len();
        f.debug_struct("Registry")
            .field("entry_count", &count)
            .finish()
    }
}

fn missing(hash: &EntryHash) -> VesselError {
    VesselError::Implementation(format!("no registry entry for hash {}", hash.short_hex()))
}

fn owned_by(state: &OrderedEntries, owner: VesselId) -> EntryList {
    EntryList::collect(state.iter().filter(|e| e.owner() == Some(owner)))
}

fn ensure_name_free(
    state: &OrderedEntries,
    name: Option<&str>,
    except: Option<&EntryHash>,
) -> VesselResult<()> {
    let Some(name) = name else {
        return Ok(());
    };
    let taken = state
        .iter()
        .any(|e| e.name() == Some(name) && Some(e.hash()) != except);
    if taken {
        return Err(VesselError::Duplicate(format!(
            "name '{name}' has already been used"
        )));
    }
    Ok(())
}

fn rename_locked(
    state: &mut OrderedEntries,
    hash: &EntryHash,
    new_name: Option<String>,
) -> VesselResult<Entry> {
    let old = state.get(hash).cloned().ok_or_else(|| missing(hash))?;
    if old.name() == new_name.as_deref() {
        return Ok(old);
    }
    ensure_name_free(state, new_name.as_deref(), Some(hash))?;

    let renamed = old.renamed(new_name);
    state.remove(hash);
    if !state.insert(renamed.clone()) {
        let item = old.item().to_string();
        state.insert(old);
        return Err(VesselError::Duplicate(format!(
            "{item} is already registered under this name"
        )));
    }
    sync_vessel_name(&renamed);
    debug!(
        old = %hash.short_hex(),
        new = %renamed.hash().short_hex(),
        name = ?renamed.name(),
        "renamed entry"
    );
    Ok(renamed)
}

/// Keep a vessel's own name in step with its entry. Runs under the
/// registry lock.
fn sync_vessel_name(entry: &Entry) {
    if let Item::Vessel(vessel) = entry.item() {
        vessel.set_cached_name(entry.name().map(String::from));
    }
}

/// Walk up the owner chain from `owner`; `true` if it reaches `vessel`.
fn would_nest_in_itself(state: &OrderedEntries, vessel: VesselId, owner: VesselId) -> bool {
    let mut cursor = Some(owner);
    for _ in 0..=state.len() {
        match cursor {
            Some(current) if current == vessel => return true,
            Some(current) => {
                cursor = state
                    .iter()
                    .find(|e| e.is_vessel(current))
                    .and_then(Entry::owner);
            }
            None => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_types::{Value, VesselKind};

    fn vessel(kind: VesselKind, name: Option<&str>) -> VesselRef {
        VesselRef::new(kind, kind.default_item_type(), name.map(String::from))
    }

    /// Register a vessel at top level the way vessel construction does.
    fn registered(registry: &Registry, kind: VesselKind, name: Option<&str>) -> VesselRef {
        let r = vessel(kind, name);
        registry
            .register(Item::from(&r), name.map(String::from), None)
            .unwrap();
        r
    }

    fn some(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    // -----------------------------------------------------------------------
    // register / unregister
    // -----------------------------------------------------------------------

    #[test]
    fn register_and_list() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, Some("b"));
        registry.register(Item::from("x"), some("first"), Some(owner.id())).unwrap();
        registry.register(Item::from("y"), some("second"), Some(owner.id())).unwrap();

        let entries = registry.entries_for(owner.id());
        assert_eq!(entries.names(), vec![some("first"), some("second")]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.top_level().len(), 1);
    }

    #[test]
    fn names_are_global() {
        let registry = Registry::new();
        let a = registered(&registry, VesselKind::Box, Some("a"));
        let b = registered(&registry, VesselKind::Box, Some("b"));
        registry.register(Item::from(1), some("x"), Some(a.id())).unwrap();
        let err = registry.register(Item::from(2), some("x"), Some(b.id())).unwrap_err();
        assert!(matches!(err, VesselError::Duplicate(_)));
        // Item names collide with vessel names too.
        let err = registry.register(Item::from(3), some("a"), Some(b.id())).unwrap_err();
        assert!(matches!(err, VesselError::Duplicate(_)));
    }

    #[test]
    fn same_primitive_twice_in_one_owner_is_duplicate() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        registry.register(Item::from("hello"), some("greeting"), Some(owner.id())).unwrap();
        let err = registry
            .register(Item::from("hello"), some("dup"), Some(owner.id()))
            .unwrap_err();
        assert!(matches!(err, VesselError::Duplicate(_)));
    }

    #[test]
    fn same_primitive_in_two_owners_under_different_names() {
        let registry = Registry::new();
        let a = registered(&registry, VesselKind::Box, None);
        let b = registered(&registry, VesselKind::Box, None);
        registry.register(Item::from("hello"), some("in-a"), Some(a.id())).unwrap();
        registry.register(Item::from("hello"), some("in-b"), Some(b.id())).unwrap();
    }

    #[test]
    fn unnamed_equal_primitive_in_two_owners() {
        let registry = Registry::new();
        let a = registered(&registry, VesselKind::Box, None);
        let b = registered(&registry, VesselKind::Box, None);
        let in_a = registry.register(Item::from(7), None, Some(a.id())).unwrap();
        let in_b = registry.register(Item::from(7), None, Some(b.id())).unwrap();
        assert_ne!(in_a.hash(), in_b.hash());
        let err = registry.register(Item::from(7), None, Some(a.id())).unwrap_err();
        assert!(matches!(err, VesselError::Duplicate(_)));
    }

    #[test]
    fn aggregates_are_distinct_copies() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        let list = Value::list([1, 2, 3]);
        registry.register(Item::from(&list), some("one"), Some(owner.id())).unwrap();
        registry.register(Item::from(&list), some("two"), Some(owner.id())).unwrap();
        assert_eq!(registry.entries_for(owner.id()).len(), 2);
    }

    #[test]
    fn unregister_missing_hash_is_implementation_error() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        let entry = registry.register(Item::from(1), None, Some(owner.id())).unwrap();
        registry.unregister(entry.hash()).unwrap();
        let err = registry.unregister(entry.hash()).unwrap_err();
        assert!(matches!(err, VesselError::Implementation(_)));
    }

    // -----------------------------------------------------------------------
    // rename
    // -----------------------------------------------------------------------

    #[test]
    fn rename_recomputes_hash_and_moves_to_end() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        let first = registry.register(Item::from(1), some("one"), Some(owner.id())).unwrap();
        registry.register(Item::from(2), some("two"), Some(owner.id())).unwrap();

        let renamed = registry.rename(first.hash(), some("uno")).unwrap();
        assert_ne!(renamed.hash(), first.hash());
        assert!(registry.get(first.hash()).is_none());
        assert_eq!(
            registry.entries_for(owner.id()).names(),
            vec![some("two"), some("uno")]
        );
    }

    #[test]
    fn rename_to_taken_name_is_duplicate() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, Some("box"));
        let entry = registry.register(Item::from(1), some("one"), Some(owner.id())).unwrap();
        let err = registry.rename(entry.hash(), some("box")).unwrap_err();
        assert!(matches!(err, VesselError::Duplicate(_)));
        assert!(registry.get(entry.hash()).is_some());
    }

    #[test]
    fn rename_to_same_name_is_noop() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        let entry = registry.register(Item::from(1), some("one"), Some(owner.id())).unwrap();
        let same = registry.rename(entry.hash(), some("one")).unwrap();
        assert_eq!(same.hash(), entry.hash());
    }

    #[test]
    fn clearing_a_name_beside_an_unnamed_twin_elsewhere() {
        let registry = Registry::new();
        let a = registered(&registry, VesselKind::Box, None);
        let b = registered(&registry, VesselKind::Box, None);
        registry.register(Item::from(5), None, Some(a.id())).unwrap();
        let named = registry.register(Item::from(5), some("five"), Some(b.id())).unwrap();
        let cleared = registry.rename(named.hash(), None).unwrap();
        assert_eq!(cleared.name(), None);
        assert_eq!(registry.entries_for(a.id()).len(), 1);
        assert_eq!(registry.entries_for(b.id()).names(), vec![None]);
    }

    #[test]
    fn rename_in_reports_taken_name_before_missing_item() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, Some("box"));
        registry.register(Item::from("x"), some("n"), Some(owner.id())).unwrap();

        let err = registry
            .rename_in(owner.id(), &Selector::item("absent"), some("n"))
            .unwrap_err();
        assert!(matches!(err, VesselError::Duplicate(_)));
        let err = registry
            .rename_in(owner.id(), &Selector::item("absent"), some("free"))
            .unwrap_err();
        assert!(matches!(err, VesselError::Access(_)));
        // Keeping an entry's own name is not a collision.
        registry
            .rename_in(owner.id(), &Selector::item("x"), some("n"))
            .unwrap();
    }

    #[test]
    fn renaming_a_vessel_entry_updates_its_name() {
        let registry = Registry::new();
        let r = registered(&registry, VesselKind::Box, Some("b"));
        let entry = registry.entry_of(r.id()).unwrap();
        registry.rename(entry.hash(), some("b2")).unwrap();
        assert_eq!(r.name().as_deref(), Some("b2"));
    }

    #[test]
    fn rename_in_by_selector() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        registry.register(Item::from("x"), some("old"), Some(owner.id())).unwrap();
        registry
            .rename_in(owner.id(), &Selector::item("x"), some("new"))
            .unwrap();
        assert!(registry.contains_name("new"));
        assert!(!registry.contains_name("old"));
    }

    #[test]
    fn rename_vessel_after_clear_reregisters() {
        let registry = Registry::new();
        let r = registered(&registry, VesselKind::Box, Some("b"));
        registry.clear();
        let entry = registry.rename_vessel(&r, some("b2")).unwrap();
        assert!(entry.is_top_level());
        assert_eq!(registry.entry_of(r.id()).unwrap().name(), Some("b2"));
    }

    // -----------------------------------------------------------------------
    // adopt
    // -----------------------------------------------------------------------

    #[test]
    fn adopt_moves_top_level_vessel() {
        let registry = Registry::new();
        let crate_ = registered(&registry, VesselKind::Crate, Some("c"));
        let box_ = registered(&registry, VesselKind::Box, Some("b"));
        registry.adopt(&box_, some("b"), crate_.id()).unwrap();

        let entry = registry.entry_of(box_.id()).unwrap();
        assert_eq!(entry.owner(), Some(crate_.id()));
        assert_eq!(registry.top_level().len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn adopt_under_new_name_renames() {
        let registry = Registry::new();
        let crate_ = registered(&registry, VesselKind::Crate, None);
        let box_ = registered(&registry, VesselKind::Box, Some("b"));
        registry.adopt(&box_, some("renamed"), crate_.id()).unwrap();
        assert!(registry.contains_name("renamed"));
        assert!(!registry.contains_name("b"));
    }

    #[test]
    fn adopt_without_name_keeps_own_name() {
        let registry = Registry::new();
        let crate_ = registered(&registry, VesselKind::Crate, None);
        let box_ = registered(&registry, VesselKind::Box, Some("b"));
        let entry = registry.adopt(&box_, None, crate_.id()).unwrap();
        assert_eq!(entry.name(), Some("b"));
        assert_eq!(box_.name().as_deref(), Some("b"));
    }

    #[test]
    fn adopt_updates_vessel_name() {
        let registry = Registry::new();
        let crate_ = registered(&registry, VesselKind::Crate, None);
        let box_ = registered(&registry, VesselKind::Box, Some("b"));
        registry.adopt(&box_, some("inner"), crate_.id()).unwrap();
        assert_eq!(box_.name().as_deref(), Some("inner"));
    }

    #[test]
    fn adopt_held_vessel_is_duplicate() {
        let registry = Registry::new();
        let c1 = registered(&registry, VesselKind::Crate, None);
        let c2 = registered(&registry, VesselKind::Crate, None);
        let box_ = registered(&registry, VesselKind::Box, Some("b"));
        registry.adopt(&box_, some("b"), c1.id()).unwrap();
        let again = registry.adopt(&box_, some("b"), c1.id()).unwrap_err();
        let elsewhere = registry.adopt(&box_, some("b"), c2.id()).unwrap_err();
        assert!(matches!(again, VesselError::Duplicate(_)));
        assert!(matches!(elsewhere, VesselError::Duplicate(_)));
    }

    #[test]
    fn adopt_into_own_contents_is_type_error() {
        let registry = Registry::new();
        let outer = registered(&registry, VesselKind::Crate, None);
        let inner = registered(&registry, VesselKind::Crate, None);
        registry.adopt(&inner, None, outer.id()).unwrap();
        let err = registry.adopt(&outer, None, inner.id()).unwrap_err();
        assert!(matches!(err, VesselError::Type(_)));
        let err = registry.adopt(&outer, None, outer.id()).unwrap_err();
        assert!(matches!(err, VesselError::Type(_)));
    }

    // -----------------------------------------------------------------------
    // find / take / clear
    // -----------------------------------------------------------------------

    #[test]
    fn take_removes_entry() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, None);
        registry.register(Item::from("x"), some("n"), Some(owner.id())).unwrap();
        let taken = registry.take(owner.id(), &Selector::name("n")).unwrap();
        assert_eq!(taken.item(), &Item::from("x"));
        let err = registry.take(owner.id(), &Selector::name("n")).unwrap_err();
        assert!(matches!(err, VesselError::Access(_)));
    }

    #[test]
    fn find_is_scoped_to_owner() {
        let registry = Registry::new();
        let a = registered(&registry, VesselKind::Box, None);
        let b = registered(&registry, VesselKind::Box, None);
        registry.register(Item::from("x"), some("n"), Some(a.id())).unwrap();
        assert!(registry.find(a.id(), &Selector::name("n")).is_ok());
        assert!(matches!(
            registry.find(b.id(), &Selector::name("n")),
            Err(VesselError::Access(_))
        ));
    }

    #[test]
    fn clear_drops_everything() {
        let registry = Registry::new();
        let owner = registered(&registry, VesselKind::Box, Some("b"));
        registry.register(Item::from(1), None, Some(owner.id())).unwrap();
        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        assert!(!registry.contains_name("b"));
    }

    #[test]
    fn debug_format() {
        let registry = Registry::new();
        let debug = format!("{registry:?}");
        assert!(debug.contains("Registry"));
        assert!(debug.contains("entry_count"));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn racing_registrations_of_one_name_admit_exactly_one() {
        use std::thread;

        let registry = Arc::new(Registry::new());
        let owner = registered(&registry, VesselKind::Box, None);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let owner = owner.id();
                thread::spawn(move || {
                    registry
                        .register(Item::from(i64::from(i)), Some("contested".into()), Some(owner))
                        .is_ok()
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(registry.entries_for(owner.id()).len(), 1);
    }

    #[test]
    fn concurrent_distinct_registrations_all_land() {
        use std::thread;

        let registry = Arc::new(Registry::new());
        let owner = registered(&registry, VesselKind::Box, None);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let owner = owner.id();
                thread::spawn(move || {
                    registry
                        .register(Item::from(i64::from(i)), Some(format!("n{i}")), Some(owner))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(registry.entries_for(owner.id()).len(), 8);
    }
}
