use std::fmt;
use std::sync::{Arc, MutexGuard};

use tracing::{debug, info, warn};
use vessel_types::{ItemType, Value, VesselError, VesselId, VesselKind, VesselResult};

use crate::config::VesselConfig;
use crate::contents::EntryList;
use crate::entry::Entry;
use crate::item::{Item, VesselRef};
use crate::latch::{Latch, LockState};
use crate::registry::Registry;
use crate::selector::Selector;

/// A gated container.
///
/// Contents change only through [`put`](Self::put), [`fetch`](Self::fetch),
/// [`destroy`](Self::destroy), the naming operations and
/// [`empty`](Self::empty). Each of these first passes the lock check: on a
/// locked vessel the correct key must accompany the call. The contents
/// themselves are derived from the registry on every read and handed out
/// as copies.
///
/// Cloning a `Vessel` clones the handle; both clones are the same vessel.
#[derive(Clone)]
pub struct Vessel {
    handle: VesselRef,
    registry: Arc<Registry>,
}

impl Vessel {
    /// Create an empty, open vessel and register its name.
    ///
    /// Fails with [`VesselError::Name`] if the name is already in use.
    pub fn new(
        registry: &Arc<Registry>,
        kind: VesselKind,
        config: VesselConfig,
    ) -> VesselResult<Self> {
        let item_type = config.effective_item_type(kind);
        let handle = VesselRef::new(kind, item_type, config.name.clone());
        registry
            .register(Item::from(&handle), config.name, None)
            .map_err(into_name_error)?;
        debug!(kind = %kind, id = %handle.id(), name = ?handle.name(), "created vessel");
        Ok(Self {
            handle,
            registry: Arc::clone(registry),
        })
    }

    /// Operate on a vessel reached through a handle, e.g. one returned by
    /// [`use_item`](Self::use_item) on its parent.
    pub fn attach(registry: &Arc<Registry>, handle: VesselRef) -> Self {
        Self {
            handle,
            registry: Arc::clone(registry),
        }
    }

    pub fn handle(&self) -> &VesselRef {
        &self.handle
    }

    pub fn id(&self) -> VesselId {
        self.handle.id()
    }

    pub fn kind(&self) -> VesselKind {
        self.handle.kind()
    }

    pub fn item_type(&self) -> Option<ItemType> {
        self.handle.item_type()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The vessel's own name.
    pub fn name(&self) -> Option<String> {
        self.handle.name()
    }

    /// Rename the vessel itself.
    ///
    /// No-op if unchanged; [`VesselError::Name`] if the new name is taken.
    pub fn set_name(&self, name: Option<&str>) -> VesselResult<()> {
        self.registry
            .rename_vessel(&self.handle, name.map(String::from))
            .map_err(into_name_error)?;
        Ok(())
    }

    // ---- Lock / key ----

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    pub fn state(&self) -> LockState {
        self.handle.state()
    }

    /// Lock with `key`. The key can be set only once per vessel.
    pub fn lock(&self, key: &str) -> VesselResult<()> {
        self.handle.latch().lock(key)?;
        info!(vessel = %self, "locked vessel");
        Ok(())
    }

    /// Open the vessel. Always succeeds if it is already open.
    pub fn open(&self, key: Option<&str>) -> VesselResult<()> {
        self.handle.latch().open(key)?;
        info!(vessel = %self, "opened vessel");
        Ok(())
    }

    /// Pass the lock check and hold the latch for the rest of the operation.
    fn admit(&self, key: Option<&str>) -> VesselResult<MutexGuard<'_, Latch>> {
        let latch = self.handle.latch();
        latch.check(key)?;
        Ok(latch)
    }

    fn type_check(&self, item: &Item) -> VesselResult<()> {
        let constraint = self.item_type();
        if ItemType::admits_optional(constraint.as_ref(), item.type_tag()) {
            return Ok(());
        }
        let expected = constraint.unwrap_or(ItemType::AnyValue);
        Err(VesselError::Type(format!(
            "item {item} ({}) must be {expected} to go in {self}",
            item.type_tag()
        )))
    }

    // ---- put / use / fetch / destroy ----

    /// Place `item` in this vessel under `name`.
    ///
    /// Values are stored as independent copies. A nested vessel without an
    /// explicit name keeps its own; its registry entry moves under this
    /// vessel.
    pub fn put(
        &self,
        item: impl Into<Item>,
        name: Option<&str>,
        key: Option<&str>,
    ) -> VesselResult<Entry> {
        let _gate = self.admit(key)?;
        let item = item.into();
        self.type_check(&item)?;

        match item {
            Item::Vessel(nested) => {
                self.registry
                    .adopt(&nested, name.map(String::from), self.id())
            }
            value @ Item::Value(_) => {
                self.registry
                    .register(value, name.map(String::from), Some(self.id()))
            }
        }
    }

    /// Return the selected item without removing it.
    pub fn use_item(
        &self,
        selector: impl Into<Selector>,
        key: Option<&str>,
    ) -> VesselResult<Item> {
        let _gate = self.admit(key)?;
        let entry = self.registry.find(self.id(), &selector.into())?;
        Ok(entry.item().clone())
    }

    /// Remove the selected item and return it.
    pub fn fetch(&self, selector: impl Into<Selector>, key: Option<&str>) -> VesselResult<Item> {
        let _gate = self.admit(key)?;
        let entry = self.registry.take(self.id(), &selector.into())?;
        Ok(entry.item().clone())
    }

    /// Remove the selected item and discard it.
    pub fn destroy(&self, selector: impl Into<Selector>, key: Option<&str>) -> VesselResult<()> {
        let _gate = self.admit(key)?;
        self.registry.take(self.id(), &selector.into())?;
        Ok(())
    }

    /// `true` if `needle` equals a held item or, being a string, a held name.
    pub fn contains(&self, needle: impl Into<Item>) -> bool {
        let needle = needle.into();
        let as_name = needle.as_value().and_then(Value::as_str);
        self.entries()
            .iter()
            .any(|e| e.item() == &needle || (as_name.is_some() && e.name() == as_name))
    }

    // ---- Naming ----

    /// Name of `item`.
    ///
    /// For a vessel, its own name. For a value, the name of the first
    /// matching entry in this vessel; [`VesselError::Access`] if none.
    pub fn getname(&self, item: impl Into<Item>) -> VesselResult<Option<String>> {
        match item.into() {
            Item::Vessel(nested) => Ok(nested.name()),
            item => self
                .entries()
                .find_item(&item)
                .map(|e| e.name().map(String::from))
                .ok_or_else(|| VesselError::Access(format!("{self} does not hold {item}"))),
        }
    }

    /// Rename the entry holding `item`. `None` clears the name.
    pub fn setname(
        &self,
        item: impl Into<Item>,
        name: Option<&str>,
        key: Option<&str>,
    ) -> VesselResult<()> {
        let _gate = self.admit(key)?;
        self.rename_selected(&Selector::Item(item.into()), name)
    }

    /// Rename the entry currently called `old`.
    pub fn rename(&self, old: &str, new: &str, key: Option<&str>) -> VesselResult<()> {
        let _gate = self.admit(key)?;
        self.rename_selected(&Selector::name(old), Some(new))
    }

    /// Remove the name from the entry called `name`, leaving it unnamed.
    pub fn delname(&self, name: &str, key: Option<&str>) -> VesselResult<()> {
        let _gate = self.admit(key)?;
        self.rename_selected(&Selector::name(name), None)
    }

    fn rename_selected(&self, selector: &Selector, name: Option<&str>) -> VesselResult<()> {
        self.registry
            .rename_in(self.id(), selector, name.map(String::from))?;
        Ok(())
    }

    // ---- empty / introspection ----

    /// Clear the registry.
    ///
    /// This drops every entry of every vessel, not only this vessel's
    /// contents; other vessels' names become free again.
    pub fn empty(&self, key: Option<&str>) -> VesselResult<()> {
        let _gate = self.admit(key)?;
        let removed = self.registry.clear();
        warn!(vessel = %self, removed, "emptied the entire registry");
        Ok(())
    }

    /// Entries held by this vessel, in order.
    pub fn entries(&self) -> EntryList {
        self.registry.entries_for(self.id())
    }

    pub fn names(&self) -> Vec<Option<String>> {
        self.entries().names()
    }

    pub fn contents(&self) -> Vec<Item> {
        self.entries().items()
    }

    pub fn name_contents(&self) -> Vec<(Option<String>, Item)> {
        self.entries().name_items()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn into_name_error(err: VesselError) -> VesselError {
    match err {
        VesselError::Duplicate(msg) => VesselError::Name(msg),
        other => other,
    }
}

impl PartialEq for Vessel {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for Vessel {}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle)
    }
}

impl fmt::Debug for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vessel")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}

impl From<&Vessel> for Item {
    fn from(v: &Vessel) -> Self {
        Self::Vessel(v.handle.clone())
    }
}

impl From<Vessel> for Item {
    fn from(v: Vessel) -> Self {
        Self::Vessel(v.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_types::ValueKind;

    fn setup() -> (Arc<Registry>, Vessel) {
        let registry = Registry::shared();
        let v = Vessel::new(&registry, VesselKind::Box, VesselConfig::named("V")).unwrap();
        (registry, v)
    }

    // -----------------------------------------------------------------------
    // Construction and own name
    // -----------------------------------------------------------------------

    #[test]
    fn new_vessel_is_open_empty_and_registered() {
        let (registry, v) = setup();
        assert!(v.is_open());
        assert!(v.is_empty());
        assert!(registry.contains_name("V"));
        assert!(registry.entry_of(v.id()).unwrap().is_top_level());
    }

    #[test]
    fn colliding_vessel_name_is_name_error() {
        let (registry, _v) = setup();
        let err = Vessel::new(&registry, VesselKind::Box, VesselConfig::named("V")).unwrap_err();
        assert!(matches!(err, VesselError::Name(_)));
    }

    #[test]
    fn unnamed_vessels_do_not_collide() {
        let registry = Registry::shared();
        Vessel::new(&registry, VesselKind::Box, VesselConfig::default()).unwrap();
        Vessel::new(&registry, VesselKind::Box, VesselConfig::default()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn set_name_renames_registry_entry() {
        let (registry, v) = setup();
        v.set_name(Some("W")).unwrap();
        assert_eq!(v.name().as_deref(), Some("W"));
        assert!(registry.contains_name("W"));
        assert!(!registry.contains_name("V"));
    }

    #[test]
    fn set_name_unchanged_is_noop() {
        let (registry, v) = setup();
        let before = *registry.entry_of(v.id()).unwrap().hash();
        v.set_name(Some("V")).unwrap();
        assert_eq!(*registry.entry_of(v.id()).unwrap().hash(), before);
    }

    #[test]
    fn concurrent_renames_leave_name_matching_entry() {
        use std::thread;

        let (registry, v) = setup();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let v = v.clone();
                thread::spawn(move || v.set_name(Some(&format!("n{i}"))).is_ok())
            })
            .collect();
        assert!(handles.into_iter().all(|h| h.join().unwrap()));

        let entry = registry.entry_of(v.id()).unwrap();
        assert_eq!(v.name().as_deref(), entry.name());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn set_name_to_item_name_is_name_error() {
        let (_registry, v) = setup();
        v.put("hello", Some("greeting"), None).unwrap();
        assert!(matches!(v.set_name(Some("greeting")), Err(VesselError::Name(_))));
        assert_eq!(v.name().as_deref(), Some("V"));
    }

    // -----------------------------------------------------------------------
    // put / use / fetch / destroy
    // -----------------------------------------------------------------------

    #[test]
    fn put_then_use_by_name_index_and_item() {
        let (_registry, v) = setup();
        v.put("Redemption Song", Some("foo"), None).unwrap();
        v.put(Value::set([3, 7, 9, 23]), Some("bar"), None).unwrap();

        assert_eq!(v.use_item("foo", None).unwrap(), Item::from("Redemption Song"));
        assert_eq!(
            v.use_item(Selector::index(1), None).unwrap(),
            Item::Value(Value::set([23, 9, 7, 3]))
        );
        assert_eq!(
            v.use_item(Selector::item("Redemption Song"), None).unwrap(),
            Item::from("Redemption Song")
        );
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn put_unnamed_item() {
        let (_registry, v) = setup();
        v.put(2.5, None, None).unwrap();
        assert_eq!(v.names(), vec![None]);
        assert_eq!(v.getname(2.5).unwrap(), None);
    }

    #[test]
    fn put_rejects_duplicate_name_anywhere() {
        let (registry, v) = setup();
        let w = Vessel::new(&registry, VesselKind::Box, VesselConfig::named("W")).unwrap();
        v.put(1, Some("x"), None).unwrap();
        assert!(matches!(w.put(2, Some("x"), None), Err(VesselError::Duplicate(_))));
        assert!(matches!(w.put(2, Some("V"), None), Err(VesselError::Duplicate(_))));
    }

    #[test]
    fn fetch_removes_and_returns() {
        let (_registry, v) = setup();
        v.put("x", Some("n"), None).unwrap();
        assert_eq!(v.fetch("n", None).unwrap(), Item::from("x"));
        assert!(!v.contains("n"));
        assert!(matches!(v.fetch("n", None), Err(VesselError::Access(_))));
    }

    #[test]
    fn destroy_discards() {
        let (_registry, v) = setup();
        v.put(42, Some("answer"), None).unwrap();
        v.destroy(Selector::item(42), None).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn out_of_range_index_is_access_error() {
        let (_registry, v) = setup();
        v.put(1, None, None).unwrap();
        assert!(matches!(v.use_item(Selector::index(1), None), Err(VesselError::Access(_))));
        assert!(matches!(v.fetch(Selector::index(-1), None), Err(VesselError::Access(_))));
    }

    #[test]
    fn contains_spans_items_and_names() {
        let (_registry, v) = setup();
        v.put(Value::list([1, 2]), Some("pair"), None).unwrap();
        assert!(v.contains("pair"));
        assert!(v.contains(Value::list([1, 2])));
        assert!(!v.contains(Value::list([2, 1])));
        assert!(!v.contains("V"));
    }

    // -----------------------------------------------------------------------
    // Type constraints
    // -----------------------------------------------------------------------

    #[test]
    fn constrained_box_rejects_other_kinds() {
        let registry = Registry::shared();
        let strings = Vessel::new(
            &registry,
            VesselKind::Box,
            VesselConfig::default().with_item_type(ItemType::Value(ValueKind::Str)),
        )
        .unwrap();
        strings.put("ok", None, None).unwrap();
        assert!(matches!(strings.put(1, None, None), Err(VesselError::Type(_))));
    }

    #[test]
    fn box_rejects_vessels() {
        let (registry, v) = setup();
        let other = Vessel::new(&registry, VesselKind::Box, VesselConfig::default()).unwrap();
        assert!(matches!(v.put(&other, None, None), Err(VesselError::Type(_))));
    }

    // -----------------------------------------------------------------------
    // Naming
    // -----------------------------------------------------------------------

    #[test]
    fn getname_for_values_and_vessels() {
        let (registry, v) = setup();
        v.put("hello", Some("greeting"), None).unwrap();
        assert_eq!(v.getname("hello").unwrap().as_deref(), Some("greeting"));
        assert_eq!(v.getname(&v).unwrap().as_deref(), Some("V"));
        let other = Vessel::new(&registry, VesselKind::Crate, VesselConfig::named("C")).unwrap();
        assert_eq!(v.getname(&other).unwrap().as_deref(), Some("C"));
    }

    #[test]
    fn getname_for_missing_value_is_access_error() {
        let (_registry, v) = setup();
        assert!(matches!(v.getname("absent"), Err(VesselError::Access(_))));
    }

    #[test]
    fn setname_renames_and_clears() {
        let (_registry, v) = setup();
        v.put("hello", Some("greeting"), None).unwrap();
        v.setname("hello", Some("salutation"), None).unwrap();
        assert_eq!(v.names(), vec![Some("salutation".to_string())]);
        v.setname("hello", None, None).unwrap();
        assert_eq!(v.names(), vec![None]);
    }

    #[test]
    fn setname_to_taken_name_is_duplicate() {
        let (_registry, v) = setup();
        v.put("a", Some("first"), None).unwrap();
        v.put("b", Some("second"), None).unwrap();
        assert!(matches!(
            v.setname("a", Some("second"), None),
            Err(VesselError::Duplicate(_))
        ));
    }

    #[test]
    fn setname_checks_name_before_lookup() {
        let (_registry, v) = setup();
        v.put("a", Some("first"), None).unwrap();
        assert!(matches!(
            v.setname("absent", Some("first"), None),
            Err(VesselError::Duplicate(_))
        ));
        assert!(matches!(
            v.setname("absent", Some("free"), None),
            Err(VesselError::Access(_))
        ));
    }

    #[test]
    fn rename_and_delname() {
        let (_registry, v) = setup();
        v.put("a", Some("first"), None).unwrap();
        v.rename("first", "1st", None).unwrap();
        assert!(v.contains("1st"));
        v.delname("1st", None).unwrap();
        assert_eq!(v.names(), vec![None]);
        assert!(matches!(v.rename("first", "x", None), Err(VesselError::Access(_))));
    }

    // -----------------------------------------------------------------------
    // Lock gating
    // -----------------------------------------------------------------------

    #[test]
    fn every_gated_operation_checks_the_key() {
        let (_registry, v) = setup();
        v.put("x", Some("n"), None).unwrap();
        v.lock("k").unwrap();

        assert!(matches!(v.put(1, None, None), Err(VesselError::Lock(_))));
        assert!(matches!(v.use_item("n", None), Err(VesselError::Lock(_))));
        assert!(matches!(v.fetch("n", Some("bad")), Err(VesselError::Key(_))));
        assert!(matches!(v.destroy("n", None), Err(VesselError::Lock(_))));
        assert!(matches!(v.setname("x", Some("m"), None), Err(VesselError::Lock(_))));
        assert!(matches!(v.rename("n", "m", Some("bad")), Err(VesselError::Key(_))));
        assert!(matches!(v.delname("n", None), Err(VesselError::Lock(_))));
        assert!(matches!(v.empty(None), Err(VesselError::Lock(_))));

        assert_eq!(v.use_item("n", Some("k")).unwrap(), Item::from("x"));
        v.put(1, None, Some("k")).unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn projections_are_not_gated() {
        let (_registry, v) = setup();
        v.put("x", Some("n"), None).unwrap();
        v.lock("k").unwrap();
        assert_eq!(v.names(), vec![Some("n".to_string())]);
        assert!(v.contains("x"));
        assert!(!v.is_empty());
    }

    #[test]
    fn display_and_debug() {
        let registry = Registry::shared();
        let unnamed = Vessel::new(&registry, VesselKind::Crate, VesselConfig::default()).unwrap();
        assert_eq!(unnamed.to_string(), "Crate");
        let named = Vessel::new(&registry, VesselKind::Box, VesselConfig::named("b")).unwrap();
        assert_eq!(named.to_string(), "b");
        let debug = format!("{named:?}");
        assert!(debug.contains("Vessel"));
        assert!(debug.contains("Box"));
    }
}
