//! What a vessel holds: plain values or handles to nested vessels.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use vessel_types::{ItemType, TypeTag, Value, VesselId, VesselKind};

use crate::latch::{Latch, LockState};

/// Shared state of one vessel.
///
/// The registry never holds a [`Vessel`](crate::Vessel) (which would keep the
/// registry alive from inside itself); nested vessels are stored as
/// [`VesselRef`]s pointing at this cell.
pub(crate) struct VesselCell {
    id: VesselId,
    kind: VesselKind,
    item_type: Option<ItemType>,
    name: Mutex<Option<String>>,
    latch: Mutex<Latch>,
}

/// Cheap, clonable handle to a vessel's identity and lock state.
///
/// Two handles are equal when they refer to the same vessel.
#[derive(Clone)]
pub struct VesselRef(Arc<VesselCell>);

impl VesselRef {
    pub(crate) fn new(kind: VesselKind, item_type: Option<ItemType>, name: Option<String>) -> Self {
        Self(Arc::new(VesselCell {
            id: VesselId::new(),
            kind,
            item_type,
            name: Mutex::new(name),
            latch: Mutex::new(Latch::new()),
        }))
    }

    pub fn id(&self) -> VesselId {
        self.0.id
    }

    pub fn kind(&self) -> VesselKind {
        self.0.kind
    }

    /// The effective item-type constraint; `None` admits any value kind.
    pub fn item_type(&self) -> Option<ItemType> {
        self.0.item_type
    }

    /// The vessel's own name.
    pub fn name(&self) -> Option<String> {
        self.0.name.lock().expect("name lock poisoned").clone()
    }

    pub fn is_open(&self) -> bool {
        self.latch().is_open()
    }

    pub fn state(&self) -> LockState {
        self.latch().state()
    }

    pub(crate) fn set_cached_name(&self, name: Option<String>) {
        *self.0.name.lock().expect("name lock poisoned") = name;
    }

    pub(crate) fn latch(&self) -> MutexGuard<'_, Latch> {
        self.0.latch.lock().expect("latch lock poisoned")
    }

    /// Canonical encoding used when hashing the vessel as an item.
    pub(crate) fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = vec![0xf0];
        out.extend_from_slice(self.0.id.as_uuid().as_bytes());
        out
    }
}

impl PartialEq for VesselRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for VesselRef {}

impl fmt::Debug for VesselRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}(name={name:?})", self.kind().label()),
            None => write!(f, "{}({})", self.kind().label(), self.id().short_id()),
        }
    }
}

impl fmt::Display for VesselRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(&name),
            None => f.write_str(self.kind().label()),
        }
    }
}

/// An item held by a vessel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Value(Value),
    Vessel(VesselRef),
}

impl Item {
    /// Runtime type of the item.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Value(v) => TypeTag::Value(v.kind()),
            Self::Vessel(r) => TypeTag::Vessel(r.kind()),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Vessel(_) => None,
        }
    }

    pub fn as_vessel(&self) -> Option<&VesselRef> {
        match self {
            Self::Vessel(r) => Some(r),
            Self::Value(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Vessel(_) => None,
        }
    }

    pub(crate) fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            Self::Value(v) => v.canonical_bytes(),
            Self::Vessel(r) => r.canonical_bytes(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Vessel(r) => write!(f, "{r}"),
        }
    }
}

impl From<Value> for Item {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

/// Borrowing a value takes a deep copy.
impl From<&Value> for Item {
    fn from(v: &Value) -> Self {
        Self::Value(v.clone())
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Self::Value(Value::from(s))
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Self::Value(Value::Str(s))
    }
}

impl From<i64> for Item {
    fn from(i: i64) -> Self {
        Self::Value(Value::Int(i))
    }
}

impl From<i32> for Item {
    fn from(i: i32) -> Self {
        Self::Value(Value::from(i))
    }
}

impl From<f64> for Item {
    fn from(x: f64) -> Self {
        Self::Value(Value::Float(x))
    }
}

impl From<VesselRef> for Item {
    fn from(r: VesselRef) -> Self {
        Self::Vessel(r)
    }
}

impl From<&VesselRef> for Item {
    fn from(r: &VesselRef) -> Self {
        Self::Vessel(r.clone())
    }
}
