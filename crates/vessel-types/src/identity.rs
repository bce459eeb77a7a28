use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::ContentHasher;
use crate::value::Value;

/// Stable identity of a vessel for its whole lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VesselId(Uuid);

impl VesselId {
    /// Generate a new time-ordered identity.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        let simple = self.0.simple().to_string();
        format!("v:{}", &simple[..8])
    }
}

impl Default for VesselId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VesselId({})", self.short_id())
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

/// Identity of an item for as long as it is registered.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemIdentity {
    /// Primitive values: equal values share one identity.
    Content([u8; 32]),
    /// A particular aggregate copy.
    Instance(Uuid),
    /// A nested vessel.
    Vessel(VesselId),
}

impl ItemIdentity {
    /// Identity for a value about to be stored.
    ///
    /// Aggregates are copied on the way in, and every copy is a new object.
    pub fn for_value(value: &Value) -> Self {
        if value.is_aggregate() {
            Self::Instance(Uuid::now_v7())
        } else {
            Self::Content(ContentHasher::VALUE.hash(&value.canonical_bytes()))
        }
    }

    /// Tagged byte encoding used for entry hashing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(33);
        match self {
            Self::Content(hash) => {
                out.push(0);
                out.extend_from_slice(hash);
            }
            Self::Instance(uuid) => {
                out.push(1);
                out.extend_from_slice(uuid.as_bytes());
            }
            Self::Vessel(id) => {
                out.push(2);
                out.extend_from_slice(id.as_uuid().as_bytes());
            }
        }
        out
    }
}

impl fmt::Debug for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(hash) => write!(f, "Content({})", hex::encode(&hash[..4])),
            Self::Instance(uuid) => write!(f, "Instance({})", &uuid.simple().to_string()[..8]),
            Self::Vessel(id) => write!(f, "Vessel({})", id.short_id()),
        }
    }
}
