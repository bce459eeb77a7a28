use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{ItemIdentity, VesselId};

/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so an entry hash, a value identity and a key digest over the
/// same bytes never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for registry entry keys.
    pub const ENTRY: Self = Self {
        domain: "vessel-entry-v1",
    };
    /// Hasher for primitive value identities.
    pub const VALUE: Self = Self {
        domain: "vessel-value-v1",
    };
    /// Hasher for lock keys.
    pub const KEY: Self = Self {
        domain: "vessel-key-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        self.hash_parts(&[data])
    }

    /// Hash several byte strings, each length-prefixed so that part
    /// boundaries are unambiguous.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> [u8; 32] {
        *self.finalize(parts).as_bytes()
    }

    fn finalize(&self, parts: &[&[u8]]) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        hasher.finalize()
    }
}

/// Registry key: a hash over an entry's identity, name, owner and item.
///
/// Recomputed whenever the entry's name or owner changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryHash([u8; 32]);

impl EntryHash {
    /// Derive the key for `(identity, name, owner, item)`.
    ///
    /// `item` is the item's canonical encoding. An absent name and an empty
    /// name produce different keys, as do a top-level entry and a held one.
    pub fn derive(
        identity: &ItemIdentity,
        name: Option<&str>,
        owner: Option<VesselId>,
        item: &[u8],
    ) -> Self {
        let identity = identity.to_bytes();
        let name_part = optional_part(name.map(str::as_bytes));
        let owner_part =
            optional_part(owner.as_ref().map(|id| id.as_uuid().as_bytes().as_slice()));
        Self(ContentHasher::ENTRY.hash_parts(&[&identity, &name_part, &owner_part, item]))
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

/// `0` for absent, `1` followed by the bytes for present.
fn optional_part(bytes: Option<&[u8]>) -> Vec<u8> {
    match bytes {
        None => vec![0],
        Some(b) => {
            let mut part = Vec::with_capacity(b.len() + 1);
            part.push(1);
            part.extend_from_slice(b);
            part
        }
    }
}

impl fmt::Debug for EntryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryHash({})", self.short_hex())
    }
}

impl fmt::Display for EntryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Digest of a lock key.
///
/// The plain key is hashed on arrival and dropped. Comparison goes through
/// [`blake3::Hash`] equality, which is constant-time.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyDigest(blake3::Hash);

impl KeyDigest {
    /// Digest a key.
    pub fn of(key: &str) -> Self {
        Self(ContentHasher::KEY.finalize(&[key.as_bytes()]))
    }

    /// Returns `true` if `key` digests to this value.
    pub fn matches(&self, key: &str) -> bool {
        Self::of(key) == *self
    }
}

impl fmt::Debug for KeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyDigest(<redacted>)")
    }
}
