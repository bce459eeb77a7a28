//! Foundation types for gated vessels.
//!
//! This crate provides the value model, type tags, identities and hashes
//! shared by every other vessel crate, plus the fixed error vocabulary.
//!
//! # Key Types
//!
//! - [`Value`] — primitive and aggregate values a vessel may hold
//! - [`TypeTag`] — runtime type of a held item (value kind or vessel kind)
//! - [`ItemType`] — a declared item-type constraint
//! - [`VesselId`] / [`ItemIdentity`] — stable identities
//! - [`EntryHash`] — content-derived registry key (BLAKE3)
//! - [`KeyDigest`] — digest of a lock key; the key itself is never stored
//! - [`VesselError`] — the seven failure kinds

pub mod error;
pub mod hash;
pub mod identity;
pub mod kind;
pub mod value;

pub use error::{VesselError, VesselResult};
pub use hash::{ContentHasher, EntryHash, KeyDigest};
pub use identity::{ItemIdentity, VesselId};
pub use kind::{ItemType, TypeTag, ValueKind, VesselKind};
pub use value::Value;
