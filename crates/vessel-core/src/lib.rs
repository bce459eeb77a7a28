//! Lockable, named containers backed by one shared registry.
//!
//! A [`Vessel`] holds values (or, at the upper levels of the hierarchy,
//! other vessels). Every vessel and every item placed into one is recorded
//! in a [`Registry`] entry keyed by a content-derived [`EntryHash`]. Names
//! are unique across the whole registry.
//!
//! ```
//! use vessel_core::{Item, Registry, Vessel, VesselConfig};
//!
//! let registry = Registry::shared();
//! let b = Vessel::new_box(&registry, VesselConfig::named("shelf")).unwrap();
//! b.put("hello", Some("greeting"), None).unwrap();
//! b.lock("secret").unwrap();
//! assert!(b.use_item("greeting", None).is_err());
//! assert_eq!(b.use_item("greeting", Some("secret")).unwrap(), Item::from("hello"));
//! ```

pub mod config;
pub mod contents;
pub mod entry;
pub mod hierarchy;
pub mod item;
pub mod latch;
pub mod registry;
pub mod selector;
pub mod vessel;

pub use config::VesselConfig;
pub use contents::EntryList;
pub use entry::Entry;
pub use item::{Item, VesselRef};
pub use latch::LockState;
pub use registry::Registry;
pub use selector::{Selector, SelectorKind};
pub use vessel::Vessel;

pub use vessel_types::{
    EntryHash, ItemIdentity, ItemType, TypeTag, Value, ValueKind, VesselError, VesselId,
    VesselKind, VesselResult,
};
