use std::fmt;

use serde::{Deserialize, Serialize};
use vessel_types::{Value, VesselError, VesselResult};

use crate::contents::EntryList;
use crate::entry::Entry;
use crate::item::Item;

/// How `use_item`, `fetch` and `destroy` locate an entry.
///
/// Exactly one selector is given per lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// The entry carrying this name.
    Name(String),
    /// Position in the vessel's contents, `0..len`.
    Index(i64),
    /// The first entry whose item equals this one.
    Item(Item),
}

/// Selector kind for [`Selector::from_value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    Name,
    Index,
    Item,
}

impl Selector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn index(index: i64) -> Self {
        Self::Index(index)
    }

    pub fn item(item: impl Into<Item>) -> Self {
        Self::Item(item.into())
    }

    /// Build a selector from an untyped value.
    ///
    /// A name must be a string and an index an integer; anything else is a
    /// [`VesselError::Type`].
    pub fn from_value(kind: SelectorKind, value: Value) -> VesselResult<Self> {
        match (kind, value) {
            (SelectorKind::Name, Value::Str(s)) => Ok(Self::Name(s)),
            (SelectorKind::Index, Value::Int(i)) => Ok(Self::Index(i)),
            (SelectorKind::Item, v) => Ok(Self::Item(Item::Value(v))),
            (SelectorKind::Name, other) => Err(VesselError::Type(format!(
                "expected name of type str, got {}",
                other.kind()
            ))),
            (SelectorKind::Index, other) => Err(VesselError::Type(format!(
                "expected index of type int, got {}",
                other.kind()
            ))),
        }
    }

    /// Locate the selected entry in `entries`.
    pub(crate) fn locate<'a>(&self, entries: &'a EntryList) -> VesselResult<&'a Entry> {
        match self {
            Self::Name(name) => entries
                .find_name(name)
                .ok_or_else(|| VesselError::Access(format!("no item named '{name}'"))),
            Self::Index(index) => usize::try_from(*index)
                .ok()
                .and_then(|i| entries.get(i))
                .ok_or_else(|| {
                    VesselError::Access(format!(
                        "index {index} out of range for {} items",
                        entries.len()
                    ))
                }),
            Self::Item(item) => entries
                .find_item(item)
                .ok_or_else(|| VesselError::Access(format!("vessel does not hold {item}"))),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name={name:?}"),
            Self::Index(index) => write!(f, "index={index}"),
            Self::Item(item) => write!(f, "item={item}"),
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
