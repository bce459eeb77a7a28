use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a [`Value`](crate::Value).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Complex,
    List,
    Tuple,
    Dict,
    Set,
    FrozenSet,
}

impl ValueKind {
    /// Every accepted value kind.
    pub const ALL: [ValueKind; 9] = [
        Self::Str,
        Self::Int,
        Self::Float,
        Self::Complex,
        Self::List,
        Self::Tuple,
        Self::Dict,
        Self::Set,
        Self::FrozenSet,
    ];

    /// Aggregate kinds are deep-copied on `put` and get a fresh identity.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            Self::List | Self::Tuple | Self::Dict | Self::Set | Self::FrozenSet
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Complex => "complex",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Dict => "dict",
            Self::Set => "set",
            Self::FrozenSet => "frozenset",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three levels of the vessel hierarchy.
///
/// A box holds values, a crate holds boxes, a container holds crates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselKind {
    Box,
    Crate,
    Container,
}

impl VesselKind {
    /// Label used when rendering an unnamed vessel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Crate => "Crate",
            Self::Container => "Container",
        }
    }

    /// Constraint applied when the caller supplies none.
    ///
    /// `None` for a box means "any accepted value kind".
    pub fn default_item_type(self) -> Option<ItemType> {
        match self {
            Self::Box => None,
            Self::Crate => Some(ItemType::Vessel(Self::Box)),
            Self::Container => Some(ItemType::Vessel(Self::Crate)),
        }
    }
}

impl fmt::Display for VesselKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runtime type of an item held in a vessel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Value(ValueKind),
    Vessel(VesselKind),
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(kind) => write!(f, "{kind}"),
            Self::Vessel(kind) => write!(f, "{kind}"),
        }
    }
}

/// A declared item-type constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Any primitive or aggregate value.
    AnyValue,
    /// Values of exactly this kind.
    Value(ValueKind),
    /// Any vessel, whatever its level.
    AnyVessel,
    /// Vessels of exactly this kind.
    Vessel(VesselKind),
}

impl ItemType {
    /// Returns `true` if an item tagged `tag` satisfies this constraint.
    pub fn admits(&self, tag: TypeTag) -> bool {
        match (self, tag) {
            (Self::AnyValue, TypeTag::Value(_)) => true,
            (Self::Value(want), TypeTag::Value(got)) => *want == got,
            (Self::AnyVessel, TypeTag::Vessel(_)) => true,
            (Self::Vessel(want), TypeTag::Vessel(got)) => *want == got,
            _ => false,
        }
    }

    /// Check `tag` against an optional constraint; `None` admits values only.
    pub fn admits_optional(constraint: Option<&ItemType>, tag: TypeTag) -> bool {
        constraint.unwrap_or(&Self::AnyValue).admits(tag)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyValue => {
                let names: Vec<&str> = ValueKind::ALL.iter().map(|k| k.name()).collect();
                write!(f, "one of [{}]", names.join(", "))
            }
            Self::Value(kind) => write!(f, "{kind}"),
            Self::AnyVessel => f.write_str("any vessel"),
            Self::Vessel(kind) => write!(f, "{kind}"),
        }
    }
}
