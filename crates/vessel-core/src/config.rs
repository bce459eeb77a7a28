use serde::{Deserialize, Serialize};
use vessel_types::{ItemType, VesselKind};

/// Construction options for a vessel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VesselConfig {
    /// The vessel's own name, unique across the registry.
    #[serde(default)]
    pub name: Option<String>,
    /// Item-type constraint. When absent the hierarchy level's default
    /// applies: any value for a box, boxes for a crate, crates for a
    /// container.
    #[serde(default)]
    pub item_type: Option<ItemType>,
}

impl VesselConfig {
    /// A config carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            item_type: None,
        }
    }

    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// The constraint a vessel of `kind` built from this config enforces.
    pub fn effective_item_type(&self, kind: VesselKind) -> Option<ItemType> {
        self.item_type.or_else(|| kind.default_item_type())
    }
}
