//! The three-level vessel hierarchy.
//!
//! A [`VesselKind::Box`] holds values, a [`VesselKind::Crate`] holds boxes
//! and a [`VesselKind::Container`] holds crates. The level defaults come
//! from [`VesselKind::default_item_type`]; a config can override them.

use std::sync::Arc;

use vessel_types::{VesselKind, VesselResult};

use crate::config::VesselConfig;
use crate::registry::Registry;
use crate::vessel::Vessel;

impl Vessel {
    /// A box: holds values of any kind unless configured otherwise.
    pub fn new_box(registry: &Arc<Registry>, config: VesselConfig) -> VesselResult<Self> {
        Self::new(registry, VesselKind::Box, config)
    }

    /// A crate: holds boxes.
    pub fn new_crate(registry: &Arc<Registry>, config: VesselConfig) -> VesselResult<Self> {
        Self::new(registry, VesselKind::Crate, config)
    }

    /// A container: holds crates.
    pub fn new_container(registry: &Arc<Registry>, config: VesselConfig) -> VesselResult<Self> {
        Self::new(registry, VesselKind::Container, config)
    }
}
