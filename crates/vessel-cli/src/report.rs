//! Snapshots of the registry for printing.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;
use vessel_core::{Item, LockState, Registry, ValueKind, VesselKind, VesselRef};

#[derive(Debug, Serialize)]
pub struct VesselReport {
    pub kind: VesselKind,
    pub name: Option<String>,
    pub id: String,
    pub state: LockState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub items: Vec<ItemReport>,
}

#[derive(Debug, Serialize)]
pub struct ItemReport {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(flatten)]
    pub content: ItemContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemContent {
    Value { kind: ValueKind, repr: String },
    Vessel(VesselReport),
}

impl VesselReport {
    /// Walk `vessel` and everything nested inside it.
    pub fn of(registry: &Registry, vessel: &VesselRef, hashes: bool) -> Self {
        let hash = hashes
            .then(|| registry.entry_of(vessel.id()))
            .flatten()
            .map(|e| e.hash().to_hex());
        let items = registry
            .entries_for(vessel.id())
            .iter()
            .map(|entry| ItemReport {
                name: entry.name().map(String::from),
                hash: hashes.then(|| entry.hash().to_hex()),
                content: match entry.item() {
                    Item::Value(value) => ItemContent::Value {
                        kind: value.kind(),
                        repr: value.to_string(),
                    },
                    Item::Vessel(nested) => ItemContent::Vessel(Self::of(registry, nested, hashes)),
                },
            })
            .collect();

        Self {
            kind: vessel.kind(),
            name: vessel.name(),
            id: vessel.id().to_string(),
            state: vessel.state(),
            hash,
            items,
        }
    }
}

/// Reports for every top-level vessel, in registration order.
pub fn registry_report(registry: &Registry, hashes: bool) -> Vec<VesselReport> {
    registry
        .top_level()
        .iter()
        .filter_map(|entry| entry.item().as_vessel())
        .map(|vessel| VesselReport::of(registry, vessel, hashes))
        .collect()
}

/// Indented tree, one line per vessel or item.
pub fn render_text(reports: &[VesselReport]) -> String {
    let mut out = String::new();
    for report in reports {
        render_vessel(&mut out, report, 0);
    }
    out
}

fn render_vessel(out: &mut String, report: &VesselReport, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = report.kind.label().bold();
    let name = report.name.as_deref().unwrap_or("(unnamed)");
    let state = match report.state {
        LockState::Open => "open".green(),
        LockState::Locked => "locked".red(),
    };
    let _ = write!(out, "{indent}{label} {} [{state}]", name.cyan());
    if let Some(hash) = &report.hash {
        let _ = write!(out, " {}", hash.dimmed());
    }
    out.push('\n');

    for item in &report.items {
        match &item.content {
            ItemContent::Vessel(nested) => render_vessel(out, nested, depth + 1),
            ItemContent::Value { kind, repr } => {
                let name = item.name.as_deref().unwrap_or("-");
                let _ = write!(out, "{indent}  {} = {repr} ({kind})", name.yellow());
                if let Some(hash) = &item.hash {
                    let _ = write!(out, " {}", hash.dimmed());
                }
                out.push('\n');
            }
        }
    }
}
