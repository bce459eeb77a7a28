//! TOML manifests describing vessels and their contents.
//!
//! ```toml
//! [[vessel]]
//! kind = "crate"
//! name = "pantry"
//!
//! [[vessel]]
//! kind = "box"
//! name = "jar"
//! parent = "pantry"
//! lock = "lid"
//!
//! [[item]]
//! vessel = "jar"
//! name = "primes"
//! value = { set = [2, 3, 5, 7] }
//! ```
//!
//! Items are placed first, then vessels are nested under their parents,
//! then locks are applied.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use vessel_core::{ItemType, Registry, Value, Vessel, VesselConfig, VesselKind};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "vessel")]
    pub vessels: Vec<VesselSpec>,
    #[serde(default, rename = "item")]
    pub items: Vec<ItemSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VesselSpec {
    pub kind: VesselKind,
    pub name: String,
    #[serde(default)]
    pub item_type: Option<ItemType>,
    #[serde(default)]
    pub lock: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    pub vessel: String,
    #[serde(default)]
    pub name: Option<String>,
    pub value: toml::Value,
}

/// Vessels built from a manifest, in manifest order.
pub struct Loaded {
    pub registry: Arc<Registry>,
    pub vessels: Vec<Vessel>,
}

impl Loaded {
    pub fn vessel(&self, name: &str) -> Option<&Vessel> {
        self.vessels
            .iter()
            .find(|v| v.name().as_deref() == Some(name))
    }
}

impl Manifest {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid manifest")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Build every vessel into a fresh registry.
    pub fn build(&self) -> anyhow::Result<Loaded> {
        let registry = Registry::shared();
        let mut vessels = Vec::with_capacity(self.vessels.len());
        for spec in &self.vessels {
            let config = VesselConfig {
                name: Some(spec.name.clone()),
                item_type: spec.item_type,
            };
            let vessel = Vessel::new(&registry, spec.kind, config)
                .with_context(|| format!("creating {} '{}'", spec.kind, spec.name))?;
            vessels.push(vessel);
        }

        let lookup = |name: &str| -> anyhow::Result<&Vessel> {
            self.vessels
                .iter()
                .position(|s| s.name == name)
                .map(|i| &vessels[i])
                .ok_or_else(|| anyhow!("unknown vessel '{name}'"))
        };

        for (index, item) in self.items.iter().enumerate() {
            let target = lookup(&item.vessel).with_context(|| format!("item #{index}"))?;
            let value = to_value(&item.value)
                .with_context(|| format!("item #{index} in '{}'", item.vessel))?;
            target
                .put(value, item.name.as_deref(), None)
                .with_context(|| format!("item #{index} in '{}'", item.vessel))?;
        }

        for spec in &self.vessels {
            if let Some(parent) = &spec.parent {
                let child = lookup(&spec.name)?;
                lookup(parent)
                    .and_then(|p| p.put(child, None, None).map_err(anyhow::Error::from))
                    .with_context(|| format!("nesting '{}' in '{parent}'", spec.name))?;
            }
        }

        for spec in &self.vessels {
            if let Some(key) = &spec.lock {
                lookup(&spec.name)?
                    .lock(key)
                    .with_context(|| format!("locking '{}'", spec.name))?;
            }
        }

        Ok(Loaded { registry, vessels })
    }
}

/// Convert a TOML value into a storable [`Value`].
///
/// Strings, integers, floats and arrays map directly (arrays become lists);
/// tables become dicts. A single-key table tagged `set`, `frozenset`,
/// `tuple`, `complex` or `dict` selects that kind explicitly.
pub fn to_value(raw: &toml::Value) -> anyhow::Result<Value> {
    Ok(match raw {
        toml::Value::String(s) => Value::Str(s.clone()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(x) => Value::Float(*x),
        toml::Value::Array(items) => Value::List(convert_all(items)?),
        toml::Value::Table(table) => table_value(table)?,
        toml::Value::Boolean(_) => bail!("booleans cannot be stored; use 0 or 1"),
        toml::Value::Datetime(_) => bail!("datetimes cannot be stored; use a string"),
    })
}

fn convert_all(items: &[toml::Value]) -> anyhow::Result<Vec<Value>> {
    items.iter().map(to_value).collect()
}

fn table_value(table: &toml::Table) -> anyhow::Result<Value> {
    let mut iter = table.iter();
    let (Some((tag, inner)), None) = (iter.next(), iter.next()) else {
        return plain_dict(table);
    };
    match tag.as_str() {
        "set" => Ok(Value::set(array(tag, inner)?)),
        "frozenset" => Ok(Value::frozenset(array(tag, inner)?)),
        "tuple" => Ok(Value::Tuple(array(tag, inner)?)),
        "complex" => match inner.as_array().map(Vec::as_slice) {
            Some([re, im]) => Ok(Value::complex(number(re)?, number(im)?)),
            _ => bail!("complex takes [re, im]"),
        },
        "dict" => match inner {
            toml::Value::Table(t) => plain_dict(t),
            other => bail!("dict takes a table, got {}", other.type_str()),
        },
        _ => plain_dict(table),
    }
}

fn array(tag: &str, inner: &toml::Value) -> anyhow::Result<Vec<Value>> {
    match inner {
        toml::Value::Array(items) => convert_all(items),
        other => bail!("{tag} takes an array, got {}", other.type_str()),
    }
}

fn number(raw: &toml::Value) -> anyhow::Result<f64> {
    match raw {
        toml::Value::Integer(i) => Ok(*i as f64),
        toml::Value::Float(x) => Ok(*x),
        other => bail!("expected a number, got {}", other.type_str()),
    }
}

fn plain_dict(table: &toml::Table) -> anyhow::Result<Value> {
    let pairs = table
        .iter()
        .map(|(k, v)| Ok((Value::str(k), to_value(v)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Value::dict(pairs))
}
