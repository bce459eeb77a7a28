//! The primitive and aggregate values a vessel may hold.
//!
//! Equality and hashing are defined over a canonical byte encoding, so sets
//! and dicts compare independent of insertion order.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::kind::ValueKind;

const TAG_STR: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_FLOAT: u8 = 0x03;
const TAG_COMPLEX: u8 = 0x04;
const TAG_LIST: u8 = 0x10;
const TAG_TUPLE: u8 = 0x11;
const TAG_DICT: u8 = 0x12;
const TAG_SET: u8 = 0x13;
const TAG_FROZENSET: u8 = 0x14;

/// A value of one of the accepted primitive or aggregate kinds.
///
/// Values are plain owned data: putting one into a vessel stores an
/// independent deep copy, so later changes to the caller's value are never
/// observed inside the vessel.
#[derive(Clone, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Complex { re: f64, im: f64 },
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Set(Vec<Value>),
    FrozenSet(Vec<Value>),
}

impl Value {
    /// A string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// A complex number.
    pub fn complex(re: f64, im: f64) -> Self {
        Self::Complex { re, im }
    }

    /// A list, preserving order and duplicates.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// A tuple, preserving order and duplicates.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// A set; duplicate members are dropped.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Set(dedup(items.into_iter().map(Into::into)))
    }

    /// A frozen set; duplicate members are dropped.
    pub fn frozenset<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::FrozenSet(dedup(items.into_iter().map(Into::into)))
    }

    /// A dict. A repeated key keeps its first position and its last value.
    pub fn dict<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (k, v) in pairs {
            let (k, v) = (k.into(), v.into());
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Self::Dict(out)
    }

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Str(_) => ValueKind::Str,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Complex { .. } => ValueKind::Complex,
            Self::List(_) => ValueKind::List,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Dict(_) => ValueKind::Dict,
            Self::Set(_) => ValueKind::Set,
            Self::FrozenSet(_) => ValueKind::FrozenSet,
        }
    }

    /// Returns `true` for list, tuple, dict, set and frozenset values.
    pub fn is_aggregate(&self) -> bool {
        self.kind().is_aggregate()
    }

    /// The string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Deterministic, self-delimiting byte encoding.
    ///
    /// Set members and dict pairs are sorted by their own encoding, so two
    /// values are equal exactly when their encodings are equal.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Str(s) => {
                out.push(TAG_STR);
                out.extend_from_slice(&(s.len() as u64).to_le_bytes());
                out.extend_from_slice(s.as_bytes());
            }
            Self::Int(i) => {
                out.push(TAG_INT);
                out.extend_from_slice(&i.to_le_bytes());
            }
            Self::Float(f) => {
                out.push(TAG_FLOAT);
                out.extend_from_slice(&float_bytes(*f));
            }
            Self::Complex { re, im } => {
                out.push(TAG_COMPLEX);
                out.extend_from_slice(&float_bytes(*re));
                out.extend_from_slice(&float_bytes(*im));
            }
            Self::List(items) => encode_members(out, TAG_LIST, items.iter(), false),
            Self::Tuple(items) => encode_members(out, TAG_TUPLE, items.iter(), false),
            Self::Set(items) => encode_members(out, TAG_SET, items.iter(), true),
            Self::FrozenSet(items) => encode_members(out, TAG_FROZENSET, items.iter(), true),
            Self::Dict(pairs) => {
                let mut parts: Vec<Vec<u8>> = pairs
                    .iter()
                    .map(|(k, v)| {
                        let mut part = k.canonical_bytes();
                        v.encode(&mut part);
                        part
                    })
                    .collect();
                parts.sort();
                parts.dedup();
                write_parts(out, TAG_DICT, parts);
            }
        }
    }
}

fn dedup(values: impl Iterator<Item = Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Normalise signed zero and NaN payloads before taking the bits.
fn float_bytes(f: f64) -> [u8; 8] {
    let f = if f == 0.0 {
        0.0
    } else if f.is_nan() {
        f64::NAN
    } else {
        f
    };
    f.to_bits().to_le_bytes()
}

fn encode_members<'a>(
    out: &mut Vec<u8>,
    tag: u8,
    items: impl Iterator<Item = &'a Value>,
    unordered: bool,
) {
    let mut parts: Vec<Vec<u8>> = items.map(Value::canonical_bytes).collect();
    if unordered {
        parts.sort();
        parts.dedup();
    }
    write_parts(out, tag, parts);
}

fn write_parts(out: &mut Vec<u8>, tag: u8, parts: Vec<Vec<u8>>) {
    out.push(tag);
    out.extend_from_slice(&(parts.len() as u64).to_le_bytes());
    for part in parts {
        out.extend_from_slice(&part);
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bytes() == other.canonical_bytes()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.canonical_bytes());
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value::{:?}({self})", self.kind())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write_float(f, *x),
            Self::Complex { re, im } => {
                write!(f, "(")?;
                write_float(f, *re)?;
                if *im >= 0.0 || im.is_nan() {
                    write!(f, "+")?;
                }
                write_float(f, *im)?;
                write!(f, "j)")
            }
            Self::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Self::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Self::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Set(items) if items.is_empty() => write!(f, "set()"),
            Self::Set(items) => {
                write!(f, "{{")?;
                write_joined(f, items)?;
                write!(f, "}}")
            }
            Self::FrozenSet(items) if items.is_empty() => write!(f, "frozenset()"),
            Self::FrozenSet(items) => {
                write!(f, "frozenset({{")?;
                write_joined(f, items)?;
                write!(f, "}})")
            }
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}
