//! Lock/key state machine.
//!
//! ```text
//!   Open --lock(k)--> Locked --open(k)--> Open
//! ```
//!
//! The key is write-once: once a vessel has been locked, no later `lock`
//! can store another key, and a vessel that has been opened again cannot be
//! re-locked. Only the digest of the key is kept.

use std::fmt;

use serde::{Deserialize, Serialize};
use vessel_types::{KeyDigest, VesselError, VesselResult};

/// Observable lock state of a vessel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Open,
    Locked,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Locked => f.write_str("locked"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Latch {
    open: bool,
    key: Option<KeyDigest>,
}

impl Latch {
    pub(crate) fn new() -> Self {
        Self {
            open: true,
            key: None,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn state(&self) -> LockState {
        if self.open {
            LockState::Open
        } else {
            LockState::Locked
        }
    }

    pub(crate) fn lock(&mut self, key: &str) -> VesselResult<()> {
        if key.is_empty() {
            return Err(VesselError::Lock("provide a non-empty key to lock".into()));
        }
        if self.key.is_some() {
            return Err(VesselError::Key("keys cannot be reset".into()));
        }
        self.key = Some(KeyDigest::of(key));
        self.open = false;
        Ok(())
    }

    /// Opening an open vessel always succeeds; the key is ignored.
    pub(crate) fn open(&mut self, key: Option<&str>) -> VesselResult<()> {
        self.check(key)?;
        self.open = true;
        Ok(())
    }

    /// The gate every guarded operation passes first.
    pub(crate) fn check(&self, key: Option<&str>) -> VesselResult<()> {
        if self.open {
            return Ok(());
        }
        let Some(key) = key else {
            return Err(VesselError::Lock(
                "vessel is locked; provide a key to unlock".into(),
            ));
        };
        match &self.key {
            Some(digest) if digest.matches(key) => Ok(()),
            Some(_) => Err(VesselError::Key("wrong key".into())),
            None => Err(VesselError::Implementation(
                "locked vessel has no key".into(),
            )),
        }
    }
}
