use thiserror::Error;

/// The fixed vocabulary of vessel failures.
///
/// Every operation fails fast with exactly one of these kinds; nothing is
/// retried internally.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VesselError {
    /// The vessel is locked and no key was supplied, or `lock` got an
    /// unusable key.
    #[error("lock error: {0}")]
    Lock(String),

    /// Wrong key, or an attempt to reset a key that is already set.
    #[error("key error: {0}")]
    Key(String),

    /// An item or lookup selector has the wrong type.
    #[error("type error: {0}")]
    Type(String),

    /// A vessel's own name collides with an existing name.
    #[error("name error: {0}")]
    Name(String),

    /// A name or identity collision on `put`, `setname` or `rename`.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A lookup found nothing, or an index is out of range.
    #[error("access error: {0}")]
    Access(String),

    /// Internal bookkeeping was bypassed or is inconsistent.
    #[error("implementation error: {0}")]
    Implementation(String),
}

impl VesselError {
    /// Short kind label, e.g. `"lock"` or `"duplicate"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lock(_) => "lock",
            Self::Key(_) => "key",
            Self::Type(_) => "type",
            Self::Name(_) => "name",
            Self::Duplicate(_) => "duplicate",
            Self::Access(_) => "access",
            Self::Implementation(_) => "implementation",
        }
    }
}

/// Result alias for vessel operations.
pub type VesselResult<T> = Result<T, VesselError>;
