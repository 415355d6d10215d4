//! Relay resources and the store slots that back them.

use std::fmt;

/// An HTTP resource exposed by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The clipboard payload. GET reads it, PUT replaces it.
    Root,
    /// The password-derivation salt. GET reads it, PUT rotates it.
    Salt,
    /// Timestamp of the last successful PUT on [`Resource::Root`].
    LastUpdated,
}

impl Resource {
    /// URL path of this resource.
    pub const fn path(self) -> &'static str {
        match self {
            Resource::Root => "/",
            Resource::Salt => "/salt",
            Resource::LastUpdated => "/lastupdated",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Keys of the relay's ephemeral store.
///
/// The set is closed: the relay never stores anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Stored ciphertext (or plaintext when the sender used no key).
    Data,
    /// Current password salt.
    Salt,
    /// Unix nanoseconds of the last `Data` write.
    LastUpdated,
}

impl StoreKey {
    /// Name used in logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKey::Data => "data",
            StoreKey::Salt => "salt",
            StoreKey::LastUpdated => "lastUpdated",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
