use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Stable identity of a connected actor.
///
/// Assigned by the host when the underlying connection is accepted and
/// reused for the whole connection lifetime. A reconnect may reuse the same
/// id (e.g. a persistent account id) or mint a fresh one; the gate only
/// requires that the id is unique among currently connected actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(Uuid);

impl ActorId {
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Mint a random id, used by hosts that key sessions by connection
    /// rather than by account.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum ActorIdError {
    #[error("malformed actor id: {0}")]
    Malformed(#[from] uuid::Error),
}

impl FromStr for ActorId {
    type Err = ActorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
