use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Organizational-unit role marker carried in a leaf certificate subject.
///
/// Downstream network software classifies identities by these four OU values
/// (see the NodeOUs descriptor written into every identity archive), so the
/// rendered form must stay exactly as below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Client application identity
    Client,
    /// Peer node identity
    Peer,
    /// Organization administrator
    Admin,
    /// Ordering service node identity
    Orderer,
}

impl Role {
    /// Every role, in NodeOUs descriptor order.
    pub const ALL: [Self; 4] = [Self::Client, Self::Peer, Self::Admin, Self::Orderer];

    /// The OU value written into certificates.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Peer => "peer",
            Self::Admin => "admin",
            Self::Orderer => "orderer",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "peer" => Ok(Self::Peer),
            "admin" => Ok(Self::Admin),
            "orderer" => Ok(Self::Orderer),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
