use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Last-modified signal of a file set: seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[inline]
    pub const fn secs(self) -> u64 {
        self.0
    }

    /// Parse the `lm` query value; empty or malformed means unavailable.
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| s.parse().ok())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
