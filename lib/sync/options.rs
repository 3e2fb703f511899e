use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};
use std::{str::FromStr, time::Duration};

#[cfg(test)]
use proptest::prelude::*;

/// Configuration for the synchronization [`Session`][`crate::sync::Session`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, default)]
pub struct Options {
    /// How long to wait for a peer to share the state of the game before starting a new one.
    #[cfg_attr(test, strategy((0u64..3_600_000).prop_map(Duration::from_millis)))]
    #[serde(with = "humantime_serde")]
    pub handshake: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            handshake: Duration::from_secs(2),
        }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Options`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse synchronization options")]
pub struct ParseOptionsError(ron::de::SpannedError);

impl FromStr for Options {
    type Err = ParseOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}
