use crate::game::Snapshot;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};
use std::str::FromStr;

/// A message exchanged over the synchronization channel, one per line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, rename_all = "lowercase")]
pub enum Message {
    /// Asks peers for the current state of the game.
    Request,

    /// The state of the game after the last committed move.
    State(Snapshot),
}

impl Message {
    /// Encodes this message as a single line of RON.
    pub fn encode(&self) -> Result<String, ron::Error> {
        ron::ser::to_string(self)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode().map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Message`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse message")]
pub struct ParseMessageError(ron::de::SpannedError);

impl FromStr for Message {
    type Err = ParseMessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}
