use crate::chess::{Board, Color};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// The authoritative state of a game, as exchanged between peers.
#[derive(
    Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Constructor, Deserialize, Serialize,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{} {}", board, turn)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// The arrangement of pieces.
    pub board: Board,
    /// The side to move.
    pub turn: Color,
}
