use crate::chess::{Piece, Square};
use derive_more::{Constructor, Display};

/// The piece a player designated as the one to move next.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Constructor)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}{}", piece, square)]
pub struct Selection {
    square: Square,
    piece: Piece,
}

impl Selection {
    /// Where the selected piece stands.
    pub fn square(&self) -> Square {
        self.square
    }

    /// The selected piece.
    pub fn piece(&self) -> Piece {
        self.piece
    }
}

/// Whether a player is yet to select a piece, or about to move it.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Phase {
    #[display(fmt = "awaiting selection")]
    AwaitingSelection,
    #[display(fmt = "{} selected", _0)]
    PieceSelected(Selection),
}

impl From<Option<Selection>> for Phase {
    fn from(s: Option<Selection>) -> Self {
        s.map_or(Phase::AwaitingSelection, Phase::PieceSelected)
    }
}
