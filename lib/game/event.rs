use crate::chess::{Move, Piece};
use crate::game::Selection;
use derive_more::{Display, From};

/// A [`Move`] committed by one of the players.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}{}", _0, _1)]
pub struct Ply(pub Piece, pub Move);

/// Represents an attempt to move a piece against the rules.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "`{}` may not move `{}`", _0, _1)]
pub struct IllegalMove(pub Piece, pub Move);

/// The outcome of designating a square.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, From)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Event {
    /// Nothing happened, the square did not hold a piece of the side to move.
    #[display(fmt = "ignored")]
    #[from(ignore)]
    Ignored,

    /// A piece was selected.
    #[display(fmt = "selected {}", _0)]
    Selected(Selection),

    /// The selected piece was moved and the turn passed to the opponent.
    #[display(fmt = "played {}", _0)]
    Moved(Ply),

    /// The selected piece could not be moved there.
    #[display(fmt = "{}", _0)]
    Rejected(IllegalMove),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn event_can_be_converted_from_ply(p: Ply) {
        assert_eq!(Event::from(p), Event::Moved(p));
    }

    #[proptest]
    fn event_can_be_converted_from_illegal_move(im: IllegalMove) {
        assert_eq!(Event::from(im), Event::Rejected(im));
    }

    #[proptest]
    fn ply_is_printed_as_piece_followed_by_move(p: Ply) {
        assert_eq!(p.to_string(), format!("{}{}", p.0, p.1));
    }
}
