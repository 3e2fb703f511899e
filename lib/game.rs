use crate::chess::{rules, Board, Color, Move, Square};
use std::time::Instant;
use tracing::{info, instrument, warn};

mod event;
mod notice;
mod selection;
mod snapshot;

pub use event::*;
pub use notice::*;
pub use selection::*;
pub use snapshot::*;

/// The turn state machine.
///
/// Players take turns designating squares, first to select one of their pieces, then to move
/// it. A rejected move leaves the board and the turn untouched, but clears the selection and
/// raises a [`Notice`].
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Game {
    board: Board,
    turn: Color,
    selection: Option<Selection>,
    notice: Option<Notice>,
}

impl Game {
    /// Starts a game from the given [`Board`] with `turn` to move.
    pub fn new(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            selection: None,
            notice: None,
        }
    }

    /// The current arrangement of pieces.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The currently selected piece, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Whether the side to move is yet to select a piece.
    pub fn phase(&self) -> Phase {
        self.selection.into()
    }

    /// The [`Notice`] raised by the last rejected move, unless expired by `now`.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }

    /// Discards the [`Notice`] if expired by `now`, returning whether one was discarded.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        match self.notice {
            Some(n) if n.is_expired(now) => {
                self.notice = None;
                true
            }

            _ => false,
        }
    }

    /// Designates a [`Square`], either to select a piece or to move the selected one there.
    #[instrument(level = "debug", skip(self, now), ret, fields(turn = %self.turn))]
    pub fn select_or_move(&mut self, square: Square, now: Instant) -> Event {
        let selection = match self.selection.take() {
            Some(selection) => selection,

            None => match self.board[square] {
                Some(piece) if piece.is_owned_by(self.turn) => {
                    let selection = Selection::new(square, piece);
                    self.selection = Some(selection);
                    self.notice = None;
                    return Event::Selected(selection);
                }

                _ => return Event::Ignored,
            },
        };

        let piece = selection.piece();
        let m = Move::new(selection.square(), square);

        if rules::is_legal(&self.board, m, piece) {
            self.board = self.board.play(m);
            self.turn = !self.turn;
            self.notice = None;

            let ply = Ply(piece, m);
            info!(%ply, turn = %self.turn);
            Event::Moved(ply)
        } else {
            self.notice = Some(Notice::new(now));

            let illegal = IllegalMove(piece, m);
            warn!(%illegal);
            Event::Rejected(illegal)
        }
    }

    /// The authoritative part of the state of this game.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.board, self.turn)
    }

    /// Replaces the state of this game unconditionally.
    ///
    /// The [`Snapshot`] is trusted, no attempt is made to check whether it follows from the
    /// current state.
    #[instrument(level = "debug", skip(self, snapshot), fields(%snapshot))]
    pub fn adopt(&mut self, snapshot: Snapshot) {
        *self = snapshot.into();
    }
}

impl From<Snapshot> for Game {
    fn from(s: Snapshot) -> Self {
        Game::new(s.board, s.turn)
    }
}
