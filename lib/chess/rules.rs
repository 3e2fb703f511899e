//! Pseudo-legal movement rules.
//!
//! A move is legal here if it fits the shape of the piece's movement, its path is not
//! obstructed, and it does not capture an ally. Whether the mover's king is left in check is
//! never considered, neither are castling, en passant, nor promotions.

use crate::chess::{Board, Move, Piece, Role, Square};
use arrayvec::ArrayVec;
use tracing::instrument;

/// The most squares any single piece can reach, a queen in the center of an empty board.
pub const MAX_DESTINATIONS: usize = 27;

/// Whether `piece` may be moved according to [`Move`] on this [`Board`].
///
/// The piece is not required to actually stand on the origin square.
#[instrument(level = "trace", ret, fields(%board, %m, %piece))]
pub fn is_legal(board: &Board, m: Move, piece: Piece) -> bool {
    if let Some(target) = board[m.whither()] {
        if target.is_ally_of(&piece) {
            return false;
        }
    }

    match piece.role() {
        Role::Pawn => is_legal_pawn_move(board, m, piece),
        Role::Knight => is_legal_knight_move(m),
        Role::Bishop => is_legal_bishop_move(board, m),
        Role::Rook => is_legal_rook_move(board, m),
        Role::Queen => is_legal_rook_move(board, m) || is_legal_bishop_move(board, m),
        Role::King => is_legal_king_move(m),
    }
}

/// Every other [`Square`] `piece` may legally reach from `whence`.
pub fn destinations(
    board: &Board,
    whence: Square,
    piece: Piece,
) -> ArrayVec<Square, MAX_DESTINATIONS> {
    Square::iter()
        .filter(|&whither| whither != whence)
        .filter(|&whither| is_legal(board, Move::new(whence, whither), piece))
        .collect()
}

fn is_legal_pawn_move(board: &Board, m: Move, piece: Piece) -> bool {
    let color = piece.color();
    let direction = color.pawn_direction();
    let (rows, cols) = m.whither() - m.whence();

    match (rows, cols.abs()) {
        (r, 0) if r == direction => board.is_empty_at(m.whither()),

        (r, 0) if r == 2 * direction && m.whence().row() == color.pawn_row() => {
            let skipped = m.whence().offset(direction, 0);
            skipped.map_or(false, |s| board.is_empty_at(s)) && board.is_empty_at(m.whither())
        }

        (r, 1) if r == direction => !board.is_empty_at(m.whither()),

        _ => false,
    }
}

fn is_legal_knight_move(m: Move) -> bool {
    let (rows, cols) = m.whither() - m.whence();
    matches!((rows.abs(), cols.abs()), (2, 1) | (1, 2))
}

fn is_legal_bishop_move(board: &Board, m: Move) -> bool {
    let (rows, cols) = m.whither() - m.whence();
    rows.abs() == cols.abs() && is_path_clear(board, m)
}

fn is_legal_rook_move(board: &Board, m: Move) -> bool {
    let (rows, cols) = m.whither() - m.whence();
    (rows == 0 || cols == 0) && is_path_clear(board, m)
}

fn is_legal_king_move(m: Move) -> bool {
    let (rows, cols) = m.whither() - m.whence();
    rows.abs() <= 1 && cols.abs() <= 1
}

/// Whether every square strictly between the origin and destination is empty.
///
/// Assumes the move lies along a line or a diagonal.
fn is_path_clear(board: &Board, m: Move) -> bool {
    let (rows, cols) = m.whither() - m.whence();
    let step = (rows.signum(), cols.signum());

    let mut current = m.whence();
    while let Some(next) = current.offset(step.0, step.1) {
        if next == m.whither() {
            return true;
        } else if !board.is_empty_at(next) {
            return false;
        }

        current = next;
    }

    true
}
