use crate::chess::{Move, ParsePieceError, Piece, Square};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter, Write};
use std::{ops::Index, str::FromStr};

/// The arrangement of [`Piece`]s on the board.
///
/// This type does not validate whether the arrangement it holds could be reached by any
/// sequence of moves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Board([[Option<Piece>; 8]; 8]);

// We provide a custom implementation of Arbitrary rather than deriving,
// otherwise proptest overflows the stack generating large arrays.
#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Board {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Board>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::{collection::vec, prelude::*};

        vec(any::<Option<Piece>>(), 64)
            .prop_map(|v| {
                let mut board = Board::empty();

                board
                    .0
                    .iter_mut()
                    .flatten()
                    .zip(v)
                    .for_each(|(s, p)| *s = p);

                board
            })
            .boxed()
    }
}

impl Board {
    /// A board without any pieces.
    pub const fn empty() -> Self {
        Board([[None; 8]; 8])
    }

    /// The [`Piece`] on a [`Square`], if any.
    pub fn piece_at(&self, s: Square) -> Option<Piece> {
        self.0[s.row() as usize][s.col() as usize]
    }

    /// Whether a [`Square`] is empty.
    pub fn is_empty_at(&self, s: Square) -> bool {
        self.piece_at(s).is_none()
    }

    /// Iterates over the occupied [`Square`]s in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|s| Some((s, self.piece_at(s)?)))
    }

    /// The board that results from moving whatever stands on the origin onto the destination.
    ///
    /// Whatever stood on the destination is discarded. Whether the [`Move`] is legal is not
    /// checked, see [`rules::is_legal`][`crate::chess::rules::is_legal`].
    pub fn play(&self, m: Move) -> Self {
        let mut next = *self;
        let piece = next.take(m.whence());
        next.put(m.whither(), piece);
        next
    }

    /// Returns a copy of this board with a [`Square`]'s content replaced.
    pub fn with(mut self, s: Square, p: Option<Piece>) -> Self {
        self.put(s, p);
        self
    }

    fn take(&mut self, s: Square) -> Option<Piece> {
        self.0[s.row() as usize][s.col() as usize].take()
    }

    fn put(&mut self, s: Square, p: Option<Piece>) {
        self.0[s.row() as usize][s.col() as usize] = p;
    }
}

/// The standard starting position.
impl Default for Board {
    fn default() -> Self {
        use crate::chess::{Color::*, Role::*};

        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        Board::empty()
            .with_row(0, back.map(|r| Some(Piece::new(r, Black))))
            .with_row(1, [Some(Piece::new(Pawn, Black)); 8])
            .with_row(6, [Some(Piece::new(Pawn, White)); 8])
            .with_row(7, back.map(|r| Some(Piece::new(r, White))))
    }
}

impl Board {
    fn with_row(mut self, row: usize, pieces: [Option<Piece>; 8]) -> Self {
        self.0[row] = pieces;
        self
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, s: Square) -> &Self::Output {
        &self.0[s.row() as usize][s.col() as usize]
    }
}

/// Prints the piece placement field of the FEN notation by default, and a framed diagram of
/// figurines in alternate mode.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return self.diagram(f);
        }

        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char('/')?;
            }

            let mut empty = 0;
            for square in row {
                match square {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }

                        write!(f, "{p}")?;
                    }
                }
            }

            if empty > 0 {
                write!(f, "{empty}")?;
            }
        }

        Ok(())
    }
}

impl Board {
    fn diagram(&self, f: &mut Formatter<'_>) -> fmt::Result {
        const FILES: &str = "     a   b   c   d   e   f   g   h";
        const RULE: &str = "   +---+---+---+---+---+---+---+---+";

        writeln!(f, "{FILES}")?;
        writeln!(f, "{RULE}")?;

        for (i, row) in self.0.iter().enumerate() {
            let rank = 8 - i;
            write!(f, " {rank} |")?;

            for square in row {
                match square {
                    Some(p) => write!(f, " {p:#} |")?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {rank}")?;
            writeln!(f, "{RULE}")?;
        }

        write!(f, "{FILES}")
    }
}

/// The reason why parsing [`Board`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse board; {}")]
pub enum ParseBoardError {
    #[display(fmt = "expected 8 rows separated by `/`")]
    #[from(ignore)]
    WrongNumberOfRows,

    #[display(fmt = "expected 8 squares in row {}", _0)]
    #[from(ignore)]
    WrongNumberOfSquares(#[error(not(source))] usize),

    #[display(fmt = "invalid piece")]
    InvalidPiece(ParsePieceError),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseBoardError::*;

        let rows: Vec<_> = s.split('/').collect();
        if rows.len() != 8 {
            return Err(WrongNumberOfRows);
        }

        let mut board = Board::empty();

        for (i, row) in rows.into_iter().enumerate() {
            let mut squares = Vec::with_capacity(8);

            for c in row.chars() {
                match c.to_digit(10) {
                    Some(n @ 1..=8) => squares.extend((0..n).map(|_| None)),
                    _ => squares.push(Some(Piece::try_from(c)?)),
                }
            }

            board.0[i] = squares.try_into().map_err(|_| WrongNumberOfSquares(i))?;
        }

        Ok(board)
    }
}
