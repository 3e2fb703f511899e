use derive_more::{Display, Error};
use std::fmt::{self, Formatter};
use std::{ops::Sub, str::FromStr};

/// A square of the board, addressed by row and column.
///
/// Row `0` is black's back rank and row `7` is white's, so that the square printed as `a8` is
/// at `(0, 0)` and `h1` is at `(7, 7)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Square {
    #[cfg_attr(test, strategy(0u8..8))]
    row: u8,
    #[cfg_attr(test, strategy(0u8..8))]
    col: u8,
}

impl Square {
    /// Constructs [`Square`] from its row and column.
    ///
    /// # Panics
    ///
    /// Panics if either `row` or `col` is not in the range (0..=7).
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "square out of the board");
        Square { row, col }
    }

    /// This square's row in the range (0..=7).
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// This square's column in the range (0..=7).
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// The square displaced by the given number of rows and columns, if still on the board.
    pub fn offset(&self, rows: i8, cols: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(rows)?;
        let col = self.col.checked_add_signed(cols)?;
        Square::try_from((row, col)).ok()
    }

    /// Returns an iterator over all [`Square`]s in row-major order.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..64u8).map(|i| Square::new(i / 8, i % 8))
    }
}

/// The displacement `(rows, cols)` from `rhs` to `self`.
impl Sub for Square {
    type Output = (i8, i8);

    fn sub(self, rhs: Self) -> Self::Output {
        (
            self.row as i8 - rhs.row as i8,
            self.col as i8 - rhs.col as i8,
        )
    }
}

/// The reason why converting [`Square`] from coordinates failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected row and column in the range `(0..=7)`")]
pub struct SquareOutOfRange;

impl TryFrom<(u8, u8)> for Square {
    type Error = SquareOutOfRange;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        if row < 8 && col < 8 {
            Ok(Square { row, col })
        } else {
            Err(SquareOutOfRange)
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col);
        let rank = char::from(b'8' - self.row);
        write!(f, "{file}{rank}")
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseSquareError {
    #[display(fmt = "expected lower case letter in the range `('a'..='h')`")]
    InvalidFile,
    #[display(fmt = "expected digit in the range `('1'..='8')`")]
    InvalidRank,
    #[display(fmt = "expected a file followed by a rank, as in `e2`")]
    InvalidLength,
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(ParseSquareError::InvalidLength),
        };

        if !('a'..='h').contains(&file) {
            return Err(ParseSquareError::InvalidFile);
        }

        if !('1'..='8').contains(&rank) {
            return Err(ParseSquareError::InvalidRank);
        }

        Ok(Square::new(b'8' - rank as u8, file as u8 - b'a'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_square_is_an_identity(s: Square) {
        assert_eq!(s.to_string().parse(), Ok(s));
    }

    #[proptest]
    fn parsing_square_fails_if_file_is_invalid(
        #[filter(!('a'..='h').contains(&#f))] f: char,
        #[strategy(1u8..=8)] r: u8,
    ) {
        assert_eq!(
            format!("{f}{r}").parse::<Square>(),
            Err(ParseSquareError::InvalidFile)
        );
    }

    #[proptest]
    fn parsing_square_fails_if_rank_is_invalid(
        #[strategy("[a-h]")] f: String,
        #[filter(!('1'..='8').contains(&#r))] r: char,
    ) {
        assert_eq!(
            format!("{f}{r}").parse::<Square>(),
            Err(ParseSquareError::InvalidRank)
        );
    }

    #[proptest]
    fn parsing_square_fails_if_length_is_not_two(#[filter(#s.chars().count() != 2)] s: String) {
        assert_eq!(s.parse::<Square>(), Err(ParseSquareError::InvalidLength));
    }

    #[test]
    fn rows_count_down_from_black_back_rank() {
        assert_eq!("a8".parse(), Ok(Square::new(0, 0)));
        assert_eq!("e2".parse(), Ok(Square::new(6, 4)));
        assert_eq!("h1".parse(), Ok(Square::new(7, 7)));
    }

    #[proptest]
    fn square_can_be_converted_from_coordinates(s: Square) {
        assert_eq!(Square::try_from((s.row(), s.col())), Ok(s));
    }

    #[proptest]
    fn converting_square_from_coordinates_out_of_range_fails(
        #[strategy(8u8..)] row: u8,
        col: u8,
    ) {
        assert_eq!(Square::try_from((row, col)), Err(SquareOutOfRange));
        assert_eq!(Square::try_from((col, row)), Err(SquareOutOfRange));
    }

    #[proptest]
    #[should_panic]
    fn new_panics_if_coordinates_out_of_range(#[strategy(8u8..)] row: u8, col: u8) {
        Square::new(row, col);
    }

    #[proptest]
    fn subtracting_squares_gives_displacement(a: Square, b: Square) {
        let (rows, cols) = a - b;
        assert_eq!(b.offset(rows, cols), Some(a));
    }

    #[proptest]
    fn offset_fails_off_the_board(s: Square) {
        assert_eq!(s.offset(8 - s.row() as i8, 0), None);
        assert_eq!(s.offset(0, -1 - s.col() as i8), None);
    }

    #[test]
    fn iter_visits_every_square_once_in_row_major_order() {
        let squares: Vec<_> = Square::iter().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares.first(), Some(&Square::new(0, 0)));
        assert_eq!(squares.last(), Some(&Square::new(7, 7)));
        assert!(squares.windows(2).all(|w| w[0] < w[1]));
    }
}
