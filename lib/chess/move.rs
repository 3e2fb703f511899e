use crate::chess::{ParseSquareError, Square};
use derive_more::{Constructor, Display, Error};
use std::str::FromStr;

/// A chess move, in pure coordinate notation.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Constructor)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}{}", whence, whither)]
pub struct Move {
    whence: Square,
    whither: Square,
}

impl Move {
    /// The source [`Square`].
    pub fn whence(&self) -> Square {
        self.whence
    }

    /// The destination [`Square`].
    pub fn whither(&self) -> Square {
        self.whither
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse move; {}")]
pub enum ParseMoveError {
    #[display(fmt = "invalid 'from' square")]
    InvalidFromSquare(ParseSquareError),

    #[display(fmt = "invalid 'to' square")]
    InvalidToSquare(ParseSquareError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseMoveError::*;

        let i = s.char_indices().nth(2).map_or_else(|| s.len(), |(i, _)| i);

        Ok(Move {
            whence: s[..i].parse().map_err(InvalidFromSquare)?,
            whither: s[i..].parse().map_err(InvalidToSquare)?,
        })
    }
}
