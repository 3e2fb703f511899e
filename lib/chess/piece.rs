use crate::chess::{Color, ParseRoleError, Role};
use derive_more::{Display, Error, From};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Formatter, Write};
use std::str::FromStr;

/// A chess [piece][`Role`] of a certain [`Color`].
///
/// Outside of this crate pieces are known by a single symbol, the lowercase [`Role`] letter
/// for black and its uppercase counterpart for white.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    role: Role,
    color: Color,
}

impl Piece {
    /// Constructs [`Piece`] from a pair of [`Role`] and [`Color`].
    pub const fn new(role: Role, color: Color) -> Self {
        Piece { role, color }
    }

    /// This piece's [`Role`].
    pub const fn role(&self) -> Role {
        self.role
    }

    /// This piece's [`Color`].
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Whether this piece may be moved by the side to play.
    pub fn is_owned_by(&self, turn: Color) -> bool {
        self.color == turn
    }

    /// Whether both pieces fight on the same side.
    pub fn is_ally_of(&self, other: &Piece) -> bool {
        self.color == other.color
    }

    /// The figurine glyph of this piece.
    pub fn figurine(&self) -> char {
        match (self.color, self.role) {
            (Color::White, Role::Pawn) => '♙',
            (Color::White, Role::Knight) => '♘',
            (Color::White, Role::Bishop) => '♗',
            (Color::White, Role::Rook) => '♖',
            (Color::White, Role::Queen) => '♕',
            (Color::White, Role::King) => '♔',
            (Color::Black, Role::Pawn) => '♟',
            (Color::Black, Role::Knight) => '♞',
            (Color::Black, Role::Bishop) => '♝',
            (Color::Black, Role::Rook) => '♜',
            (Color::Black, Role::Queen) => '♛',
            (Color::Black, Role::King) => '♚',
        }
    }
}

impl From<Piece> for char {
    fn from(p: Piece) -> char {
        let c = char::from(p.role);
        match p.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// The reason why converting a symbol into a [`Piece`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display(fmt = "unknown piece symbol")]
pub struct ParsePieceError(ParseRoleError);

impl TryFrom<char> for Piece {
    type Error = ParsePieceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Piece::new(c.to_ascii_lowercase().try_into()?, color))
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.try_into(),
            _ => Err(ParseRoleError.into()),
        }
    }
}

/// Prints the symbol by default and the figurine in alternate mode.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_char(self.figurine())
        } else {
            f.write_char((*self).into())
        }
    }
}

impl Serialize for Piece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char((*self).into())
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = char::deserialize(deserializer)?;
        Piece::try_from(c).map_err(de::Error::custom)
    }
}
