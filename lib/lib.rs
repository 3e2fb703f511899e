/// Chess domain types and movement rules.
pub mod chess;
/// The turn state machine shared by every front end.
pub mod game;
/// Keeping two boards identical over a message channel.
pub mod sync;
/// Assorted utilities.
pub mod util;
