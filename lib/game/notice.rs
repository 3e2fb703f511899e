use derive_more::Display;
use std::time::{Duration, Instant};

/// A short lived message for the player who attempted an illegal move.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[display(fmt = "{}", "Notice::MESSAGE")]
pub struct Notice {
    raised: Instant,
}

impl Notice {
    /// What the player is told.
    pub const MESSAGE: &'static str = "Invalid move! Try again.";

    /// How long a notice remains visible.
    pub const TTL: Duration = Duration::from_secs(3);

    /// Raises a notice at the given instant.
    pub fn new(raised: Instant) -> Self {
        Notice { raised }
    }

    /// The instant this notice expires.
    pub fn expires(&self) -> Instant {
        self.raised + Self::TTL
    }

    /// Whether this notice has expired by `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires()
    }
}
