use derive_more::{Display, Error, From};
use std::io;

mod message;
mod options;
mod relay;
mod session;

pub use message::*;
pub use options::*;
pub use relay::*;
pub use session::*;

/// The reason why the synchronization channel failed.
#[derive(Debug, Display, Error, From)]
pub enum SyncError {
    #[display(fmt = "the synchronization channel was interrupted")]
    Interrupted(io::Error),

    #[display(fmt = "failed to encode message")]
    Encoding(ron::Error),
}
