use crate::chess::Square;
use crate::game::{Event, Game, Snapshot};
use crate::sync::{Message, Options, SyncError};
use crate::util::Io;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// A [`Game`] kept in sync with peers over an [`Io`] channel.
///
/// Every move committed locally is broadcast as a [`Message::State`], and every state
/// received is adopted as is.
#[derive(Debug)]
pub struct Session<I: Io> {
    io: I,
    game: Game,
}

impl<I: Io> Session<I> {
    /// Joins the game shared by the peers on the other end of `io`.
    ///
    /// Starts a new game from the standard position if no peer answers within
    /// [`Options::handshake`].
    #[instrument(level = "debug", skip(io), err)]
    pub async fn connect(mut io: I, options: Options) -> Result<Self, SyncError> {
        Self::send(&mut io, Message::Request).await?;

        let snapshot = match timeout(options.handshake, Self::seed(&mut io)).await {
            Ok(snapshot) => snapshot?,
            Err(_) => {
                info!("no peer answered, starting a new game");
                Snapshot::default()
            }
        };

        Ok(Session {
            io,
            game: snapshot.into(),
        })
    }

    /// The local replica of the game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Designates a [`Square`] in the local replica, broadcasting the state if a move is
    /// committed.
    #[instrument(level = "debug", skip(self, now), ret, err)]
    pub async fn designate(&mut self, square: Square, now: Instant) -> Result<Event, SyncError> {
        let event = self.game.select_or_move(square, now);

        if let Event::Moved(_) = event {
            let snapshot = self.game.snapshot();
            Self::send(&mut self.io, Message::State(snapshot)).await?;
        }

        Ok(event)
    }

    /// Discards the notice if expired by `now`, see [`Game::expire_notice`].
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        self.game.expire_notice(now)
    }

    /// Waits for the next well formed [`Message`], skipping anything else.
    pub async fn recv(&mut self) -> Result<Message, SyncError> {
        Self::read(&mut self.io).await
    }

    /// Reacts to a [`Message`] received from a peer.
    #[instrument(level = "debug", skip(self, msg), fields(%msg), err)]
    pub async fn handle(&mut self, msg: Message) -> Result<(), SyncError> {
        match msg {
            Message::State(snapshot) => {
                self.game.adopt(snapshot);
                info!(%snapshot, "adopted remote state");
            }

            Message::Request => {
                let snapshot = self.game.snapshot();
                Self::send(&mut self.io, Message::State(snapshot)).await?;
            }
        }

        Ok(())
    }

    async fn seed(io: &mut I) -> Result<Snapshot, SyncError> {
        loop {
            match Self::read(io).await? {
                Message::State(snapshot) => break Ok(snapshot),
                Message::Request => debug!("ignored request while joining"),
            }
        }
    }

    async fn read(io: &mut I) -> Result<Message, SyncError> {
        loop {
            let line = io.recv().await?;
            match line.parse() {
                Ok(msg) => break Ok(msg),
                Err(e) => warn!(%line, "ignored malformed message; {}", e),
            }
        }
    }

    async fn send(io: &mut I, msg: Message) -> Result<(), SyncError> {
        io.send(&msg.encode()?).await?;
        io.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Board, Color};
    use crate::util::{MockIo, Pipe};
    use mockall::Sequence;
    use std::{io, time::Duration};
    use test_strategy::proptest;
    use tokio::{io::duplex, runtime};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn joined(io: MockIo, s: Snapshot) -> Session<MockIo> {
        Session { io, game: s.into() }
    }

    #[proptest]
    fn connect_adopts_first_state_received(s: Snapshot) {
        let rt = runtime::Builder::new_multi_thread().enable_time().build()?;
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(|msg| msg == Message::Request.to_string())
            .returning(|_| Ok(()));

        io.expect_flush()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        io.expect_recv()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok("garbage".to_string()));

        io.expect_recv()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(Message::Request.to_string()));

        io.expect_recv()
            .once()
            .in_sequence(&mut seq)
            .returning(move || Ok(Message::State(s).to_string()));

        let session = rt.block_on(Session::connect(io, Options::default()))?;
        assert_eq!(session.game().snapshot(), s);
    }

    #[test]
    fn connect_starts_new_game_if_no_peer_answers() {
        let rt = runtime::Builder::new_multi_thread()
            .enable_time()
            .build()
            .unwrap();

        let (writer, _requests) = duplex(64);
        let (_peer, reader) = duplex(64);

        let options = Options {
            handshake: Duration::from_millis(10),
        };

        let io = Pipe::new(writer, reader);
        let session = rt.block_on(Session::connect(io, options)).unwrap();
        assert_eq!(session.game(), &Game::default());
    }

    #[test]
    fn connect_fails_if_channel_is_interrupted() {
        let rt = runtime::Builder::new_multi_thread()
            .enable_time()
            .build()
            .unwrap();

        let mut io = MockIo::new();

        io.expect_send().returning(|_| Ok(()));
        io.expect_flush().returning(|| Ok(()));
        io.expect_recv()
            .returning(|| Err(io::ErrorKind::UnexpectedEof.into()));

        assert!(matches!(
            rt.block_on(Session::connect(io, Options::default())),
            Err(SyncError::Interrupted(_))
        ));
    }

    #[test]
    fn committed_move_is_broadcast() {
        let rt = runtime::Builder::new_multi_thread().build().unwrap();
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        let expected = Message::State(Snapshot::new(
            Board::default().play("e2e4".parse().unwrap()),
            Color::Black,
        ));

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(move |msg| msg == expected.to_string())
            .returning(|_| Ok(()));

        io.expect_flush()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut session = joined(io, Snapshot::default());
        let now = Instant::now();

        assert!(matches!(
            rt.block_on(session.designate(sq("e2"), now)),
            Ok(Event::Selected(_))
        ));

        assert!(matches!(
            rt.block_on(session.designate(sq("e4"), now)),
            Ok(Event::Moved(_))
        ));

        assert_eq!(session.game().turn(), Color::Black);
    }

    #[test]
    fn rejected_move_is_not_broadcast() {
        let rt = runtime::Builder::new_multi_thread().build().unwrap();
        let mut session = joined(MockIo::new(), Snapshot::default());
        let now = Instant::now();

        rt.block_on(session.designate(sq("a1"), now)).unwrap();

        assert!(matches!(
            rt.block_on(session.designate(sq("a3"), now)),
            Ok(Event::Rejected(_))
        ));

        assert!(session.game().notice(now).is_some());
        assert!(session.expire_notice(now + Duration::from_secs(3)));
    }

    #[proptest]
    fn received_state_replaces_local_state(
        #[by_ref] s: Snapshot,
        #[filter(#s.board[#sq].map_or(false, |p| p.is_owned_by(#s.turn)))] sq: Square,
        t: Snapshot,
    ) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut session = joined(MockIo::new(), s);

        rt.block_on(session.designate(sq, Instant::now()))?;
        rt.block_on(session.handle(Message::State(t)))?;

        assert_eq!(session.game(), &Game::from(t));
    }

    #[proptest]
    fn request_is_answered_with_current_state(s: Snapshot) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(move |msg| msg == Message::State(s).to_string())
            .returning(|_| Ok(()));

        io.expect_flush()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let mut session = joined(io, s);
        rt.block_on(session.handle(Message::Request))?;
        assert_eq!(session.game().snapshot(), s);
    }

    #[proptest]
    fn recv_skips_malformed_lines(#[strategy("[A-Z]+")] garbage: String, m: Message) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        io.expect_recv()
            .once()
            .in_sequence(&mut seq)
            .returning(move || Ok(garbage.clone()));

        io.expect_recv()
            .once()
            .in_sequence(&mut seq)
            .returning(move || Ok(m.to_string()));

        let mut session = joined(io, Snapshot::default());
        assert_eq!(rt.block_on(session.recv())?, m);
    }
}
