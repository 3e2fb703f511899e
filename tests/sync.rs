use lib::chess::{Board, Color, Square};
use lib::game::{Event, Snapshot};
use lib::sync::{Message, Options, Relay, Session};
use lib::util::{Io, Pipe};
use std::time::{Duration, Instant};
use std::net::SocketAddr;
use tokio::{net::TcpStream, runtime, time::timeout};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn options() -> Options {
    Options {
        handshake: Duration::from_secs(1),
    }
}

async fn join(addr: SocketAddr) -> Result<Session<impl Io>, anyhow::Error> {
    let stream = TcpStream::connect(addr).await?;
    Ok(Session::connect(Pipe::from(stream), options()).await?)
}

async fn sync(session: &mut Session<impl Io>) -> Result<(), anyhow::Error> {
    let msg = timeout(Duration::from_secs(5), session.recv()).await??;
    Ok(session.handle(msg).await?)
}

#[test]
fn peers_share_committed_moves_through_relay() {
    let rt = runtime::Builder::new_multi_thread().enable_all().build().unwrap();

    rt.block_on(async {
        let relay = Relay::bind("127.0.0.1:0").await?;
        let addr = relay.local_addr()?;
        tokio::spawn(relay.run());

        let mut white = join(addr).await?;
        assert_eq!(white.game().snapshot(), Snapshot::default());

        let black = tokio::spawn(async move { join(addr).await });

        // Answer the newcomer's request for the state of the game.
        sync(&mut white).await?;
        let mut black = black.await??;
        assert_eq!(black.game().snapshot(), white.game().snapshot());

        let now = Instant::now();
        white.designate(sq("e2"), now).await?;
        assert!(matches!(white.designate(sq("e4"), now).await?, Event::Moved(_)));

        sync(&mut black).await?;
        assert_eq!(black.game().turn(), Color::Black);
        assert_eq!(black.game().snapshot(), white.game().snapshot());

        black.designate(sq("d7"), now).await?;
        assert!(matches!(black.designate(sq("d5"), now).await?, Event::Moved(_)));

        sync(&mut white).await?;
        assert_eq!(
            white.game().board().to_string(),
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR"
        );

        Ok::<_, anyhow::Error>(())
    })
    .unwrap();
}

#[test]
fn received_state_replaces_local_state_after_local_moves() {
    let rt = runtime::Builder::new_multi_thread().enable_all().build().unwrap();

    rt.block_on(async {
        let relay = Relay::bind("127.0.0.1:0").await?;
        let addr = relay.local_addr()?;
        tokio::spawn(relay.run());

        let mut local = join(addr).await?;
        let mut peer = Pipe::from(TcpStream::connect(addr).await?);

        let now = Instant::now();
        for s in ["e2", "e4", "e7", "e5", "g1"] {
            local.designate(sq(s), now).await?;
        }

        let board: Board = "4k3/8/8/8/8/8/8/4K3".parse()?;
        let remote = Snapshot::new(board, Color::Black);
        peer.send(&Message::State(remote).to_string()).await?;
        peer.flush().await?;

        sync(&mut local).await?;
        assert_eq!(local.game().snapshot(), remote);
        assert_eq!(local.game().selection(), None);

        Ok::<_, anyhow::Error>(())
    })
    .unwrap();
}

#[test]
fn malformed_lines_are_skipped() {
    let rt = runtime::Builder::new_multi_thread().enable_all().build().unwrap();

    rt.block_on(async {
        let relay = Relay::bind("127.0.0.1:0").await?;
        let addr = relay.local_addr()?;
        tokio::spawn(relay.run());

        let mut local = join(addr).await?;
        let mut peer = Pipe::from(TcpStream::connect(addr).await?);

        let remote = Snapshot::new(Board::empty(), Color::White);
        peer.send("state(oops)").await?;
        peer.send(&Message::State(remote).to_string()).await?;
        peer.flush().await?;

        sync(&mut local).await?;
        assert_eq!(local.game().snapshot(), remote);

        Ok::<_, anyhow::Error>(())
    })
    .unwrap();
}
