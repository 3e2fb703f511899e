use crate::util::{Io, Pipe};
use std::{fmt::Debug, io, net::SocketAddr};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::broadcast::{self, error::RecvError, Receiver, Sender};
use tracing::{debug, error, info, instrument, warn, Instrument};

/// A TCP server that forwards every line a client sends to every other client.
///
/// Lines are relayed opaquely, the server never inspects the state of the game.
#[derive(Debug)]
pub struct Relay {
    listener: TcpListener,
}

impl Relay {
    /// How many lines may be buffered for a slow client before it starts missing them.
    pub const CAPACITY: usize = 64;

    /// Listens for clients on `addr`.
    #[instrument(level = "debug", err)]
    pub async fn bind<A: ToSocketAddrs + Debug>(addr: A) -> io::Result<Self> {
        Ok(Relay {
            listener: TcpListener::bind(addr).await?,
        })
    }

    /// The address this relay is listening on.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts clients until the listener fails.
    #[instrument(level = "debug", skip(self), fields(addr = ?self.listener.local_addr().ok()), err)]
    pub async fn run(self) -> io::Result<()> {
        let (tx, _) = broadcast::channel(Self::CAPACITY);

        for id in 0usize.. {
            let (stream, peer) = self.listener.accept().await?;
            info!(id, %peer, "client connected");

            let client = Client {
                id,
                tx: tx.clone(),
                rx: tx.subscribe(),
            };

            let span = tracing::info_span!("client", id, %peer);
            tokio::spawn(
                async move {
                    match client.serve(stream).await {
                        Ok(()) => info!("client disconnected"),
                        Err(e) => error!("{}", e),
                    }
                }
                .instrument(span),
            );
        }

        Ok(())
    }
}

struct Client {
    id: usize,
    tx: Sender<(usize, String)>,
    rx: Receiver<(usize, String)>,
}

impl Client {
    async fn serve(mut self, stream: TcpStream) -> io::Result<()> {
        let mut io = Pipe::from(stream);

        loop {
            tokio::select! {
                line = io.recv() => match line {
                    Ok(line) => {
                        debug!(%line, "relaying");
                        self.tx
                            .send((self.id, line))
                            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
                    }

                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break Ok(()),
                    Err(e) => break Err(e),
                },

                msg = self.rx.recv() => match msg {
                    Ok((id, line)) if id != self.id => {
                        io.send(&line).await?;
                        io.flush().await?;
                    }

                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => warn!(n, "client fell behind, lines were lost"),
                    Err(RecvError::Closed) => break Ok(()),
                },
            }
        }
    }
}
