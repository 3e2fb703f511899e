use crate::terminal::{Command, Terminal};
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::game::Notice;
use lib::sync::{Options, Session};
use lib::util::Pipe;
use std::time::Instant;
use tokio::io::{stdin, stdout};
use tokio::net::TcpStream;
use tokio::time::{self, sleep_until};
use tracing::{info, instrument};

/// A game kept in sync with other players through a relay.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Remote {
    /// The synchronization options.
    #[clap(short, long, default_value_t)]
    options: Options,

    /// The address of the relay, as in `localhost:7878`.
    address: String,
}

impl Remote {
    #[instrument(level = "trace", skip(self), err, fields(address = %self.address))]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let stream = TcpStream::connect(&self.address)
            .await
            .with_context(|| format!("failed to connect to `{}`", self.address))?;

        info!(peer = %self.address, "connected");

        let mut session = Session::connect(Pipe::from(stream), self.options).await?;
        let mut terminal = Terminal::new(Pipe::new(stdout(), stdin()));

        terminal.show(session.game(), Instant::now()).await?;

        loop {
            let now = Instant::now();
            let expiry = session.game().notice(now).map(Notice::expires);
            let deadline = time::Instant::from_std(expiry.unwrap_or(now));

            tokio::select! {
                cmd = terminal.recv() => match cmd? {
                    Command::Quit => break Ok(()),
                    Command::Help => terminal.help().await?,
                    cmd => {
                        for square in cmd.squares() {
                            let event = session.designate(square, Instant::now()).await?;
                            terminal.report(&event).await?;
                        }
                    }
                },

                msg = session.recv() => session.handle(msg?).await?,

                _ = sleep_until(deadline), if expiry.is_some() => {
                    session.expire_notice(Instant::now());
                }
            }

            terminal.show(session.game(), Instant::now()).await?;
        }
    }
}
