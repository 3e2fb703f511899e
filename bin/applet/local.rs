use crate::terminal::{Command, Terminal};
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::game::{Game, Notice};
use lib::util::Pipe;
use std::time::Instant;
use tokio::io::{stdin, stdout};
use tokio::time::{self, sleep_until};
use tracing::instrument;

/// Two players taking turns at the same terminal.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Local {}

impl Local {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let mut terminal = Terminal::new(Pipe::new(stdout(), stdin()));
        let mut game = Game::default();

        terminal.show(&game, Instant::now()).await?;

        loop {
            let now = Instant::now();
            let expiry = game.notice(now).map(Notice::expires);
            let deadline = time::Instant::from_std(expiry.unwrap_or(now));

            tokio::select! {
                cmd = terminal.recv() => match cmd? {
                    Command::Quit => break Ok(()),
                    Command::Help => terminal.help().await?,
                    cmd => {
                        for square in cmd.squares() {
                            let event = game.select_or_move(square, Instant::now());
                            terminal.report(&event).await?;
                        }
                    }
                },

                _ = sleep_until(deadline), if expiry.is_some() => {
                    game.expire_notice(Instant::now());
                }
            }

            terminal.show(&game, Instant::now()).await?;
        }
    }
}
