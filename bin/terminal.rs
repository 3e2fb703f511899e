use arrayvec::ArrayVec;
use derive_more::{Display, Error, From};
use lib::chess::{rules, Move, ParseMoveError, ParseSquareError, Square};
use lib::game::{Event, Game};
use lib::util::Io;
use std::fmt::{self, Formatter};
use std::{io, str::FromStr, time::Instant};
use tracing::instrument;

/// A command entered at the prompt.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Command {
    /// Designate a single square.
    #[display(fmt = "{}", _0)]
    Designate(Square),

    /// Designate the origin, then the destination of a move.
    #[display(fmt = "{}", _0)]
    Play(Move),

    #[display(fmt = "help")]
    Help,

    #[display(fmt = "quit")]
    Quit,
}

impl Command {
    /// The squares this command designates, in order.
    pub fn squares(&self) -> ArrayVec<Square, 2> {
        match *self {
            Command::Designate(s) => [s].into_iter().collect(),
            Command::Play(m) => [m.whence(), m.whither()].into(),
            Command::Help | Command::Quit => ArrayVec::new(),
        }
    }
}

/// The reason why parsing [`Command`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseCommandError {
    #[display(fmt = "invalid square; {}", _0)]
    InvalidSquare(ParseSquareError),

    #[display(fmt = "{}", _0)]
    InvalidMove(ParseMoveError),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            s if s.chars().count() > 2 => Ok(Command::Play(s.parse()?)),
            s => Ok(Command::Designate(s.parse()?)),
        }
    }
}

/// What the players see of a [`Game`] at a given instant.
#[derive(Debug, Copy, Clone)]
pub struct View<'a> {
    game: &'a Game,
    now: Instant,
}

impl<'a> View<'a> {
    pub fn new(game: &'a Game, now: Instant) -> Self {
        View { game, now }
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:#}", self.game.board())?;
        write!(f, "{} to move", self.game.turn())?;

        if let Some(s) = self.game.selection() {
            write!(f, ", {:#} on {} selected", s.piece(), s.square())?;

            let destinations = rules::destinations(self.game.board(), s.square(), s.piece());
            if !destinations.is_empty() {
                f.write_str(" [")?;
                for (i, d) in destinations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }

                    write!(f, "{d}")?;
                }

                f.write_str("]")?;
            }
        }

        if let Some(n) = self.game.notice(self.now) {
            write!(f, "\n{n}")?;
        }

        Ok(())
    }
}

const HELP: &str = "\
Designate a square to select one of your pieces, then a square to move it there.
  e2       designate a single square
  e2e4     designate both squares of a move at once
  help     print this message
  quit     leave the game";

/// A line oriented prompt for playing over an [`Io`].
#[derive(Debug)]
pub struct Terminal<I: Io> {
    io: I,
}

impl<I: Io> Terminal<I> {
    pub fn new(io: I) -> Self {
        Terminal { io }
    }

    /// Waits for the next valid [`Command`], reporting anything else back to the player.
    #[instrument(level = "trace", skip(self), ret, err)]
    pub async fn recv(&mut self) -> io::Result<Command> {
        loop {
            let line = self.io.recv().await?;

            if line.trim().is_empty() {
                continue;
            }

            match line.parse() {
                Ok(cmd) => break Ok(cmd),
                Err(e) => self.print(&format!("{e}, type `help` for usage")).await?,
            }
        }
    }

    /// Prints the state of the [`Game`].
    pub async fn show(&mut self, game: &Game, now: Instant) -> io::Result<()> {
        self.print(&View::new(game, now).to_string()).await
    }

    /// Prints the outcome of a designation, unless it was ignored.
    pub async fn report(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Ignored => Ok(()),
            e => self.print(&e.to_string()).await,
        }
    }

    /// Prints the usage instructions.
    pub async fn help(&mut self) -> io::Result<()> {
        self.print(HELP).await
    }

    async fn print(&mut self, text: &str) -> io::Result<()> {
        for line in text.lines() {
            self.io.send(line).await?;
        }

        self.io.flush().await
    }
}
