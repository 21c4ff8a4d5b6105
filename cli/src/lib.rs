//! Line-oriented front-end: one line for the player count, one line for the
//! winner.

use poker_execution::{AlertSink, Game, StoreError};
use std::{
    io::{self, BufRead, Write},
    num::ParseIntError,
    sync::Arc,
};
use thiserror::Error;
use tracing::debug;

pub const PLAYER_PROMPT: &str = "Please enter the number of players: ";

const WINNER_SUFFIX: &str = " wins";

/// Input the user typed that cannot be turned into a game event.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Bad value received for number of players, please try again with a number")]
    BadPlayerCount(#[source] ParseIntError),
    #[error("invalid winner input, expect format of 'PlayerName wins'")]
    BadWinner(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse the player count line.
pub fn parse_players(line: &str) -> Result<i64, InputError> {
    line.trim().parse().map_err(InputError::BadPlayerCount)
}

/// Extract the winner from a `"<Name> wins"` line.
pub fn extract_winner(line: &str) -> Result<&str, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);
    line.strip_suffix(WINNER_SUFFIX)
        .ok_or_else(|| InputError::BadWinner(line.to_string()))
}

/// Drives a [Game] from text input.
pub struct Cli<G: Game, R: BufRead, W: Write> {
    game: G,
    input: R,
    output: W,
    alerts: Arc<dyn AlertSink>,
}

impl<G: Game, R: BufRead, W: Write> Cli<G, R, W> {
    pub fn new(input: R, output: W, game: G, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            game,
            input,
            output,
            alerts,
        }
    }

    /// Play one game: prompt for the player count, start the game, then wait
    /// for the winner line and finish it.
    ///
    /// Bad input is written to the output and returned; the game is left
    /// untouched in that case. Reads at most two lines.
    pub fn play_poker(&mut self) -> Result<(), Error> {
        write!(self.output, "{PLAYER_PROMPT}")?;
        self.output.flush()?;

        let line = self.read_line()?;
        let players = self.check(parse_players(&line))?;
        self.game.start(players, self.alerts.clone());

        let line = self.read_line()?;
        let winner = self.check(extract_winner(&line))?;
        self.game.finish(winner)?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, Error> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        debug!(bytes = read, "read input line");
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn check<T>(&mut self, result: Result<T, InputError>) -> Result<T, Error> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                write!(self.output, "{e}")?;
                self.output.flush()?;
                Err(e.into())
            }
        }
    }
}
