//! Shared types for the poker league: the win ledger, blind schedules and the
//! lifecycle of a single game.

mod blinds;
mod constants;
mod game;
mod league;

pub use blinds::*;
pub use constants::*;
pub use game::*;
pub use league::*;

use thiserror::Error;

/// Error type for decoding persisted types.
#[derive(Error, Debug)]
pub enum Error {
    #[error("problem parsing league: {0}")]
    Decode(#[from] serde_json::Error),
}
