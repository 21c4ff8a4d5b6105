pub mod alerter;
pub mod game;
pub mod sink;
pub mod store;
pub mod tape;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use alerter::{run, BlindAlerter, TokioAlerter};
pub use game::{Game, TexasHoldem};
pub use sink::{AlertSink, ChannelSink, Discard, WriterSink};
pub use store::{FileSystemPlayerStore, PlayerStore, StoreError};
pub use tape::{FileTape, MemoryTape, Tape};
