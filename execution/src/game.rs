use poker_types::{GameState, Schedule, BLIND_UNIT};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tracing::{info, warn};

use crate::{
    alerter::BlindAlerter,
    sink::AlertSink,
    store::{PlayerStore, StoreError},
};

/// The two events a front-end can deliver to a game.
pub trait Game: Send + Sync {
    /// Start the game for `players`, streaming blind alerts to `sink`.
    fn start(&self, players: i64, sink: Arc<dyn AlertSink>);

    /// Declare `winner` and record the win.
    fn finish(&self, winner: &str) -> Result<(), StoreError>;
}

impl<G: Game + ?Sized> Game for Arc<G> {
    fn start(&self, players: i64, sink: Arc<dyn AlertSink>) {
        (**self).start(players, sink)
    }

    fn finish(&self, winner: &str) -> Result<(), StoreError> {
        (**self).finish(winner)
    }
}

/// One game session: schedules blinds on start and records the winner on
/// finish.
///
/// A second start leaves the running schedule alone. Finish is accepted from
/// any state and records a win every time it names a winner. Blind delivery
/// is not stopped by finish.
pub struct TexasHoldem<A: BlindAlerter, S: PlayerStore> {
    alerter: A,
    store: S,
    unit: Duration,
    state: Mutex<GameState>,
}

impl<A: BlindAlerter, S: PlayerStore> TexasHoldem<A, S> {
    pub fn new(alerter: A, store: S) -> Self {
        Self::with_unit(alerter, store, BLIND_UNIT)
    }

    /// Measure the blind increment in `unit` instead of minutes.
    pub fn with_unit(alerter: A, store: S, unit: Duration) -> Self {
        Self {
            alerter,
            store,
            unit,
            state: Mutex::new(GameState::NotStarted),
        }
    }

    pub fn state(&self) -> GameState {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<A: BlindAlerter, S: PlayerStore> Game for TexasHoldem<A, S> {
    fn start(&self, players: i64, sink: Arc<dyn AlertSink>) {
        let mut state = self.lock();
        if *state != GameState::NotStarted {
            warn!(players, state = %*state, "ignoring start of a game already started");
            return;
        }

        let schedule = Schedule::for_players_with_unit(players, self.unit);
        info!(players, increment = ?schedule.increment(), "game started");
        self.alerter.schedule(schedule, sink);
        *state = GameState::Running;
    }

    fn finish(&self, winner: &str) -> Result<(), StoreError> {
        if winner.is_empty() {
            warn!("ignoring finish without a winner");
            return Ok(());
        }

        let mut state = self.lock();
        self.store.record_win(winner)?;
        *state = GameState::Finished;
        info!(winner, "game finished");
        Ok(())
    }
}
