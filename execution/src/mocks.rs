//! Test doubles for the store, the alerter, sinks and games.

use poker_types::{Alert, League, Schedule};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tokio::time::Instant;

use crate::{
    alerter::BlindAlerter,
    game::Game,
    sink::AlertSink,
    store::{PlayerStore, StoreError},
};

/// In-memory [PlayerStore] with fixed scores that records every win call.
#[derive(Default)]
pub struct StubPlayerStore {
    scores: HashMap<String, u64>,
    league: League,
    win_calls: Mutex<Vec<String>>,
}

impl StubPlayerStore {
    pub fn with_scores<I, N>(scores: I) -> Self
    where
        I: IntoIterator<Item = (N, u64)>,
        N: Into<String>,
    {
        Self {
            scores: scores.into_iter().map(|(n, s)| (n.into(), s)).collect(),
            ..Default::default()
        }
    }

    pub fn with_league(league: League) -> Self {
        Self {
            league,
            ..Default::default()
        }
    }

    pub fn win_calls(&self) -> Vec<String> {
        self.win_calls.lock().unwrap().clone()
    }
}

impl PlayerStore for StubPlayerStore {
    fn league(&self) -> League {
        self.league.clone()
    }

    fn player_score(&self, name: &str) -> u64 {
        self.scores.get(name).copied().unwrap_or(0)
    }

    fn record_win(&self, name: &str) -> Result<(), StoreError> {
        self.win_calls.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

/// [BlindAlerter] that records schedules instead of delivering them.
#[derive(Default)]
pub struct SpyBlindAlerter {
    alerts: Mutex<Vec<Alert>>,
    calls: AtomicUsize,
}

impl SpyBlindAlerter {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlindAlerter for SpyBlindAlerter {
    fn schedule(&self, schedule: Schedule, _: Arc<dyn AlertSink>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.alerts.lock().unwrap().extend(schedule);
    }
}

/// [AlertSink] that keeps every alert with the instant it arrived.
#[derive(Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<(Instant, Alert)>>,
}

impl RecordingSink {
    pub fn deliveries(&self) -> Vec<(Instant, Alert)> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn amounts(&self) -> Vec<u64> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, alert)| alert.amount)
            .collect()
    }
}

impl AlertSink for RecordingSink {
    fn deliver(&self, alert: &Alert) {
        self.deliveries.lock().unwrap().push((Instant::now(), *alert));
    }
}

/// [Game] that remembers how it was started and finished.
#[derive(Default)]
pub struct GameSpy {
    started_with: Mutex<Option<i64>>,
    finished_with: Mutex<Option<String>>,
}

impl GameSpy {
    pub fn started_with(&self) -> Option<i64> {
        *self.started_with.lock().unwrap()
    }

    pub fn finished_with(&self) -> Option<String> {
        self.finished_with.lock().unwrap().clone()
    }
}

impl Game for GameSpy {
    fn start(&self, players: i64, _: Arc<dyn AlertSink>) {
        *self.started_with.lock().unwrap() = Some(players);
    }

    fn finish(&self, winner: &str) -> Result<(), StoreError> {
        *self.finished_with.lock().unwrap() = Some(winner.to_string());
        Ok(())
    }
}
