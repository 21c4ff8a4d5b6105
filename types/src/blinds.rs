use std::{fmt, time::Duration};

use crate::{BASE_PLAYERS, BLIND_AMOUNTS, BLIND_UNIT};

/// A single blind increase, fired `at` after the game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Alert {
    pub at: Duration,
    pub amount: u64,
}

impl Alert {
    pub fn new(at: Duration, amount: u64) -> Self {
        Self { at, amount }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blind is now {}", self.amount)
    }
}

/// Ordered blind alerts for one game.
///
/// Derived only from the player count (and the time unit), so the same input
/// always yields the same alerts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    increment: Duration,
    alerts: Vec<Alert>,
}

impl Schedule {
    /// Schedule for `players` using the default one minute unit.
    pub fn for_players(players: i64) -> Self {
        Self::for_players_with_unit(players, BLIND_UNIT)
    }

    /// Schedule where blinds rise every `(BASE_PLAYERS + players) * unit`.
    ///
    /// Player counts at or below `-BASE_PLAYERS` collapse the increment to zero,
    /// so every alert is due at once.
    pub fn for_players_with_unit(players: i64, unit: Duration) -> Self {
        let steps = BASE_PLAYERS
            .saturating_add(players)
            .clamp(0, u32::MAX as i64) as u32;
        let increment = unit.saturating_mul(steps);
        let alerts = BLIND_AMOUNTS
            .iter()
            .enumerate()
            .map(|(k, amount)| Alert::new(increment.saturating_mul(k as u32), *amount))
            .collect();
        Self { increment, alerts }
    }

    /// Time between two consecutive alerts.
    pub fn increment(&self) -> Duration {
        self.increment
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }
}

impl IntoIterator for Schedule {
    type Item = Alert;
    type IntoIter = std::vec::IntoIter<Alert>;

    fn into_iter(self) -> Self::IntoIter {
        self.alerts.into_iter()
    }
}
