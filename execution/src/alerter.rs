use poker_types::Schedule;
use std::{sync::Arc, time::Duration};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::debug;

use crate::sink::AlertSink;

/// Stand-in deadline for offsets past what [Instant] can represent.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Deliver every alert of `schedule` to `sink` at its offset from now.
///
/// Each wait targets an absolute deadline, so time spent inside the sink does
/// not push later alerts back; a sink slower than the increment only delays
/// the following alerts, which are still delivered in order.
pub async fn run(schedule: Schedule, sink: Arc<dyn AlertSink>) {
    let start = Instant::now();
    for alert in schedule {
        let deadline = start
            .checked_add(alert.at)
            .unwrap_or_else(|| start + FAR_FUTURE);
        sleep_until(deadline).await;
        debug!(at = ?alert.at, amount = alert.amount, "delivering blind alert");
        sink.deliver(&alert);
    }
    debug!("blind schedule complete");
}

/// Starts delivery of a blind schedule.
pub trait BlindAlerter: Send + Sync + 'static {
    /// Begin delivering `schedule` to `sink` without blocking the caller.
    fn schedule(&self, schedule: Schedule, sink: Arc<dyn AlertSink>);
}

/// [BlindAlerter] that runs each schedule as a task on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioAlerter {
    handle: Handle,
}

impl TokioAlerter {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the calling task.
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Spawn delivery of `schedule`, returning the task handle.
    pub fn spawn(&self, schedule: Schedule, sink: Arc<dyn AlertSink>) -> JoinHandle<()> {
        self.handle.spawn(run(schedule, sink))
    }
}

impl BlindAlerter for TokioAlerter {
    fn schedule(&self, schedule: Schedule, sink: Arc<dyn AlertSink>) {
        // Not cancelled on finish; the task ends after the last alert
        drop(self.spawn(schedule, sink));
    }
}

impl<A: BlindAlerter + ?Sized> BlindAlerter for Arc<A> {
    fn schedule(&self, schedule: Schedule, sink: Arc<dyn AlertSink>) {
        (**self).schedule(schedule, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingSink;
    use poker_types::{Alert, BLIND_AMOUNTS};

    /// Sink that stalls the delivering task for a fixed wall of time.
    struct SlowSink {
        inner: RecordingSink,
        stall: Duration,
    }

    impl AlertSink for SlowSink {
        fn deliver(&self, alert: &Alert) {
            self.inner.deliver(alert);
            std::thread::sleep(self.stall);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_alerts_at_their_offsets() {
        let sink = Arc::new(RecordingSink::default());
        let start = Instant::now();

        run(Schedule::for_players(5), sink.clone()).await;

        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 11);
        for (k, (at, alert)) in deliveries.iter().enumerate() {
            assert_eq!(alert.amount, BLIND_AMOUNTS[k]);
            assert_eq!(*at - start, Duration::from_secs(600) * k as u32);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_alert_fires_immediately() {
        let sink = Arc::new(RecordingSink::default());
        let alerter = TokioAlerter::current();

        let handle = alerter.spawn(Schedule::for_players(3), sink.clone());
        tokio::task::yield_now().await;
        assert_eq!(sink.amounts(), vec![100]);

        // Just short of the second alert (8 minutes)
        tokio::time::sleep(Duration::from_secs(8 * 60 - 1)).await;
        assert_eq!(sink.amounts(), vec![100]);

        tokio::time::sleep(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(sink.amounts(), vec![100, 200]);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_sink_keeps_order() {
        let sink = Arc::new(SlowSink {
            inner: RecordingSink::default(),
            stall: Duration::from_millis(20),
        });

        run(
            Schedule::for_players_with_unit(0, Duration::from_millis(1)),
            sink.clone(),
        )
        .await;

        assert_eq!(sink.inner.amounts(), BLIND_AMOUNTS.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn alerter_does_not_block_caller() {
        let sink = Arc::new(RecordingSink::default());
        let alerter = TokioAlerter::current();

        alerter.schedule(Schedule::for_players(5), sink.clone());

        // Nothing has run yet: schedule only spawned the task
        assert!(sink.amounts().is_empty());
        tokio::time::sleep(Duration::from_secs(100 * 60)).await;
        tokio::task::yield_now().await;
        assert_eq!(sink.amounts().len(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_unit_does_not_overflow() {
        let sink = Arc::new(RecordingSink::default());
        let alerter = TokioAlerter::current();

        let handle = alerter.spawn(
            Schedule::for_players_with_unit(5, Duration::from_secs(u64::MAX)),
            sink.clone(),
        );
        tokio::time::sleep(Duration::from_secs(365 * 86400)).await;
        tokio::task::yield_now().await;

        assert_eq!(sink.amounts(), vec![100]);
        assert!(!handle.is_finished());
        handle.abort();
    }
}
