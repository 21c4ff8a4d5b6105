use poker_types::Alert;
use std::{
    io::{self, Write},
    sync::Mutex,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Destination for blind alerts.
///
/// Delivery is fire and forget: implementations must return without waiting
/// for anyone to observe the alert.
pub trait AlertSink: Send + Sync + 'static {
    fn deliver(&self, alert: &Alert);
}

/// Drops every alert.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl AlertSink for Discard {
    fn deliver(&self, _: &Alert) {}
}

/// Writes one `Blind is now N` line per alert.
pub struct WriterSink<W: Write + Send + 'static> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> AlertSink for WriterSink<W> {
    fn deliver(&self, alert: &Alert) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(writer, "{alert}").and_then(|_| writer.flush()) {
            warn!(error = %e, amount = alert.amount, "failed to write blind alert");
        }
    }
}

/// Forwards rendered alerts into an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    /// Create a sink along with the receiving half of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl AlertSink for ChannelSink {
    fn deliver(&self, alert: &Alert) {
        if self.sender.send(alert.to_string()).is_err() {
            debug!(amount = alert.amount, "alert receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn writer_sink_renders_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.deliver(&Alert::new(Duration::ZERO, 100));
        sink.deliver(&Alert::new(Duration::from_secs(600), 200));
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "Blind is now 100\nBlind is now 200\n"
        );
    }

    #[test]
    fn channel_sink_forwards_and_tolerates_dropped_receiver() {
        let (sink, mut receiver) = ChannelSink::channel();
        sink.deliver(&Alert::new(Duration::ZERO, 100));
        assert_eq!(receiver.try_recv().unwrap(), "Blind is now 100");

        drop(receiver);
        sink.deliver(&Alert::new(Duration::ZERO, 200));
    }
}
