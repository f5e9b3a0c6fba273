use tracing::info;

/// A fire-and-forget channel for messages meant for a person.
pub trait Notifier: Send + Sync {
    /// Deliver a message.
    fn alert(&self, message: &str);
}

/// A [`Notifier`] that emits each alert as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        info!(target: "bnet_data::alert", "{message}");
    }
}
