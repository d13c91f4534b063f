//! Periodic background tasks tied to the application lifecycle.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A task running on a fixed interval until stopped.
///
/// The first run happens immediately. Dropping the ticker also ends the
/// loop at its next wake-up.
pub struct Ticker {
    name: &'static str,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = interval.tick() => task().await,
                }
            }

            tracing::debug!(ticker = name, "Ticker stopped");
        });

        tracing::info!(ticker = name, period = %humantime::format_duration(period), "Ticker started");
        Ticker { name, stop, handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the loop and wait for an in-flight run to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            tracing::warn!(ticker = self.name, error = %e, "Ticker task ended abnormally");
        }
    }
}
