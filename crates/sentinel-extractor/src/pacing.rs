//! Suspension points: rate-limit backoff and inter-job pauses

use std::future::Future;
use std::time::Duration;

/// Something that can wait
///
/// The runner never sleeps directly so that tests can observe the waits it
/// would have made.
pub trait Sleeper {
    /// Wait for `duration`
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingSleeper;
