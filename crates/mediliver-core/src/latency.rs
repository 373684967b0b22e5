//! Simulated network latency for the demo login and payment flows.
//!
//! The wait is an explicit async boundary with a deadline and a cancellation token,
//! so callers can swap the timer for immediate completion in tests.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

/// Latency errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatencyError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0:?}")]
    TimedOut(Duration),
}

pub type LatencyResult<T> = Result<T, LatencyError>;

/// How long a simulated call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedLatency {
    /// Wait on a timer
    Timer(Duration),
    /// Complete on first poll
    Immediate,
}

impl SimulatedLatency {
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            SimulatedLatency::Immediate
        } else {
            SimulatedLatency::Timer(Duration::from_millis(ms))
        }
    }
}

/// Cooperative cancellation shared between a caller and a pending operation.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender lives as long as `self`; unreachable in practice
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Wait out `latency`, then yield `outcome`.
///
/// Cancellation wins over completion when both are ready.
pub async fn simulate<T>(
    latency: SimulatedLatency,
    deadline: Duration,
    cancel: &CancelToken,
    outcome: T,
) -> LatencyResult<T> {
    let wait = async {
        if let SimulatedLatency::Timer(delay) = latency {
            tokio::time::sleep(delay).await;
        }
    };

    let finished = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        res = tokio::time::timeout(deadline, wait) => Some(res.is_ok()),
    };

    match finished {
        None => Err(LatencyError::Cancelled),
        Some(false) => {
            tracing::warn!(?deadline, "simulated call timed out");
            Err(LatencyError::TimedOut(deadline))
        }
        Some(true) => Ok(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_immediate_completes() {
        let cancel = CancelToken::new();
        let out = simulate(SimulatedLatency::Immediate, Duration::from_secs(1), &cancel, 7).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_completes_within_deadline() {
        let cancel = CancelToken::new();
        let out = simulate(
            SimulatedLatency::Timer(Duration::from_secs(2)),
            Duration::from_secs(10),
            &cancel,
            "paid",
        )
        .await;
        assert_eq!(out, Ok("paid"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let cancel = CancelToken::new();
        let out = simulate(
            SimulatedLatency::Timer(Duration::from_secs(5)),
            Duration::from_secs(1),
            &cancel,
            (),
        )
        .await;
        assert_eq!(out, Err(LatencyError::TimedOut(Duration::from_secs(1))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(cancel.is_cancelled());
        let out = simulate(SimulatedLatency::Immediate, Duration::from_secs(1), &cancel, ()).await;
        assert_eq!(out, Err(LatencyError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_while_waiting() {
        let cancel = CancelToken::new();
        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                simulate(
                    SimulatedLatency::Timer(Duration::from_secs(60)),
                    Duration::from_secs(120),
                    &cancel,
                    (),
                )
                .await
            })
        };
        tokio::task::yield_now().await;
        cancel.cancel();
        assert_eq!(handle.await.unwrap(), Err(LatencyError::Cancelled));
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(SimulatedLatency::from_millis(0), SimulatedLatency::Immediate);
        assert_eq!(
            SimulatedLatency::from_millis(1000),
            SimulatedLatency::Timer(Duration::from_secs(1))
        );
    }
}
