//! Abortable delays over the run's cancellation token.
//!
//! A run checks its [`CancellationToken`] at every suspension point through
//! [`guard`]: if the token is already cancelled the awaited work never
//! starts, and if it is cancelled while the work is pending the work is
//! abandoned (its future is dropped) and [`Cancelled`] is returned.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The run was cancelled at a suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sequence run cancelled")]
pub struct Cancelled;

/// `Err(Cancelled)` if `token` is cancelled.
pub fn check(token: &CancellationToken) -> Result<(), Cancelled> {
    if token.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Suspension helpers
// ---------------------------------------------------------------------------

/// Await `fut` unless `token` is (or becomes) cancelled.
pub async fn guard<F: Future>(token: &CancellationToken, fut: F) -> Result<F::Output, Cancelled> {
    check(token)?;
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        out = fut => Ok(out),
    }
}

/// Wait `duration` unless cancelled.
pub async fn wait(duration: Duration, token: &CancellationToken) -> Result<(), Cancelled> {
    guard(token, tokio::time::sleep(duration)).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn wait_elapses_when_not_cancelled() {
        let token = CancellationToken::new();
        let start = Instant::now();
        wait(Duration::from_millis(500), &token).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_on_cancelled_token_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let start = Instant::now();
        assert_eq!(wait(Duration::from_secs(5), &token).await, Err(Cancelled));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_pending_wait() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { wait(Duration::from_secs(60), &token).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();

        let start = Instant::now();
        assert_eq!(waiter.await.unwrap(), Err(Cancelled));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn guard_skips_work_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut ran = false;
        let result = guard(&token, async { ran = true }).await;
        assert_eq!(result, Err(Cancelled));
        assert!(!ran);
    }

    #[tokio::test]
    async fn guard_passes_output_through() {
        let token = CancellationToken::new();
        assert_eq!(guard(&token, async { 7 }).await, Ok(7));
    }

    #[test]
    fn cancel_is_idempotent_and_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(check(&token), Err(Cancelled));
    }
}
