//! Pacing Controller
//!
//! Enforces a minimum wall-clock duration per batch so the request rate to
//! the backend stays bounded no matter how quickly individual batches
//! complete. The floor applies after every batch, success or failure, and is
//! the only intentional suspension point besides the backend call itself.
//! No maximum duration or timeout is imposed on the backend call.

use std::time::Duration;
use tokio::time::Instant;

/// Minimum wall-clock duration of one batch, including the backend call
pub const MIN_BATCH_DURATION: Duration = Duration::from_millis(3000);

/// Sleep out the remainder of the batch's minimum duration
///
/// `batch_started` is the instant the batch began. If the batch already took
/// at least [`MIN_BATCH_DURATION`], returns immediately.
pub async fn enforce_min_duration(batch_started: Instant) {
    let elapsed = batch_started.elapsed();
    if let Some(remaining) = MIN_BATCH_DURATION.checked_sub(elapsed) {
        tracing::debug!("pacing: waiting {}ms before next batch", remaining.as_millis());
        tokio::time::sleep(remaining).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_when_floor_already_met() {
        let started = Instant::now();
        tokio::time::advance(Duration::from_millis(3500)).await;
        enforce_min_duration(started).await;
        assert_eq!(started.elapsed(), Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_out_the_remainder() {
        let started = Instant::now();
        tokio::time::advance(Duration::from_millis(1000)).await;
        enforce_min_duration(started).await;
        // The sleep advances the paused clock by exactly the remaining 2s.
        assert_eq!(started.elapsed(), MIN_BATCH_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_batch_waits_full_floor() {
        let started = Instant::now();
        enforce_min_duration(started).await;
        assert_eq!(started.elapsed(), MIN_BATCH_DURATION);
    }
}
