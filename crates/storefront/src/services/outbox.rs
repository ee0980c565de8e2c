//! Outbox worker: dispatches the side effects of order creation.
//!
//! Order creation writes intents (material draws, webhook, confirmation
//! email) in the same transaction as the order; this worker polls for due
//! intents, dispatches them, and retries failures with exponential backoff.
//! After the retry budget is spent an event is parked as `failed` for
//! manual inspection. Nothing here ever reaches back into the request path.

use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::db::{OrderRepository, OutboxEvent, OutboxKind, OutboxRepository, RepositoryError};
use crate::services::consumption;
use crate::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const BATCH_SIZE: i64 = 10;
const MAX_ATTEMPTS: i32 = 5;
const BASE_BACKOFF_SECS: i64 = 30;
const MAX_BACKOFF_SECS: i64 = 3600;
/// A `processing` claim older than this belongs to a crashed worker.
const STALE_CLAIM_SECS: i64 = 600;

/// Spawn the outbox worker loop.
#[must_use]
pub fn spawn(state: AppState) -> JoinHandle<()> {
    tokio::spawn(run(state))
}

async fn run(state: AppState) {
    info!("outbox worker started");
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if let Err(e) = process_batch(&state).await {
            error!(error = %e, "outbox batch failed");
        }
    }
}

/// Claim and dispatch one batch of due events. Returns how many were
/// claimed.
///
/// # Errors
///
/// Returns [`RepositoryError`] when the claim itself fails; per-event
/// dispatch failures are recorded on the event, not returned.
pub async fn process_batch(state: &AppState) -> Result<usize, RepositoryError> {
    let repo = OutboxRepository::new(state.pool());

    let released = repo.release_stale(STALE_CLAIM_SECS).await?;
    if released > 0 {
        warn!(released, "returned stale outbox claims to the pool");
    }

    let events = repo.claim_due(BATCH_SIZE).await?;
    let claimed = events.len();

    for event in events {
        match dispatch(state, &event).await {
            Ok(()) => {
                debug!(event_id = %event.id, kind = event.kind.as_str(), "outbox event done");
                repo.mark_done(event.id).await?;
            }
            Err(e) => {
                let attempt = event.attempts + 1;
                if attempt >= MAX_ATTEMPTS {
                    error!(
                        event_id = %event.id,
                        kind = event.kind.as_str(),
                        attempt,
                        error = %e,
                        "outbox event failed permanently"
                    );
                    repo.mark_failed(event.id, &e).await?;
                } else {
                    let delay = jittered(backoff_secs(attempt));
                    warn!(
                        event_id = %event.id,
                        kind = event.kind.as_str(),
                        attempt,
                        retry_in_secs = delay,
                        error = %e,
                        "outbox event failed, retrying"
                    );
                    repo.mark_retry(event.id, delay, &e).await?;
                }
            }
        }
    }

    Ok(claimed)
}

/// Dispatch one event by kind.
#[instrument(skip(state, event), fields(event_id = %event.id, order_id = %event.order_id))]
async fn dispatch(state: &AppState, event: &OutboxEvent) -> Result<(), String> {
    let order = OrderRepository::new(state.pool())
        .get(event.order_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("order {} no longer exists", event.order_id))?;

    match event.kind {
        OutboxKind::MaterialDeduction => consumption::apply_order_draws(state.pool(), &order)
            .await
            .map_err(|e| e.to_string()),
        OutboxKind::OrderWebhook => match state.webhook() {
            Some(webhook) => webhook
                .send_order_created(&order)
                .await
                .map_err(|e| e.to_string()),
            None => {
                debug!("order webhook not configured, skipping");
                Ok(())
            }
        },
        OutboxKind::ConfirmationEmail => match state.email() {
            Some(email) => email
                .send_order_confirmation(&order)
                .await
                .map_err(|e| e.to_string()),
            None => {
                debug!("confirmation email not configured, skipping");
                Ok(())
            }
        },
    }
}

/// Deterministic backoff: 30 s doubling per attempt, capped at an hour.
const fn backoff_secs(attempt: i32) -> i64 {
    let exp = attempt - 1;
    if exp >= 7 {
        return MAX_BACKOFF_SECS;
    }
    let secs = BASE_BACKOFF_SECS << exp;
    if secs > MAX_BACKOFF_SECS {
        MAX_BACKOFF_SECS
    } else {
        secs
    }
}

/// Add ±10% jitter so retries from one incident spread out.
fn jittered(secs: i64) -> i64 {
    let factor: f64 = rand::rng().random_range(0.9..1.1);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let jittered = (secs as f64 * factor) as i64;
    jittered.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        assert_eq!(backoff_secs(1), 30);
        assert_eq!(backoff_secs(2), 60);
        assert_eq!(backoff_secs(3), 120);
        assert_eq!(backoff_secs(4), 240);
    }

    #[test]
    fn test_backoff_caps_at_one_hour() {
        assert_eq!(backoff_secs(8), MAX_BACKOFF_SECS);
        assert_eq!(backoff_secs(30), MAX_BACKOFF_SECS);
    }

    #[test]
    fn test_jitter_stays_close_to_base() {
        for _ in 0..100 {
            let delay = jittered(100);
            assert!((90..=110).contains(&delay));
        }
    }
}
