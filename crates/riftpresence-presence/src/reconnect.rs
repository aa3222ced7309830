//! Link reconnect policy
//!
//! Discord restarts, crashes, or is simply closed while a game runs. When
//! the link drops we retry the handshake on a fixed budget; only when the
//! whole budget is spent does the failure surface to the caller.

use riftpresence_core::{PresenceError, PresenceLink, RECONNECT_DELAY, RECONNECT_MAX_TRIES};
use std::time::Duration;
use tracing::{info, warn};

/// Re-establish a dropped link using the default budget.
pub async fn attempt_reconnect(link: &mut dyn PresenceLink) -> Result<(), PresenceError> {
    attempt_reconnect_with(link, RECONNECT_MAX_TRIES, RECONNECT_DELAY).await
}

/// Re-establish a dropped link, waiting `delay` between attempts.
pub async fn attempt_reconnect_with(
    link: &mut dyn PresenceLink,
    max_tries: u32,
    delay: Duration,
) -> Result<(), PresenceError> {
    for attempt in 1..=max_tries {
        match link.connect() {
            Ok(()) => {
                info!(link = link.name(), attempt, "Link re-established");
                return Ok(());
            }
            Err(e) => {
                warn!(
                    link = link.name(),
                    attempt,
                    max_tries,
                    error = %e,
                    "Reconnect attempt failed"
                );
            }
        }
        if attempt < max_tries {
            tokio::time::sleep(delay).await;
        }
    }
    Err(PresenceError::RetryExhausted {
        attempts: max_tries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use riftpresence_core::PresencePayload;

    /// Link whose first `fail_for` connect attempts are refused.
    struct FlakyLink {
        fail_for: u32,
        connects: u32,
    }

    impl FlakyLink {
        fn new(fail_for: u32) -> Self {
            Self {
                fail_for,
                connects: 0,
            }
        }
    }

    impl PresenceLink for FlakyLink {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn connect(&mut self) -> Result<(), PresenceError> {
            self.connects += 1;
            if self.connects <= self.fail_for {
                Err(PresenceError::Handshake("refused".into()))
            } else {
                Ok(())
            }
        }

        fn update(&mut self, _payload: &PresencePayload) -> Result<(), PresenceError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), PresenceError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_the_peer_returns() {
        let mut link = FlakyLink::new(3);
        attempt_reconnect_with(&mut link, 12, Duration::from_secs(5))
            .await
            .expect("reconnect");
        assert_eq!(link.connects, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_the_budget_and_reports_it() {
        let mut link = FlakyLink::new(u32::MAX);
        let err = attempt_reconnect_with(&mut link, 12, Duration::from_secs(5))
            .await
            .expect_err("must exhaust");
        assert_eq!(link.connects, 12);
        match err {
            PresenceError::RetryExhausted { attempts } => assert_eq!(attempts, 12),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_needs_no_delay() {
        let mut link = FlakyLink::new(0);
        let started = tokio::time::Instant::now();
        attempt_reconnect_with(&mut link, 12, Duration::from_secs(5))
            .await
            .expect("reconnect");
        assert_eq!(link.connects, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
