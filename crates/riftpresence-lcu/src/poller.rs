//! Endpoint readiness polling
//!
//! Both local APIs (the client's REST surface and the live-game data server)
//! come and go with their host processes. `wait_until_ready` blocks until an
//! endpoint answers with a success status, per the caller's timeout policy.
//! Certificate validation is disabled: these are loopback services with
//! self-signed certificates.

use riftpresence_core::{LcuError, ENDPOINT_POLL_INTERVAL};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long to keep polling an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Poll until the endpoint answers.
    Infinite,
    /// Poll for at most this long.
    Bounded(Duration),
    /// One attempt, no retry.
    SingleShot,
}

impl TimeoutPolicy {
    /// Whether another attempt is allowed, given when polling started.
    pub fn allows_retry(&self, started: Instant, now: Instant) -> bool {
        match self {
            TimeoutPolicy::Infinite => true,
            TimeoutPolicy::SingleShot => false,
            TimeoutPolicy::Bounded(limit) => now.duration_since(started) < *limit,
        }
    }
}

/// Build an HTTP client for the local self-signed endpoints.
pub fn insecure_client() -> Result<reqwest::Client, LcuError> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| LcuError::ConnectionError(e.to_string()))
}

/// Poll `url` until it responds with a success status or the policy runs out.
pub async fn wait_until_ready(
    client: &reqwest::Client,
    url: &str,
    policy: TimeoutPolicy,
) -> Result<reqwest::Response, LcuError> {
    let started = Instant::now();
    loop {
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                debug!(url, status = %response.status(), "Endpoint not ready yet");
            }
            Err(e) => {
                debug!(url, error = %e, "Endpoint unreachable");
            }
        }

        if !policy.allows_retry(started, Instant::now()) {
            return Err(LcuError::Timeout(url.to_string()));
        }
        tokio::time::sleep(ENDPOINT_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_shot_never_retries() {
        let t0 = Instant::now();
        assert!(!TimeoutPolicy::SingleShot.allows_retry(t0, t0));
    }

    #[test]
    fn infinite_always_retries() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(86_400);
        assert!(TimeoutPolicy::Infinite.allows_retry(t0, later));
    }

    #[test]
    fn bounded_retries_until_deadline() {
        let policy = TimeoutPolicy::Bounded(Duration::from_secs(30));
        let t0 = Instant::now();
        assert!(policy.allows_retry(t0, t0 + Duration::from_secs(29)));
        assert!(!policy.allows_retry(t0, t0 + Duration::from_secs(30)));
        assert!(!policy.allows_retry(t0, t0 + Duration::from_secs(31)));
    }
}
