//! Fixed-interval connection retry

use crate::ConnectError;
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// A required external dependency that can be opened and probed.
#[async_trait]
pub trait Dependency: Send + Sync {
    /// Live connection handle produced by a successful attempt
    type Handle: Send + Sync;

    /// Human-readable name used in logs and errors
    fn name(&self) -> &str;

    /// Open a new connection
    async fn open(&self) -> anyhow::Result<Self::Handle>;

    /// Round-trip liveness probe on an opened connection
    async fn ping(&self, handle: &Self::Handle) -> anyhow::Result<()>;
}

/// Retry policy for startup connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Maximum number of connection attempts
    pub max_attempts: u32,

    /// Fixed sleep between consecutive attempts
    pub interval: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(2),
        }
    }
}

/// Connection lifecycle of a single dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No attempt made yet
    Disconnected,
    /// Attempt in progress (1-based)
    Connecting {
        /// Current attempt number
        attempt: u32,
    },
    /// Connected and probed
    Connected,
    /// Attempt bound exhausted
    Failed,
}

impl ConnectionState {
    /// Stable lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting { .. } => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting { attempt } => write!(f, "connecting (attempt {})", attempt),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Connects one dependency, publishing its state to observers.
pub struct Connector {
    policy: BackoffPolicy,
    state: watch::Sender<ConnectionState>,
    attempts: AtomicU32,
}

impl Connector {
    /// Create a connector in the `Disconnected` state
    pub fn new(policy: BackoffPolicy) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            policy,
            state,
            attempts: AtomicU32::new(0),
        }
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Attempts made by the last `connect` call
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Connect with fixed backoff until success or the attempt bound.
    ///
    /// There is no sleep after the final failed attempt.
    pub async fn connect<D: Dependency>(&self, dependency: &D) -> Result<D::Handle, ConnectError> {
        let name = dependency.name();
        let max_attempts = self.policy.max_attempts;
        let mut last_error = String::from("no connection attempts permitted");

        self.attempts.store(0, Ordering::Relaxed);

        for attempt in 1..=max_attempts {
            self.attempts.store(attempt, Ordering::Relaxed);
            self.state.send_replace(ConnectionState::Connecting { attempt });

            match Self::attempt(dependency).await {
                Ok(handle) => {
                    info!("Connected to {} (attempt {}/{})", name, attempt, max_attempts);
                    self.state.send_replace(ConnectionState::Connected);
                    return Ok(handle);
                }
                Err(e) => {
                    warn!(
                        "Unable to connect to {} (attempt {}/{}): {:#}",
                        name, attempt, max_attempts, e
                    );
                    last_error = format!("{:#}", e);

                    if attempt < max_attempts {
                        info!("Backing off for {:?}", self.policy.interval);
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        error!("Giving up on {} after {} attempts", name, max_attempts);
        self.state.send_replace(ConnectionState::Failed);

        Err(ConnectError::Exhausted {
            dependency: name.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }

    async fn attempt<D: Dependency>(dependency: &D) -> anyhow::Result<D::Handle> {
        let handle = dependency.open().await?;
        // Dropping the handle on a failed probe releases the connection.
        dependency.ping(&handle).await?;
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct FlakyDependency {
        open_failures: u32,
        ping_always_fails: bool,
        attempts: AtomicU32,
        attempted_at: Mutex<Vec<Instant>>,
    }

    impl FlakyDependency {
        fn failing_first(open_failures: u32) -> Self {
            Self {
                open_failures,
                ping_always_fails: false,
                attempts: AtomicU32::new(0),
                attempted_at: Mutex::new(Vec::new()),
            }
        }

        fn never_alive() -> Self {
            Self {
                open_failures: 0,
                ping_always_fails: true,
                attempts: AtomicU32::new(0),
                attempted_at: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Dependency for FlakyDependency {
        type Handle = u32;

        fn name(&self) -> &str {
            "flaky-store"
        }

        async fn open(&self) -> anyhow::Result<u32> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            self.attempted_at.lock().unwrap().push(Instant::now());
            if attempt <= self.open_failures {
                anyhow::bail!("connection refused");
            }
            Ok(attempt)
        }

        async fn ping(&self, _handle: &u32) -> anyhow::Result<()> {
            if self.ping_always_fails {
                anyhow::bail!("ping timed out");
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_connects_after_three_failures() {
        let dependency = FlakyDependency::failing_first(3);
        let connector = Connector::new(BackoffPolicy::default());

        let handle = connector.connect(&dependency).await.unwrap();

        assert_eq!(handle, 4);
        assert_eq!(dependency.attempts.load(Ordering::SeqCst), 4);
        assert_eq!(connector.attempts(), 4);
        assert_eq!(connector.state(), ConnectionState::Connected);

        let attempted_at = dependency.attempted_at.lock().unwrap();
        for pair in attempted_at.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(2));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_ten_attempts() {
        let dependency = FlakyDependency::failing_first(u32::MAX);
        let connector = Connector::new(BackoffPolicy::default());
        let started = Instant::now();

        let err = connector.connect(&dependency).await.unwrap_err();

        assert_eq!(dependency.attempts.load(Ordering::SeqCst), 10);
        assert_eq!(connector.state(), ConnectionState::Failed);
        // nine sleeps between ten attempts
        assert!(started.elapsed() >= Duration::from_secs(18));
        assert!(started.elapsed() < Duration::from_secs(20));

        match err {
            ConnectError::Exhausted { dependency, attempts, last_error } => {
                assert_eq!(dependency, "flaky-store");
                assert_eq!(attempts, 10);
                assert!(last_error.contains("connection refused"));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_ping_counts_as_failed_attempt() {
        let dependency = FlakyDependency::never_alive();
        let connector = Connector::new(BackoffPolicy {
            max_attempts: 3,
            interval: Duration::from_millis(500),
        });

        let err = connector.connect(&dependency).await.unwrap_err();

        assert_eq!(dependency.attempts.load(Ordering::SeqCst), 3);
        assert!(err.to_string().contains("ping timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_observers_see_transitions() {
        let dependency = FlakyDependency::failing_first(1);
        let connector = Connector::new(BackoffPolicy::default());
        let receiver = connector.subscribe();

        assert_eq!(*receiver.borrow(), ConnectionState::Disconnected);

        connector.connect(&dependency).await.unwrap();

        assert_eq!(*receiver.borrow(), ConnectionState::Connected);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ConnectionState::Connecting { attempt: 2 }.to_string(), "connecting (attempt 2)");
        assert_eq!(ConnectionState::Failed.as_str(), "failed");
    }
}
