//! Shared handler state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use evote_audit::{AdminFeed, AuditSink};
use evote_ballot::VoteCaster;
use evote_crypto::TokenSigner;
use evote_eligibility::EligibilityResolver;
use evote_store::VotingStore;
use evote_types::{CancelFlag, Clock};

use crate::error::RpcError;
use crate::metrics::ServiceMetrics;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Cloned into every handler; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VotingStore>,
    pub clock: Arc<dyn Clock>,
    pub caster: Arc<VoteCaster<dyn VotingStore>>,
    pub resolver: Arc<EligibilityResolver<dyn VotingStore>>,
    pub signer: Arc<TokenSigner>,
    pub metrics: Arc<ServiceMetrics>,
    /// `None` disables the admin live feed route.
    pub feed: Option<AdminFeed>,
    pub request_timeout: Duration,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn VotingStore>,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
        signer: TokenSigner,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        let caster = VoteCaster::new(store.clone(), clock.clone(), audit);
        let resolver = EligibilityResolver::new(store.clone(), clock.clone());
        Self {
            store,
            clock,
            caster: Arc::new(caster),
            resolver: Arc::new(resolver),
            signer: Arc::new(signer),
            metrics,
            feed: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            started_at: Instant::now(),
        }
    }

    pub fn with_feed(mut self, feed: AdminFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Run storage work on the blocking pool, bounded by the request timeout.
    ///
    /// `work` receives a [`CancelFlag`]. It is raised if this future is
    /// dropped before the work returns, or when the timeout elapses; a write
    /// transaction that sees it raised at commit time is rolled back. On
    /// timeout the work is still awaited, so a commit that won the race is
    /// reported as a success rather than lost.
    pub async fn run_blocking<T, F>(&self, work: F) -> Result<T, RpcError>
    where
        F: FnOnce(CancelFlag) -> Result<T, RpcError> + Send + 'static,
        T: Send + 'static,
    {
        let cancel = CancelFlag::new();
        let guard = cancel.cancel_on_drop();
        let flag = cancel.clone();
        let mut task = tokio::task::spawn_blocking(move || work(flag));

        let joined = match tokio::time::timeout(self.request_timeout, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                cancel.cancel();
                tracing::warn!(
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "request timed out, waiting for storage work to settle"
                );
                task.await
            }
        };
        guard.disarm();
        joined.map_err(|e| RpcError::Internal(format!("storage task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use evote_nullables::{NullAuditSink, NullClock, NullStore};

    fn state(timeout_ms: u64) -> AppState {
        AppState::new(
            Arc::new(NullStore::new()),
            Arc::new(NullClock::at_secs(1_750_000_000)),
            Arc::new(NullAuditSink::new()),
            TokenSigner::new("state-test"),
            Arc::new(ServiceMetrics::new().unwrap()),
        )
        .with_request_timeout(Duration::from_millis(timeout_ms))
    }

    #[tokio::test]
    async fn fast_work_returns_its_result() {
        let result = state(1_000).run_blocking(|_| Ok(7u32)).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn commit_that_outlives_the_timeout_is_reported() {
        let committed = Arc::new(AtomicBool::new(false));
        let seen = committed.clone();
        let result = state(50)
            .run_blocking(move |cancel| {
                if cancel.is_cancelled() {
                    return Err(RpcError::Cancelled("aborted".into()));
                }
                std::thread::sleep(Duration::from_millis(120));
                seen.store(true, Ordering::SeqCst);
                Ok("receipt")
            })
            .await;
        assert!(committed.load(Ordering::SeqCst));
        assert_eq!(result.unwrap(), "receipt");
    }

    #[tokio::test]
    async fn timeout_raises_the_flag_before_commit() {
        let result: Result<(), RpcError> = state(50)
            .run_blocking(|cancel| {
                std::thread::sleep(Duration::from_millis(120));
                if cancel.is_cancelled() {
                    return Err(RpcError::Cancelled("aborted before commit".into()));
                }
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(RpcError::Cancelled(_))));
    }

    #[tokio::test]
    async fn panicking_work_is_internal() {
        let result: Result<(), RpcError> = state(1_000)
            .run_blocking(|_| panic!("storage blew up"))
            .await;
        assert!(matches!(result, Err(RpcError::Internal(_))));
    }
}
