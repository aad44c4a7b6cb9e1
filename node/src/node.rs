//! The running node: storage, audit worker and HTTP server wired together.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use evote_audit::{audit_channel, AdminFeed, AuditWorker};
use evote_crypto::TokenSigner;
use evote_rpc::{AppState, RpcServer, ServiceMetrics};
use evote_store::VotingStore;
use evote_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use evote_types::{AuditEvent, Clock, SystemClock};

use crate::config::NodeConfig;
use crate::shutdown::ShutdownController;
use crate::NodeError;

/// Timeout for waiting on background tasks during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
/// Buffered notifications per admin feed subscriber.
const FEED_CAPACITY: usize = 256;

/// A running evote node.
pub struct VotingNode {
    pub config: NodeConfig,
    pub store: Arc<LmdbEnvironment>,
    pub metrics: Arc<ServiceMetrics>,
    pub shutdown: Arc<ShutdownController>,
    state: AppState,
    audit_rx: Option<mpsc::Receiver<AuditEvent>>,
    local_addr: Option<SocketAddr>,
    /// Handles for spawned background tasks (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl VotingNode {
    /// Open the LMDB environment at `config.data_dir`, verify it, and prepare
    /// the HTTP state. Call [`start`](Self::start) to begin serving.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let secret = config.require_token_secret()?.to_string();

        check_data_dir(&config.data_dir).map_err(NodeError::Integrity)?;
        let store = Arc::new(LmdbEnvironment::open(
            &config.data_dir,
            config.map_size_bytes(),
        )?);

        let report = check_integrity(store.env())?;
        if !report.is_healthy() {
            for error in &report.errors {
                tracing::error!(error = %error, "integrity check");
            }
            return Err(NodeError::Integrity(report.errors.join("; ")));
        }
        tracing::info!(
            databases = report.databases_checked,
            data_dir = %config.data_dir.display(),
            "storage opened"
        );

        let metrics = Arc::new(ServiceMetrics::new().map_err(|e| NodeError::Metrics(e.to_string()))?);

        let (sink, audit_rx) = audit_channel(config.audit_channel_capacity);
        let sink = sink.with_drop_counter(metrics.audit_events_dropped.clone());

        let voting_store: Arc<dyn VotingStore> = store.clone();
        let mut state = AppState::new(
            voting_store,
            clock,
            Arc::new(sink),
            TokenSigner::new(secret),
            metrics.clone(),
        )
        .with_request_timeout(config.request_timeout());
        if config.enable_admin_feed {
            state = state.with_feed(AdminFeed::new(FEED_CAPACITY));
        }

        Ok(Self {
            config,
            store,
            metrics,
            shutdown: Arc::new(ShutdownController::new()),
            state,
            audit_rx: Some(audit_rx),
            local_addr: None,
            task_handles: Vec::new(),
        })
    }

    pub fn app_state(&self) -> &AppState {
        &self.state
    }

    /// The bound HTTP address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Spawn the audit worker and the HTTP server. Returns once the listener
    /// is bound.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        if let Some(rx) = self.audit_rx.take() {
            let worker = AuditWorker::new(rx, self.store.clone(), self.state.feed.clone());
            let shutdown_rx = self.shutdown.subscribe();
            self.task_handles
                .push(tokio::spawn(async move { worker.run(shutdown_rx).await }));
        }

        let listener = TcpListener::bind(self.config.rpc_socket_addr()?).await?;
        let addr = listener.local_addr()?;
        self.local_addr = Some(addr);

        let server =
            RpcServer::new(addr, self.state.clone()).with_metrics(self.config.enable_metrics);
        let signal = self.shutdown.signal();
        self.task_handles.push(tokio::spawn(async move {
            if let Err(e) = server.serve(listener, signal).await {
                tracing::error!(error = %e, "RPC server error");
            }
        }));

        tracing::info!(
            %addr,
            metrics = self.config.enable_metrics,
            admin_feed = self.config.enable_admin_feed,
            "evote node started"
        );
        Ok(())
    }

    /// Start, then block until SIGINT/SIGTERM.
    pub async fn run(&mut self) -> Result<(), NodeError> {
        self.start().await?;
        self.shutdown.wait_for_signal().await;
        Ok(())
    }

    /// Stop the node gracefully.
    ///
    /// 1. Sends the shutdown signal to the server and the audit worker.
    /// 2. Waits for them to finish (with timeout); the worker drains the
    ///    audit queue first.
    /// 3. Flushes LMDB.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("evote node stopping");
        self.shutdown.shutdown();

        let handles: Vec<JoinHandle<()>> = self.task_handles.drain(..).collect();
        let wait_all = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait_all).await.is_err() {
            tracing::warn!(
                timeout = ?SHUTDOWN_TIMEOUT,
                "shutdown timeout, some tasks may still be running"
            );
        }

        match self.store.env().force_sync() {
            Ok(()) => tracing::info!("LMDB flushed to disk"),
            Err(e) => tracing::warn!(error = %e, "LMDB force_sync failed"),
        }

        tracing::info!("evote node stopped");
        Ok(())
    }
}
