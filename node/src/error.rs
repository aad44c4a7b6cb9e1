use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("store error: {0}")]
    Store(#[from] evote_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] evote_store_lmdb::LmdbError),

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("import error: {0}")]
    Import(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RPC server error: {0}")]
    Rpc(#[from] evote_rpc::RpcError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
