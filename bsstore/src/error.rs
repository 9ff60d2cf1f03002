//! Types d'erreurs pour bsstore

/// Erreurs de persistance
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type Result spécialisé pour bsstore
pub type Result<T> = std::result::Result<T, StoreError>;
