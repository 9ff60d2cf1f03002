//! Erreurs du protocole Subsonic

use axum::http::StatusCode;
use bsbilibili::BilibiliError;
use bsstore::StoreError;
use thiserror::Error;

/// Code Subsonic : identifiants refusés
pub const CODE_WRONG_CREDENTIALS: u32 = 40;
/// Code Subsonic utilisé pour tout autre échec
pub const CODE_GENERIC: u32 = 50;

pub type Result<T> = std::result::Result<T, SubsonicError>;

#[derive(Error, Debug)]
pub enum SubsonicError {
    #[error("Wrong username or password")]
    Unauthorized,

    /// Paramètre absent ou mal formé
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] BilibiliError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot encode response: {0}")]
    Encoding(String),
}

impl SubsonicError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::Validation(format!("Required parameter is missing: {}", name))
    }

    /// Code d'erreur Subsonic
    pub fn code(&self) -> u32 {
        match self {
            SubsonicError::Unauthorized => CODE_WRONG_CREDENTIALS,
            _ => CODE_GENERIC,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SubsonicError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
