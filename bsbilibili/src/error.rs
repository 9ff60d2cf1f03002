//! Gestion des erreurs pour le client Bilibili

use thiserror::Error;

/// Type Result personnalisé pour bsbilibili
pub type Result<T> = std::result::Result<T, BilibiliError>;

/// Erreurs possibles lors des appels à Bilibili
#[derive(Error, Debug)]
pub enum BilibiliError {
    /// Erreur de transport HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de décodage JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Réponse bien formée mais sans le champ attendu
    #[error("Unexpected response from {endpoint}: missing or invalid `{field}`")]
    Schema { endpoint: String, field: String },

    /// Erreur signalée par Bilibili (`code != 0`) ou statut HTTP d'un média
    #[error("Bilibili API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Ressource absente (liste de parties vide, etc.)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Paramètre inutilisable avant tout appel réseau
    #[error("Bilibili configuration error: {0}")]
    Configuration(String),

    /// URL mal formée
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BilibiliError {
    pub fn schema(endpoint: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Schema {
            endpoint: endpoint.into(),
            field: field.into(),
        }
    }

    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Erreur pour un statut HTTP non-2xx sur un téléchargement de média
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        Self::api(i64::from(code), message)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BilibiliError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_names_endpoint_and_field() {
        let err = BilibiliError::schema("playurl", "data.dash.audio");
        assert_eq!(
            err.to_string(),
            "Unexpected response from playurl: missing or invalid `data.dash.audio`"
        );
    }

    #[test]
    fn test_status_code_maps_to_api_error() {
        match BilibiliError::from_status_code(403, "Forbidden") {
            BilibiliError::Api { code, message } => {
                assert_eq!(code, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
