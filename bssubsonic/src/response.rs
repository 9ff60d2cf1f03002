//! Choix de l'encodage, paramètres de requête et émission des enveloppes

use crate::error::{Result, SubsonicError};
use crate::legacy;
use crate::model::SubsonicResponse;
use crate::state::SubsonicState;
use crate::strict;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::convert::Infallible;
use tracing::error;

/// Surface invoquée par le client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// JSON, chemins `/rest/<op>.view`
    Legacy,
    /// XML, chemins `/rest/<op>`
    Strict,
}

impl Encoding {
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".view") {
            Encoding::Legacy
        } else {
            Encoding::Strict
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Encoding::Legacy => "application/json",
            Encoding::Strict => "application/xml",
        }
    }

    /// Sérialise l'enveloppe dans cet encodage
    pub fn render(&self, response: &SubsonicResponse) -> Result<String> {
        match self {
            Encoding::Legacy => {
                legacy::to_json(response).map_err(|e| SubsonicError::Encoding(e.to_string()))
            }
            Encoding::Strict => {
                strict::to_xml(response).map_err(|e| SubsonicError::Encoding(e.to_string()))
            }
        }
    }
}

impl<S> FromRequestParts<S> for Encoding
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        Ok(Encoding::from_path(parts.uri.path()))
    }
}

/// Paramètres de la query string, dans l'ordre et avec leurs répétitions
///
/// `star?id=a&id=b` doit rester exploitable, d'où une liste de paires plutôt
/// qu'une map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn from_uri(uri: &Uri) -> Result<Self> {
        Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| Self(pairs))
            .map_err(|e| SubsonicError::validation(e.body_text()))
    }

    /// Première valeur du paramètre
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Valeur obligatoire et non vide
    pub fn require(&self, name: &str) -> Result<&str> {
        match self.get(name).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(SubsonicError::missing_parameter(name)),
        }
    }
}

impl FromRequestParts<SubsonicState> for Params {
    type Rejection = Reply;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SubsonicState,
    ) -> std::result::Result<Self, Self::Rejection> {
        Params::from_uri(&parts.uri)
            .map_err(|err| state.failed(Encoding::from_path(parts.uri.path()), "query", err))
    }
}

/// Enveloppe prête à être émise dans l'encodage de la surface invoquée
#[derive(Debug)]
pub struct Reply {
    encoding: Encoding,
    status: StatusCode,
    response: SubsonicResponse,
}

impl Reply {
    pub fn ok(encoding: Encoding, response: SubsonicResponse) -> Self {
        Self {
            encoding,
            status: StatusCode::OK,
            response,
        }
    }

    pub fn failed(encoding: Encoding, server_type: &str, err: &SubsonicError) -> Self {
        Self {
            encoding,
            status: err.status_code(),
            response: SubsonicResponse::failed(server_type, err.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn response(&self) -> &SubsonicResponse {
        &self.response
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.encoding.render(&self.response) {
            Ok(body) => (
                self.status,
                [(CONTENT_TYPE, self.encoding.content_type())],
                body,
            )
                .into_response(),
            Err(err) => {
                error!("{}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_from_path() {
        assert_eq!(Encoding::from_path("/rest/ping.view"), Encoding::Legacy);
        assert_eq!(Encoding::from_path("/rest/ping"), Encoding::Strict);
        assert_eq!(Encoding::from_path("/"), Encoding::Strict);
    }

    #[test]
    fn test_params_keep_repeated_values() {
        let uri: Uri = "/rest/star.view?u=voyage&id=a&id=b&query=hello%20world"
            .parse()
            .unwrap();
        let params = Params::from_uri(&uri).unwrap();

        assert_eq!(params.get("u"), Some("voyage"));
        assert_eq!(params.get_all("id"), vec!["a", "b"]);
        assert_eq!(params.get("query"), Some("hello world"));
        assert!(params.get("missing").is_none());
    }

    #[test]
    fn test_require_rejects_blank() {
        let params = Params::new(vec![("id".into(), "  ".into())]);
        let err = params.require("id").unwrap_err();
        assert_eq!(err.to_string(), "Required parameter is missing: id");
        assert!(params.require("name").is_err());
    }
}
