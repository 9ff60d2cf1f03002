//! Couche d'accès à l'API REST Bilibili
//!
//! Toutes les réponses JSON de Bilibili partagent l'enveloppe
//! `{"code": 0, "message": "0", "data": ...}`. Ce module envoie les requêtes
//! avec le client de session, vérifie l'enveloppe et rend `data`.

pub mod catalog;

use crate::error::{BilibiliError, Result};
use crate::session::UpstreamSession;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Effectue un GET sur un endpoint d'API et rend le champ `data`
pub(crate) async fn get_data(
    session: &UpstreamSession,
    endpoint: &str,
    path: &str,
    params: &[(&str, String)],
) -> Result<Value> {
    let url = session.api_url(path);
    debug!("GET {} with {} params", url, params.len());

    let response = session.client().get(&url).query(params).send().await?;
    handle_response(endpoint, response).await
}

/// Traite la réponse HTTP et l'enveloppe Bilibili
async fn handle_response(endpoint: &str, response: Response) -> Result<Value> {
    let status = response.status();
    debug!("{} response status: {}", endpoint, status);

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!("{} HTTP error ({}): {}", endpoint, status.as_u16(), error_text);
        return Err(BilibiliError::from_status_code(status.as_u16(), error_text));
    }

    let text = response.text().await?;
    let mut json: Value = serde_json::from_str(&text).map_err(|e| {
        warn!("Failed to parse {} response: {}", endpoint, e);
        BilibiliError::Json(e)
    })?;

    let code = json
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| BilibiliError::schema(endpoint, "code"))?;

    if code != 0 {
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        warn!("Bilibili API error on {} ({}): {}", endpoint, code, message);
        return Err(BilibiliError::api(code, message));
    }

    Ok(json.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}

/// Décode une valeur typée; tout écart de forme devient `Schema{endpoint, field}`
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, field: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        warn!("Unexpected {} payload at `{}`: {}", endpoint, field, e);
        BilibiliError::schema(endpoint, field)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchData;
    use serde_json::json;

    #[test]
    fn test_decode_reports_endpoint_and_field() {
        let err = decode::<SearchData>("search", "data.result", json!({"numResults": 0}))
            .unwrap_err();
        match err {
            BilibiliError::Schema { endpoint, field } => {
                assert_eq!(endpoint, "search");
                assert_eq!(field, "data.result");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
