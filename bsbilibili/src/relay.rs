//! Relais des médias (audio et pochettes)
//!
//! Les octets sont transmis au fil de l'eau, sans jamais mettre la réponse
//! entière en mémoire. Chaque morceau reçu est redécoupé en tranches d'au
//! plus [`MAX_CHUNK_SIZE`] octets.

use crate::api::catalog;
use crate::error::{BilibiliError, Result};
use crate::session::UpstreamSession;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Response;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST, HeaderMap, REFERER, USER_AGENT};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, info, warn};
use url::Url;

/// Taille maximale d'une tranche relayée
pub const MAX_CHUNK_SIZE: usize = 32 * 1024;

/// Flux d'octets d'un média amont, avec les en-têtes à propager
pub struct MediaStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>,
    /// `Content-Length` amont tel quel, s'il est connu
    pub content_length: Option<String>,
    pub content_type: Option<String>,
}

impl MediaStream {
    pub(crate) fn new(
        stream: impl Stream<Item = Result<Bytes>> + Send + 'static,
        content_length: Option<String>,
        content_type: Option<String>,
    ) -> Self {
        Self {
            inner: Box::pin(stream),
            content_length,
            content_type,
        }
    }

    fn from_response(label: String, response: Response) -> Self {
        let content_length = header_string(response.headers(), CONTENT_LENGTH);
        let content_type = header_string(response.headers(), CONTENT_TYPE);
        Self::new(
            bounded_chunks(label, response.bytes_stream()),
            content_length,
            content_type,
        )
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl Stream for MediaStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Réponse à un HEAD sur une pochette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHead {
    pub status: u16,
    pub content_length: Option<String>,
    pub content_type: Option<String>,
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Journalise le bilan du relais quelle que soit la façon dont il se termine
struct RelayGuard {
    label: String,
    bytes: u64,
    finished: bool,
    failed: bool,
}

impl Drop for RelayGuard {
    fn drop(&mut self) {
        if self.failed {
            warn!("Relay {} aborted by upstream after {} bytes", self.label, self.bytes);
        } else if self.finished {
            debug!("Relay {} finished, {} bytes", self.label, self.bytes);
        } else {
            info!("Relay {} dropped by client after {} bytes", self.label, self.bytes);
        }
    }
}

/// Redécoupe un flux amont en tranches non vides d'au plus 32 Kio
///
/// La première erreur est transmise après toutes les tranches déjà reçues,
/// puis le flux se termine. Le flux amont est libéré au drop, y compris
/// quand le client se déconnecte.
pub fn bounded_chunks<S, E>(
    label: String,
    upstream: S,
) -> impl Stream<Item = Result<Bytes>> + Send + 'static
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<BilibiliError> + Send + 'static,
{
    async_stream::stream! {
        let mut guard = RelayGuard {
            label,
            bytes: 0,
            finished: false,
            failed: false,
        };
        let mut upstream = Box::pin(upstream);

        while let Some(item) = upstream.next().await {
            match item {
                Ok(mut bytes) => {
                    while !bytes.is_empty() {
                        let chunk = bytes.split_to(bytes.len().min(MAX_CHUNK_SIZE));
                        guard.bytes += chunk.len() as u64;
                        yield Ok(chunk);
                    }
                }
                Err(e) => {
                    guard.failed = true;
                    yield Err(e.into());
                    break;
                }
            }
        }
        guard.finished = !guard.failed;
    }
}

/// Transforme une URL de pochette relative au protocole en URL `http:`
///
/// Toute autre forme est refusée sans requête.
pub fn cover_fetch_url(cover_url: &str) -> Result<Url> {
    if !cover_url.starts_with("//") {
        return Err(BilibiliError::Configuration(format!(
            "cover URL must be protocol-relative: {}",
            cover_url
        )));
    }
    Ok(Url::parse(&format!("http:{}", cover_url))?)
}

fn check_media_status(label: &str, response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    warn!("Media fetch {} answered {}", label, status);
    Err(BilibiliError::from_status_code(
        status.as_u16(),
        status.canonical_reason().unwrap_or("media fetch failed"),
    ))
}

/// Ouvre le flux d'une pochette
pub async fn open_cover_stream(session: &UpstreamSession, cover_url: &str) -> Result<MediaStream> {
    let url = cover_fetch_url(cover_url)?;
    debug!("GET {} (cover)", url);

    let response = session.client().get(url.clone()).send().await?;
    check_media_status(url.as_str(), &response)?;
    Ok(MediaStream::from_response(format!("cover {}", url), response))
}

/// Vérifie l'existence d'une pochette par un HEAD
pub async fn head_cover(session: &UpstreamSession, cover_url: &str) -> Result<MediaHead> {
    let url = cover_fetch_url(cover_url)?;
    debug!("HEAD {} (cover)", url);

    let response = session.client().head(url.clone()).send().await?;
    check_media_status(url.as_str(), &response)?;
    Ok(MediaHead {
        status: response.status().as_u16(),
        content_length: header_string(response.headers(), CONTENT_LENGTH),
        content_type: header_string(response.headers(), CONTENT_TYPE),
    })
}

/// Valeur de l'en-tête `Host` attendue par le CDN pour une URL signée
fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| BilibiliError::Configuration(format!("signed URL without host: {}", url)))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Ouvre le flux audio d'une vidéo
///
/// Résout `cid` puis l'URL signée et la télécharge avec le client sans
/// cookies, en présentant le `Referer` et le `Host` exigés par le CDN.
pub async fn open_audio_stream(session: &UpstreamSession, canonical_id: &str) -> Result<MediaStream> {
    let locator = catalog::resolve_playable(session, canonical_id).await?;
    let url = locator.media_url;
    debug!(
        "GET signed audio for {} (cid {})",
        locator.canonical_id, locator.content_index
    );

    let response = session
        .media_client()
        .get(url.clone())
        .header(REFERER, session.landing_origin())
        .header(HOST, host_header(&url)?)
        .header(USER_AGENT, session.user_agent())
        .send()
        .await?;
    check_media_status(&locator.canonical_id, &response)?;

    Ok(MediaStream::from_response(
        format!("audio {}", locator.canonical_id),
        response,
    ))
}
