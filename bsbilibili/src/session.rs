//! Session anonyme auprès de Bilibili
//!
//! L'ouverture de session visite la page d'accueil pour récupérer les cookies
//! anonymes (`buvid3`, ...). Les appels d'API suivants réutilisent le même
//! client et donc le même jar de cookies. Les URL signées des médias sont
//! téléchargées avec un second client, sans cookies.

use crate::error::Result;
use reqwest::Client;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_LANDING_URL: &str = "https://www.bilibili.com";
pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36 Edg/107.0.1418.56";
pub const DEFAULT_FAVORITES_MAX_PAGES: u32 = 50;

/// Paramètres d'ouverture d'une [`UpstreamSession`]
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub landing_url: String,
    pub api_base: String,
    pub user_agent: String,
    /// Délai maximal d'une requête d'API; aucun par défaut
    pub request_timeout: Option<Duration>,
    /// Nombre maximal de pages lues pour un dossier de favoris
    pub favorites_max_pages: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            landing_url: DEFAULT_LANDING_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
            favorites_max_pages: DEFAULT_FAVORITES_MAX_PAGES,
        }
    }
}

impl SessionSettings {
    pub fn builder() -> SessionSettingsBuilder {
        SessionSettingsBuilder::default()
    }
}

/// Builder for [`SessionSettings`]
#[derive(Debug, Default)]
pub struct SessionSettingsBuilder {
    settings: SessionSettings,
}

impl SessionSettingsBuilder {
    /// Set the landing page used for the cookie handshake
    pub fn landing_url(mut self, url: impl Into<String>) -> Self {
        self.settings.landing_url = url.into();
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.settings.api_base = url.into();
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Set the API request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = Some(timeout);
        self
    }

    /// Set the favorites page cap
    pub fn favorites_max_pages(mut self, pages: u32) -> Self {
        self.settings.favorites_max_pages = pages.max(1);
        self
    }

    pub fn build(self) -> SessionSettings {
        self.settings
    }
}

struct SessionInner {
    client: Client,
    media_client: Client,
    jar: Arc<Jar>,
    landing: Url,
    api_base: String,
    settings: SessionSettings,
}

/// Poignée de session partagée entre les requêtes (clonage bon marché)
#[derive(Clone)]
pub struct UpstreamSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for UpstreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamSession")
            .field("landing", &self.inner.landing.as_str())
            .field("api_base", &self.inner.api_base)
            .finish()
    }
}

impl UpstreamSession {
    /// Ouvre une session : construit les clients puis visite la page d'accueil
    ///
    /// Seule une erreur de transport fait échouer l'ouverture. Un statut
    /// non-2xx ou l'absence de cookie sont journalisés et tolérés.
    pub async fn open(settings: SessionSettings) -> Result<Self> {
        let landing = Url::parse(&settings.landing_url)?;
        let api_base = Url::parse(&settings.api_base)?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(&settings.user_agent);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        // Le flux audio peut durer : pas de timeout global, seulement à la connexion
        let mut media_builder = Client::builder().user_agent(&settings.user_agent);
        if let Some(timeout) = settings.request_timeout {
            media_builder = media_builder.connect_timeout(timeout);
        }
        let media_client = media_builder.build()?;

        debug!("GET {} (session handshake)", landing);
        let response = client.get(landing.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Landing page answered {}, continuing without guarantees", status);
        }

        if jar.cookies(&landing).is_none() {
            warn!("No session cookie received from {}", landing);
        } else {
            info!("✅ Bilibili session opened ({})", landing);
        }

        Ok(Self {
            inner: Arc::new(SessionInner {
                client,
                media_client,
                jar,
                landing,
                api_base,
                settings,
            }),
        })
    }

    /// Client avec cookies pour l'API et les pochettes
    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// Client sans cookies pour les URL signées
    pub fn media_client(&self) -> &Client {
        &self.inner.media_client
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.inner.settings
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.settings.user_agent
    }

    /// URL complète d'un endpoint d'API (`path` commence par `/`)
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.api_base, path)
    }

    /// Origine de la page d'accueil, utilisée comme `Referer`
    pub fn landing_origin(&self) -> String {
        self.inner.landing.origin().ascii_serialization()
    }

    /// En-tête `Cookie` courant pour la page d'accueil
    pub fn cookie_header(&self) -> Option<String> {
        self.inner
            .jar
            .cookies(&self.inner.landing)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = SessionSettings::default();
        assert_eq!(settings.landing_url, DEFAULT_LANDING_URL);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert!(settings.request_timeout.is_none());
        assert_eq!(settings.favorites_max_pages, 50);
    }

    #[test]
    fn test_settings_builder() {
        let settings = SessionSettings::builder()
            .api_base("http://127.0.0.1:9000")
            .user_agent("test-agent")
            .timeout(Duration::from_secs(5))
            .favorites_max_pages(0)
            .build();
        assert_eq!(settings.api_base, "http://127.0.0.1:9000");
        assert_eq!(settings.user_agent, "test-agent");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.favorites_max_pages, 1);
    }
}
