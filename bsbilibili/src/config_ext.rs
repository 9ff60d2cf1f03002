//! Extension pour lire la section `bilibili` de bsconfig
//!
//! Ce module fournit le trait `BilibiliConfigExt` qui construit les
//! [`SessionSettings`] à partir de la configuration.

use crate::session::{
    DEFAULT_API_BASE, DEFAULT_FAVORITES_MAX_PAGES, DEFAULT_LANDING_URL, DEFAULT_USER_AGENT,
    SessionSettings,
};
use anyhow::Result;
use bsconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

/// Trait d'extension pour la configuration Bilibili
///
/// # Exemple
///
/// ```rust,ignore
/// use bsconfig::get_config;
/// use bsbilibili::{BilibiliConfigExt, UpstreamSession};
///
/// let settings = get_config().get_bilibili_settings();
/// let session = UpstreamSession::open(settings).await?;
/// ```
pub trait BilibiliConfigExt {
    /// Page d'accueil visitée à l'ouverture de session
    fn get_bilibili_landing_url(&self) -> String;

    /// URL de base de l'API
    fn get_bilibili_api_base(&self) -> String;

    fn get_bilibili_user_agent(&self) -> String;

    /// Délai des requêtes d'API; `None` quand la valeur vaut 0 ou manque
    fn get_bilibili_request_timeout(&self) -> Option<Duration>;

    fn get_bilibili_favorites_max_pages(&self) -> u32;

    /// Définit l'URL de base de l'API
    fn set_bilibili_api_base(&self, url: &str) -> Result<()>;

    /// Rassemble tous les paramètres de session
    fn get_bilibili_settings(&self) -> SessionSettings {
        SessionSettings {
            landing_url: self.get_bilibili_landing_url(),
            api_base: self.get_bilibili_api_base(),
            user_agent: self.get_bilibili_user_agent(),
            request_timeout: self.get_bilibili_request_timeout(),
            favorites_max_pages: self.get_bilibili_favorites_max_pages(),
        }
    }
}

fn non_empty(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl BilibiliConfigExt for Config {
    fn get_bilibili_landing_url(&self) -> String {
        non_empty(
            self.get_string_or(&["bilibili", "landing_url"], DEFAULT_LANDING_URL),
            DEFAULT_LANDING_URL,
        )
    }

    fn get_bilibili_api_base(&self) -> String {
        non_empty(
            self.get_string_or(&["bilibili", "api_base"], DEFAULT_API_BASE),
            DEFAULT_API_BASE,
        )
    }

    fn get_bilibili_user_agent(&self) -> String {
        non_empty(
            self.get_string_or(&["bilibili", "user_agent"], DEFAULT_USER_AGENT),
            DEFAULT_USER_AGENT,
        )
    }

    fn get_bilibili_request_timeout(&self) -> Option<Duration> {
        match self.get_u64_or(&["bilibili", "request_timeout_secs"], 0) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    fn get_bilibili_favorites_max_pages(&self) -> u32 {
        let pages = self.get_u64_or(
            &["bilibili", "favorites_max_pages"],
            u64::from(DEFAULT_FAVORITES_MAX_PAGES),
        );
        u32::try_from(pages).unwrap_or(DEFAULT_FAVORITES_MAX_PAGES).max(1)
    }

    fn set_bilibili_api_base(&self, url: &str) -> Result<()> {
        self.set_value(&["bilibili", "api_base"], Value::String(url.to_string()))
    }
}
