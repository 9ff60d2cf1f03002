//! État partagé des handlers Subsonic

use crate::error::SubsonicError;
use crate::model::{Payload, SubsonicResponse};
use crate::response::{Encoding, Reply};
use bsbilibili::UpstreamSession;
use bsstore::{PlaylistStore, StarredStore};
use std::path::Path;
use std::sync::Arc;
use tracing::error;

pub const DEFAULT_USERNAME: &str = "voyage";
pub const DEFAULT_PASSWORD: &str = "141592";
pub const DEFAULT_SERVER_TYPE: &str = "bilisonic";

/// Identifiants et identité annoncée du serveur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsonicSettings {
    pub username: String,
    pub password: String,
    /// Valeur de l'attribut `type` des enveloppes
    pub server_type: String,
}

impl Default for SubsonicSettings {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            server_type: DEFAULT_SERVER_TYPE.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct SubsonicState {
    pub session: UpstreamSession,
    pub starred: Arc<StarredStore>,
    pub playlists: Arc<PlaylistStore>,
    pub settings: Arc<SubsonicSettings>,
}

impl SubsonicState {
    pub fn new(
        session: UpstreamSession,
        starred: StarredStore,
        playlists: PlaylistStore,
        settings: SubsonicSettings,
    ) -> Self {
        Self {
            session,
            starred: Arc::new(starred),
            playlists: Arc::new(playlists),
            settings: Arc::new(settings),
        }
    }

    /// Ouvre les deux stores dans `storage_dir`
    pub fn with_storage(
        session: UpstreamSession,
        storage_dir: impl AsRef<Path>,
        settings: SubsonicSettings,
    ) -> Self {
        let dir = storage_dir.as_ref();
        Self::new(
            session,
            StarredStore::new(dir),
            PlaylistStore::new(dir),
            settings,
        )
    }

    pub fn server_type(&self) -> &str {
        &self.settings.server_type
    }

    /// Enveloppe en échec, journalisée
    pub fn failed(&self, encoding: Encoding, operation: &str, err: SubsonicError) -> Reply {
        error!("{} failed: {}", operation, err);
        Reply::failed(encoding, self.server_type(), &err)
    }

    /// Termine une opération : enveloppe `ok` ou `failed` selon le résultat
    pub fn reply(
        &self,
        encoding: Encoding,
        operation: &str,
        result: crate::error::Result<Option<Payload>>,
    ) -> Reply {
        match result {
            Ok(payload) => Reply::ok(encoding, SubsonicResponse::ok(self.server_type(), payload)),
            Err(err) => self.failed(encoding, operation, err),
        }
    }
}

impl std::fmt::Debug for SubsonicState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsonicState")
            .field("session", &self.session)
            .field("server_type", &self.settings.server_type)
            .finish()
    }
}
