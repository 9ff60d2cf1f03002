//! Playlists enregistrées (`playlists.dat`)
//!
//! Une playlist BiliSonic n'est qu'un nom posé sur un dossier de favoris
//! Bilibili : son contenu est relu en amont à chaque consultation.

use crate::{Result, read_optional, write_atomic};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

pub const PLAYLISTS_FILE: &str = "playlists.dat";
pub const PLAYLIST_ID_PREFIX: &str = "bili-";

/// Playlist persistée : `id = "bili-" + mediaId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "mediaId")]
    pub media_id: String,
}

impl PlaylistRecord {
    pub fn new(name: impl Into<String>, media_id: impl Into<String>) -> Self {
        let media_id = media_id.into();
        Self {
            id: format!("{PLAYLIST_ID_PREFIX}{media_id}"),
            name: name.into(),
            media_id,
        }
    }
}

#[derive(Debug)]
pub struct PlaylistStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PlaylistStore {
    /// Store rangé dans `directory/playlists.dat`
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self::with_path(directory.as_ref().join(PLAYLISTS_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<PlaylistRecord>> {
        match read_optional(&self.path).await? {
            Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn list(&self) -> Result<Vec<PlaylistRecord>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Enregistre une playlist; une playlist existante sur le même dossier est renommée
    pub async fn create(&self, name: &str, media_id: &str) -> Result<PlaylistRecord> {
        let _guard = self.lock.lock().await;
        let mut playlists = self.read().await?;
        let record = PlaylistRecord::new(name, media_id);

        match playlists.iter_mut().find(|p| p.media_id == record.media_id) {
            Some(existing) => *existing = record.clone(),
            None => playlists.push(record.clone()),
        }

        let json = serde_json::to_vec_pretty(&playlists)?;
        write_atomic(&self.path, &json).await?;
        info!("Playlist {} saved as '{}'", record.id, record.name);
        Ok(record)
    }

    pub async fn find_by_media_id(&self, media_id: &str) -> Result<Option<PlaylistRecord>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|p| p.media_id == media_id))
    }
}
