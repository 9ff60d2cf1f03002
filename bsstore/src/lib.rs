//! # bsstore - Persistance à plat de BiliSonic
//!
//! Deux petits fichiers dans le répertoire de stockage :
//!
//! - `starred.dat` : identifiants favoris, un par ligne ([`StarredStore`])
//! - `playlists.dat` : tableau JSON de [`PlaylistRecord`] ([`PlaylistStore`])
//!
//! Un fichier absent vaut un ensemble vide; il est créé à la première écriture.
//! Chaque store sérialise ses cycles lecture-modification-écriture derrière
//! son propre `tokio::sync::Mutex`.

pub mod error;
pub mod playlists;
pub mod starred;

pub use error::{Result, StoreError};
pub use playlists::{PLAYLIST_ID_PREFIX, PlaylistRecord, PlaylistStore};
pub use starred::StarredStore;

use std::path::Path;

/// Écrit un fichier en passant par un fichier temporaire renommé
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Lit un fichier texte; `None` s'il n'existe pas encore
pub(crate) async fn read_optional(path: &Path) -> std::io::Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
