//! Convention d'identifiants des playlists
//!
//! - identifiant : `bili-<mediaId>`
//! - nom à la création : `bili-<name>-<mediaId>`, le nom pouvant contenir des `-`

use crate::error::{Result, SubsonicError};

const PREFIX: &str = "bili";

/// Nom de playlist décomposé
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistName {
    pub name: String,
    pub media_id: String,
}

fn segments(value: &str, min: usize) -> Result<Vec<&str>> {
    let parts: Vec<&str> = value.split('-').collect();
    if parts.len() < min || parts[0] != PREFIX {
        return Err(SubsonicError::validation(format!(
            "Invalid playlist identifier: {}",
            value
        )));
    }
    Ok(parts)
}

/// Décompose `bili-<name>-<mediaId>`
pub fn parse_playlist_name(value: &str) -> Result<PlaylistName> {
    let parts = segments(value, 3)?;
    let media_id = parts[parts.len() - 1];
    let name = parts[1..parts.len() - 1].join("-");
    if name.is_empty() || media_id.is_empty() {
        return Err(SubsonicError::validation(format!(
            "Invalid playlist name: {}",
            value
        )));
    }
    Ok(PlaylistName {
        name,
        media_id: media_id.to_string(),
    })
}

/// Extrait `mediaId` de `bili-<mediaId>`
pub fn parse_playlist_id(value: &str) -> Result<String> {
    let parts = segments(value, 2)?;
    let media_id = parts[1..].join("-");
    if media_id.is_empty() {
        return Err(SubsonicError::validation(format!(
            "Invalid playlist identifier: {}",
            value
        )));
    }
    Ok(media_id)
}
