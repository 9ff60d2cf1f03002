//! Modèle sémantique d'une réponse Subsonic
//!
//! Une seule représentation, indépendante de l'encodage : les modules
//! [`legacy`](crate::legacy) et [`strict`](crate::strict) la sérialisent
//! chacun à leur façon.

use crate::error::SubsonicError;
use bsbilibili::MediaRecord;

/// Version du protocole annoncée aux clients
pub const PROTOCOL_VERSION: &str = "1.16.1";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const XMLNS: &str = "http://subsonic.org/restapi";

const SONG_CONTENT_TYPE: &str = "audio/mpeg";
const SONG_SUFFIX: &str = "mp3";
const SONG_TYPE: &str = "music";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
}

impl From<&SubsonicError> for ErrorInfo {
    fn from(err: &SubsonicError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Morceau tel que le voit un client Subsonic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Porte le nom de l'auteur, pas son identifiant numérique
    pub artist_id: String,
    pub cover_art: String,
    pub content_type: String,
    pub suffix: String,
    pub kind: String,
    pub is_dir: bool,
    pub is_video: bool,
    pub duration: Option<u32>,
}

impl From<&MediaRecord> for Song {
    fn from(record: &MediaRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            artist: record.author_name.clone(),
            artist_id: record.author_name.clone(),
            cover_art: record.cover_url.clone(),
            content_type: SONG_CONTENT_TYPE.to_string(),
            suffix: SONG_SUFFIX.to_string(),
            kind: SONG_TYPE.to_string(),
            is_dir: false,
            is_video: false,
            duration: record.duration_seconds,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub songs: Vec<Song>,
}

impl SearchResult {
    pub fn from_records(records: &[MediaRecord]) -> Self {
        Self {
            songs: records.iter().map(Song::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub song_count: usize,
    /// Durée totale en secondes
    pub duration: u64,
    pub public: bool,
    pub owner: String,
    pub entries: Vec<Song>,
}

impl Playlist {
    /// Playlist sans contenu résolu (listes et création)
    pub fn summary(id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            song_count: 0,
            duration: 0,
            public: true,
            owner: owner.into(),
            entries: Vec::new(),
        }
    }

    /// Playlist complète : compte et durée totale calculés depuis les entrées
    pub fn with_entries(
        id: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        records: &[MediaRecord],
    ) -> Self {
        let entries: Vec<Song> = records.iter().map(Song::from).collect();
        let duration = records
            .iter()
            .filter_map(|r| r.duration_seconds)
            .map(u64::from)
            .sum();
        Self {
            song_count: entries.len(),
            duration,
            entries,
            ..Self::summary(id, name, owner)
        }
    }
}

/// Contenu d'une réponse réussie; une seule variante par réponse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Ping,
    SearchResult2(SearchResult),
    SearchResult3(SearchResult),
    Song(Song),
    Starred2(SearchResult),
    AlbumList2,
    Playlists(Vec<Playlist>),
    Playlist(Playlist),
}

/// Enveloppe `subsonic-response`
///
/// Construite uniquement par [`SubsonicResponse::ok`] ou
/// [`SubsonicResponse::failed`] : une réponse en échec porte toujours une
/// erreur et jamais de contenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsonicResponse {
    server_type: String,
    status: Status,
    error: Option<ErrorInfo>,
    payload: Option<Payload>,
}

impl SubsonicResponse {
    pub fn ok(server_type: impl Into<String>, payload: Option<Payload>) -> Self {
        Self {
            server_type: server_type.into(),
            status: Status::Ok,
            error: None,
            payload,
        }
    }

    pub fn failed(server_type: impl Into<String>, error: ErrorInfo) -> Self {
        Self {
            server_type: server_type.into(),
            status: Status::Failed,
            error: Some(error),
            payload: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn server_type(&self) -> &str {
        &self.server_type
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, duration: Option<u32>) -> MediaRecord {
        MediaRecord {
            id: id.to_string(),
            title: format!("Title {id}"),
            author_name: "Author".to_string(),
            author_id: 7,
            cover_url: "//img/x.jpg".to_string(),
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_song_mapping() {
        let song = Song::from(&record("abc", Some(90)));
        assert_eq!(song.id, "abc");
        assert_eq!(song.artist, "Author");
        assert_eq!(song.artist_id, "Author");
        assert_eq!(song.cover_art, "//img/x.jpg");
        assert_eq!(song.content_type, "audio/mpeg");
        assert_eq!(song.suffix, "mp3");
        assert_eq!(song.kind, "music");
        assert!(!song.is_dir && !song.is_video);
        assert_eq!(song.duration, Some(90));
    }

    #[test]
    fn test_playlist_totals() {
        let records = [record("a", Some(60)), record("b", None), record("c", Some(30))];
        let playlist = Playlist::with_entries("bili-1", "Mix", "voyage", &records);
        assert_eq!(playlist.song_count, 3);
        assert_eq!(playlist.duration, 90);
        assert!(playlist.public);
    }

    #[test]
    fn test_failed_envelope_has_no_payload() {
        let err = SubsonicError::Unauthorized;
        let response = SubsonicResponse::failed("bilisonic", ErrorInfo::from(&err));
        assert_eq!(response.status(), Status::Failed);
        assert_eq!(response.error().map(|e| e.code), Some(40));
        assert!(response.payload().is_none());
    }
}
