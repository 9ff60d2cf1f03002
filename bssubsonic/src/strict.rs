//! Encodage XML des chemins sans suffixe
//!
//! Forme stricte à base d'attributs : tout attribut optionnel vide ou à sa
//! valeur par défaut est omis. Une réponse en échec ne porte que `status`,
//! `version`, `xmlns` et l'élément `<error>`.

use crate::model::{
    PROTOCOL_VERSION, Payload, Playlist, SERVER_VERSION, SearchResult, Song, Status,
    SubsonicResponse, XMLNS,
};
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Racine `<subsonic-response>`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "subsonic-response")]
pub struct StrictEnvelope {
    #[serde(rename = "@status")]
    pub status: String,

    #[serde(rename = "@version")]
    pub version: String,

    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,

    #[serde(rename = "@serverVersion", default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,

    #[serde(rename = "@openSubsonic", default, skip_serializing_if = "Option::is_none")]
    pub open_subsonic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping: Option<StrictEmpty>,

    #[serde(rename = "searchResult2", default, skip_serializing_if = "Option::is_none")]
    pub search_result2: Option<StrictSearch>,

    #[serde(rename = "searchResult3", default, skip_serializing_if = "Option::is_none")]
    pub search_result3: Option<StrictSearch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song: Option<StrictSong>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred2: Option<StrictSearch>,

    #[serde(rename = "albumList2", default, skip_serializing_if = "Option::is_none")]
    pub album_list2: Option<StrictEmpty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlists: Option<StrictPlaylists>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<StrictPlaylist>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StrictError>,
}

/// Élément vide (`<ping/>`, `<albumList2/>`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrictEmpty {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrictError {
    #[serde(rename = "@code")]
    pub code: u32,

    #[serde(rename = "@message", default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrictSearch {
    #[serde(rename = "song", default, skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<StrictSong>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrictSong {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@isDir", default, skip_serializing_if = "is_false")]
    pub is_dir: bool,

    #[serde(rename = "@title", default)]
    pub title: String,

    #[serde(rename = "@artist", default, skip_serializing_if = "String::is_empty")]
    pub artist: String,

    #[serde(rename = "@coverArt", default, skip_serializing_if = "String::is_empty")]
    pub cover_art: String,

    #[serde(rename = "@contentType", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    #[serde(rename = "@suffix", default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,

    #[serde(rename = "@duration", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    #[serde(rename = "@artistId", default, skip_serializing_if = "String::is_empty")]
    pub artist_id: String,

    #[serde(rename = "@type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(rename = "@isVideo", default, skip_serializing_if = "is_false")]
    pub is_video: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrictPlaylists {
    #[serde(rename = "playlist", default, skip_serializing_if = "Vec::is_empty")]
    pub playlists: Vec<StrictPlaylist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrictPlaylist {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@name", default)]
    pub name: String,

    #[serde(rename = "@songCount", default)]
    pub song_count: usize,

    #[serde(rename = "@duration", default, skip_serializing_if = "is_zero")]
    pub duration: u64,

    #[serde(rename = "@public", default)]
    pub public: bool,

    #[serde(rename = "@owner", default, skip_serializing_if = "String::is_empty")]
    pub owner: String,

    #[serde(rename = "entry", default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<StrictSong>,
}

impl From<&Song> for StrictSong {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.clone(),
            is_dir: song.is_dir,
            title: song.title.clone(),
            artist: song.artist.clone(),
            cover_art: song.cover_art.clone(),
            content_type: song.content_type.clone(),
            suffix: song.suffix.clone(),
            duration: song.duration.filter(|d| *d > 0),
            artist_id: song.artist_id.clone(),
            kind: song.kind.clone(),
            is_video: song.is_video,
        }
    }
}

impl From<&SearchResult> for StrictSearch {
    fn from(result: &SearchResult) -> Self {
        Self {
            songs: result.songs.iter().map(StrictSong::from).collect(),
        }
    }
}

impl From<&Playlist> for StrictPlaylist {
    fn from(playlist: &Playlist) -> Self {
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            song_count: playlist.song_count,
            duration: playlist.duration,
            public: playlist.public,
            owner: playlist.owner.clone(),
            entries: playlist.entries.iter().map(StrictSong::from).collect(),
        }
    }
}

impl From<&SubsonicResponse> for StrictEnvelope {
    fn from(response: &SubsonicResponse) -> Self {
        let ok = response.status() == Status::Ok;
        let mut envelope = StrictEnvelope {
            status: response.status().as_str().to_string(),
            version: PROTOCOL_VERSION.to_string(),
            xmlns: XMLNS.to_string(),
            server_type: ok.then(|| response.server_type().to_string()),
            server_version: ok.then(|| SERVER_VERSION.to_string()),
            open_subsonic: ok.then_some(true),
            ping: None,
            search_result2: None,
            search_result3: None,
            song: None,
            starred2: None,
            album_list2: None,
            playlists: None,
            playlist: None,
            error: response.error().map(|e| StrictError {
                code: e.code,
                message: e.message.clone(),
            }),
        };

        match response.payload() {
            None => {}
            Some(Payload::Ping) => envelope.ping = Some(StrictEmpty {}),
            Some(Payload::SearchResult2(r)) => envelope.search_result2 = Some(r.into()),
            Some(Payload::SearchResult3(r)) => envelope.search_result3 = Some(r.into()),
            Some(Payload::Song(s)) => envelope.song = Some(s.into()),
            Some(Payload::Starred2(r)) => envelope.starred2 = Some(r.into()),
            Some(Payload::AlbumList2) => envelope.album_list2 = Some(StrictEmpty {}),
            Some(Payload::Playlists(list)) => {
                envelope.playlists = Some(StrictPlaylists {
                    playlists: list.iter().map(StrictPlaylist::from).collect(),
                })
            }
            Some(Payload::Playlist(p)) => envelope.playlist = Some(p.into()),
        }

        envelope
    }
}

/// Sérialise une réponse en document XML complet
pub fn to_xml(response: &SubsonicResponse) -> Result<String, quick_xml::SeError> {
    let body = quick_xml::se::to_string(&StrictEnvelope::from(response))?;
    Ok(format!("{XML_DECLARATION}{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorInfo;
    use bsbilibili::MediaRecord;

    fn record(duration: Option<u32>) -> MediaRecord {
        MediaRecord {
            id: "abc123".to_string(),
            title: "Song & Co".to_string(),
            author_name: "A".to_string(),
            author_id: 2,
            cover_url: "//img/x.jpg".to_string(),
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_ping_document() {
        let xml = to_xml(&SubsonicResponse::ok("bilisonic", Some(Payload::Ping))).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<subsonic-response status="ok" version="1.16.1" xmlns="http://subsonic.org/restapi" type="bilisonic""#));
        assert!(xml.contains(r#"openSubsonic="true""#));
        assert!(xml.contains("<ping/>"));
    }

    #[test]
    fn test_song_attributes_are_suppressed_when_default() {
        let song = Song::from(&record(None));
        let xml = to_xml(&SubsonicResponse::ok("bilisonic", Some(Payload::Song(song)))).unwrap();

        assert!(xml.contains(r#"id="abc123""#));
        assert!(xml.contains(r#"title="Song &amp; Co""#));
        assert!(!xml.contains("isDir"));
        assert!(!xml.contains("isVideo"));
        assert!(!xml.contains("duration"));

        let song = Song::from(&record(Some(245)));
        let xml = to_xml(&SubsonicResponse::ok("bilisonic", Some(Payload::Song(song)))).unwrap();
        assert!(xml.contains(r#"duration="245""#));
    }

    #[test]
    fn test_failed_document_is_minimal() {
        let response = SubsonicResponse::failed(
            "bilisonic",
            ErrorInfo {
                code: 40,
                message: "Wrong username or password".to_string(),
            },
        );
        let xml = to_xml(&response).unwrap();
        assert!(xml.contains(r#"status="failed""#));
        assert!(xml.contains(r#"<error code="40" message="Wrong username or password"/>"#));
        assert!(!xml.contains("type="));
        assert!(!xml.contains("serverVersion"));
        assert!(!xml.contains("openSubsonic"));
    }

    #[test]
    fn test_playlist_with_entries() {
        let playlist = Playlist::with_entries("bili-1", "Mix", "voyage", &[record(Some(60))]);
        let xml = to_xml(&SubsonicResponse::ok("bilisonic", Some(Payload::Playlist(playlist)))).unwrap();
        assert!(xml.contains(r#"<playlist id="bili-1" name="Mix" songCount="1" duration="60" public="true" owner="voyage">"#));
        assert!(xml.contains(r#"<entry id="abc123""#));
    }
}
