//! Encodage JSON des chemins `*.view`
//!
//! Forme permissive : tous les champs d'un morceau sont émis, y compris ceux
//! qui valent zéro, et les listes `artist`/`album` des résultats de recherche
//! sont toujours présentes (vides).

use crate::model::{
    PROTOCOL_VERSION, Payload, Playlist, SERVER_VERSION, SearchResult, Song, SubsonicResponse,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct LegacyDocument<'a> {
    #[serde(rename = "subsonic-response")]
    response: LegacyEnvelope<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEnvelope<'a> {
    status: &'a str,
    version: &'a str,
    #[serde(rename = "type")]
    server_type: &'a str,
    server_version: &'a str,
    open_subsonic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<LegacyError<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ping: Option<Empty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_result2: Option<LegacySearch<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_result3: Option<LegacySearch<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    song: Option<LegacySong<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    starred2: Option<LegacySearch<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    album_list2: Option<LegacyAlbumList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    playlists: Option<LegacyPlaylists<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    playlist: Option<LegacyPlaylist<'a>>,
}

#[derive(Serialize)]
struct Empty {}

#[derive(Serialize)]
struct LegacyError<'a> {
    code: u32,
    message: &'a str,
}

#[derive(Serialize)]
struct LegacySearch<'a> {
    artist: Vec<Value>,
    album: Vec<Value>,
    song: Vec<LegacySong<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacySong<'a> {
    id: &'a str,
    is_dir: bool,
    title: &'a str,
    artist: &'a str,
    cover_art: &'a str,
    content_type: &'a str,
    suffix: &'a str,
    duration: u32,
    artist_id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    is_video: bool,
}

#[derive(Serialize)]
struct LegacyAlbumList {
    album: Vec<Value>,
}

#[derive(Serialize)]
struct LegacyPlaylists<'a> {
    playlist: Vec<LegacyPlaylist<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPlaylist<'a> {
    id: &'a str,
    name: &'a str,
    song_count: usize,
    duration: u64,
    public: bool,
    owner: &'a str,
    entry: Vec<LegacySong<'a>>,
}

impl<'a> From<&'a Song> for LegacySong<'a> {
    fn from(song: &'a Song) -> Self {
        Self {
            id: &song.id,
            is_dir: song.is_dir,
            title: &song.title,
            artist: &song.artist,
            cover_art: &song.cover_art,
            content_type: &song.content_type,
            suffix: &song.suffix,
            duration: song.duration.unwrap_or(0),
            artist_id: &song.artist_id,
            kind: &song.kind,
            is_video: song.is_video,
        }
    }
}

impl<'a> From<&'a SearchResult> for LegacySearch<'a> {
    fn from(result: &'a SearchResult) -> Self {
        Self {
            artist: Vec::new(),
            album: Vec::new(),
            song: result.songs.iter().map(LegacySong::from).collect(),
        }
    }
}

impl<'a> From<&'a Playlist> for LegacyPlaylist<'a> {
    fn from(playlist: &'a Playlist) -> Self {
        Self {
            id: &playlist.id,
            name: &playlist.name,
            song_count: playlist.song_count,
            duration: playlist.duration,
            public: playlist.public,
            owner: &playlist.owner,
            entry: playlist.entries.iter().map(LegacySong::from).collect(),
        }
    }
}

impl<'a> From<&'a SubsonicResponse> for LegacyEnvelope<'a> {
    fn from(response: &'a SubsonicResponse) -> Self {
        let mut envelope = LegacyEnvelope {
            status: response.status().as_str(),
            version: PROTOCOL_VERSION,
            server_type: response.server_type(),
            server_version: SERVER_VERSION,
            open_subsonic: true,
            error: response.error().map(|e| LegacyError {
                code: e.code,
                message: &e.message,
            }),
            ping: None,
            search_result2: None,
            search_result3: None,
            song: None,
            starred2: None,
            album_list2: None,
            playlists: None,
            playlist: None,
        };

        match response.payload() {
            None => {}
            Some(Payload::Ping) => envelope.ping = Some(Empty {}),
            Some(Payload::SearchResult2(r)) => envelope.search_result2 = Some(r.into()),
            Some(Payload::SearchResult3(r)) => envelope.search_result3 = Some(r.into()),
            Some(Payload::Song(s)) => envelope.song = Some(s.into()),
            Some(Payload::Starred2(r)) => envelope.starred2 = Some(r.into()),
            Some(Payload::AlbumList2) => {
                envelope.album_list2 = Some(LegacyAlbumList { album: Vec::new() })
            }
            Some(Payload::Playlists(list)) => {
                envelope.playlists = Some(LegacyPlaylists {
                    playlist: list.iter().map(LegacyPlaylist::from).collect(),
                })
            }
            Some(Payload::Playlist(p)) => envelope.playlist = Some(p.into()),
        }

        envelope
    }
}

/// Sérialise une réponse en JSON `{"subsonic-response": {...}}`
pub fn to_json(response: &SubsonicResponse) -> serde_json::Result<String> {
    serde_json::to_string(&LegacyDocument {
        response: response.into(),
    })
}
