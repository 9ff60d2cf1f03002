//! Opérations Subsonic
//!
//! Chaque opération est servie sur deux chemins : `/rest/<op>.view` (JSON)
//! et `/rest/<op>` (XML). Un seul handler par opération; l'extracteur
//! [`Encoding`] choisit le sérialiseur.

use crate::auth::authenticate;
use crate::error::{Result, SubsonicError};
use crate::ids::{parse_playlist_id, parse_playlist_name};
use crate::model::{Payload, Playlist, SearchResult, Song};
use crate::response::{Encoding, Params, Reply};
use crate::state::SubsonicState;
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use bsbilibili::{MediaRecord, MediaStream, api::catalog, relay};
use futures::future::join_all;
use tracing::{error, info, warn};

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
/// Identifiant de pochette d'album vide envoyé par certains clients
const EMPTY_ALBUM_COVER: &str = "al-";

/// Enregistre une opération sur ses deux surfaces
fn both(
    router: Router<SubsonicState>,
    operation: &str,
    method_router: MethodRouter<SubsonicState>,
) -> Router<SubsonicState> {
    router
        .route(&format!("/rest/{operation}"), method_router.clone())
        .route(&format!("/rest/{operation}.view"), method_router)
}

/// Crée le router Subsonic complet
///
/// Toutes les routes `/rest/*` passent par le middleware d'authentification;
/// `/` répond au ping en JSON sans identifiants.
pub fn create_router(state: SubsonicState) -> Router {
    let mut rest = Router::new();
    rest = both(rest, "ping", get(ping));
    rest = both(rest, "search2", get(search2));
    rest = both(rest, "search3", get(search3));
    rest = both(rest, "getSong", get(get_song));
    rest = both(rest, "getCoverArt", get(get_cover_art).head(head_cover_art));
    rest = both(rest, "stream", get(stream));
    rest = both(rest, "getStarred2", get(get_starred2));
    rest = both(rest, "star", get(star));
    rest = both(rest, "unstar", get(unstar));
    rest = both(rest, "getAlbumList2", get(get_album_list2));
    rest = both(rest, "getPlaylists", get(get_playlists));
    rest = both(rest, "createPlaylist", get(create_playlist));
    rest = both(rest, "getPlaylist", get(get_playlist));
    rest = both(rest, "scrobble", get(scrobble));

    rest.route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/", get(root_ping))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn ping(State(state): State<SubsonicState>, encoding: Encoding) -> Reply {
    info!("ping");
    state.reply(encoding, "ping", Ok(Some(Payload::Ping)))
}

async fn root_ping(State(state): State<SubsonicState>) -> Reply {
    info!("ping /");
    state.reply(Encoding::Legacy, "ping", Ok(Some(Payload::Ping)))
}

async fn search_songs(state: &SubsonicState, params: &Params) -> Result<SearchResult> {
    let query = params.get("query").unwrap_or_default().trim();
    if query.is_empty() {
        return Ok(SearchResult::default());
    }
    let records = catalog::search(&state.session, query).await?;
    Ok(SearchResult::from_records(&records))
}

async fn search2(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    info!("search2 {:?}", params.get("query"));
    let result = search_songs(&state, &params).await;
    state.reply(encoding, "search2", result.map(|r| Some(Payload::SearchResult2(r))))
}

async fn search3(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    info!("search3 {:?}", params.get("query"));
    let result = search_songs(&state, &params).await;
    state.reply(encoding, "search3", result.map(|r| Some(Payload::SearchResult3(r))))
}

async fn resolve_song(state: &SubsonicState, params: &Params) -> Result<Option<Payload>> {
    let id = params.require("id")?;
    info!("getSong {}", id);
    let record = catalog::get_detail(&state.session, id).await?;
    Ok(Some(Payload::Song(Song::from(&record))))
}

async fn get_song(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    let result = resolve_song(&state, &params).await;
    state.reply(encoding, "getSong", result)
}

/// Réponse HTTP brute portant les octets relayés
fn media_response(media: MediaStream, content_type: Option<&str>) -> Response {
    let content_type = content_type
        .map(str::to_string)
        .or_else(|| media.content_type.clone());
    let content_length = media.content_length.clone();

    let mut builder = Response::builder().status(StatusCode::OK);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    if let Some(content_length) = content_length {
        builder = builder.header(CONTENT_LENGTH, content_length);
    }

    builder
        .body(Body::from_stream(media))
        .unwrap_or_else(|e| {
            error!("Cannot build media response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

async fn get_cover_art(
    State(state): State<SubsonicState>,
    encoding: Encoding,
    params: Params,
) -> Response {
    let id = match params.require("id") {
        Ok(id) => id,
        Err(err) => return state.failed(encoding, "getCoverArt", err).into_response(),
    };
    info!("getCoverArt {}", id);
    if id == EMPTY_ALBUM_COVER {
        return StatusCode::OK.into_response();
    }

    match relay::open_cover_stream(&state.session, id).await {
        Ok(media) => media_response(media, None),
        Err(err) => state.failed(encoding, "getCoverArt", err.into()).into_response(),
    }
}

async fn head_cover_art(
    State(state): State<SubsonicState>,
    encoding: Encoding,
    params: Params,
) -> Response {
    let id = match params.require("id") {
        Ok(id) => id,
        Err(err) => return state.failed(encoding, "getCoverArt", err).into_response(),
    };
    info!("getCoverArt (HEAD) {}", id);
    if id == EMPTY_ALBUM_COVER {
        return StatusCode::OK.into_response();
    }

    match relay::head_cover(&state.session, id).await {
        Ok(head) => {
            let mut response = StatusCode::OK.into_response();
            let headers = response.headers_mut();
            if let Some(value) = head.content_type.and_then(|v| v.parse::<HeaderValue>().ok()) {
                headers.insert(CONTENT_TYPE, value);
            }
            if let Some(value) = head.content_length.and_then(|v| v.parse::<HeaderValue>().ok()) {
                headers.insert(CONTENT_LENGTH, value);
            }
            response
        }
        Err(err) => state.failed(encoding, "getCoverArt", err.into()).into_response(),
    }
}

async fn stream(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Response {
    let id = match params.require("id") {
        Ok(id) => id,
        Err(err) => return state.failed(encoding, "stream", err).into_response(),
    };
    info!("stream {}", id);

    match relay::open_audio_stream(&state.session, id).await {
        Ok(media) => media_response(media, Some(AUDIO_CONTENT_TYPE)),
        Err(err) => state.failed(encoding, "stream", err.into()).into_response(),
    }
}

/// Détails des favoris, résolus en parallèle; les échecs sont ignorés
async fn resolve_starred(state: &SubsonicState) -> Result<SearchResult> {
    let ids = state.starred.list().await?;
    let details = join_all(
        ids.iter()
            .map(|id| catalog::get_detail(&state.session, id)),
    )
    .await;

    let records: Vec<MediaRecord> = ids
        .iter()
        .zip(details)
        .filter_map(|(id, detail)| match detail {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping starred {}: {}", id, err);
                None
            }
        })
        .collect();
    Ok(SearchResult::from_records(&records))
}

async fn get_starred2(State(state): State<SubsonicState>, encoding: Encoding) -> Reply {
    info!("getStarred2");
    let result = resolve_starred(&state).await;
    state.reply(encoding, "getStarred2", result.map(|r| Some(Payload::Starred2(r))))
}

fn starred_ids(params: &Params) -> Result<Vec<&str>> {
    let ids: Vec<&str> = params
        .get_all("id")
        .into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(SubsonicError::missing_parameter("id"));
    }
    Ok(ids)
}

async fn update_starred(state: &SubsonicState, params: &Params, starred: bool) -> Result<Option<Payload>> {
    let ids = starred_ids(params)?;
    if starred {
        let added = state.starred.star(ids.iter().copied()).await?;
        info!("star {:?} ({} added)", ids, added);
    } else {
        let removed = state.starred.unstar(ids.iter().copied()).await?;
        info!("unstar {:?} ({} removed)", ids, removed);
    }
    Ok(None)
}

async fn star(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    let result = update_starred(&state, &params, true).await;
    state.reply(encoding, "star", result)
}

async fn unstar(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    let result = update_starred(&state, &params, false).await;
    state.reply(encoding, "unstar", result)
}

async fn get_album_list2(State(state): State<SubsonicState>, encoding: Encoding) -> Reply {
    info!("getAlbumList2");
    state.reply(encoding, "getAlbumList2", Ok(Some(Payload::AlbumList2)))
}

async fn list_playlists(state: &SubsonicState) -> Result<Option<Payload>> {
    let owner = state.settings.username.as_str();
    let playlists = state
        .playlists
        .list()
        .await?
        .into_iter()
        .map(|record| Playlist::summary(record.id, record.name, owner))
        .collect();
    Ok(Some(Payload::Playlists(playlists)))
}

async fn get_playlists(State(state): State<SubsonicState>, encoding: Encoding) -> Reply {
    info!("getPlaylists");
    let result = list_playlists(&state).await;
    state.reply(encoding, "getPlaylists", result)
}

async fn store_playlist(state: &SubsonicState, params: &Params) -> Result<Option<Payload>> {
    let parsed = parse_playlist_name(params.require("name")?)?;
    info!("createPlaylist {} -> {}", parsed.name, parsed.media_id);
    let record = state.playlists.create(&parsed.name, &parsed.media_id).await?;
    Ok(Some(Payload::Playlist(Playlist::summary(
        record.id,
        record.name,
        state.settings.username.as_str(),
    ))))
}

async fn create_playlist(
    State(state): State<SubsonicState>,
    encoding: Encoding,
    params: Params,
) -> Reply {
    let result = store_playlist(&state, &params).await;
    state.reply(encoding, "createPlaylist", result)
}

async fn resolve_playlist(state: &SubsonicState, params: &Params) -> Result<Option<Payload>> {
    let id = params.require("id")?;
    let media_id = parse_playlist_id(id)?;
    info!("getPlaylist {}", id);

    let records = catalog::resolve_favorite_list(&state.session, &media_id).await?;
    // Nom vide pour un dossier de favoris jamais enregistré
    let name = state
        .playlists
        .find_by_media_id(&media_id)
        .await?
        .map(|record| record.name)
        .unwrap_or_default();

    Ok(Some(Payload::Playlist(Playlist::with_entries(
        id,
        name,
        state.settings.username.as_str(),
        &records,
    ))))
}

async fn get_playlist(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    let result = resolve_playlist(&state, &params).await;
    state.reply(encoding, "getPlaylist", result)
}

async fn scrobble(State(state): State<SubsonicState>, encoding: Encoding, params: Params) -> Reply {
    info!("scrobble {:?}", params.get("id"));
    state.reply(encoding, "scrobble", Ok(None))
}
