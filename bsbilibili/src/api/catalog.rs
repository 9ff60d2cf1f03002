//! Module d'accès au catalogue Bilibili (recherche, détail, lecture, favoris)

use super::{decode, get_data};
use crate::error::{BilibiliError, Result};
use crate::models::*;
use crate::session::UpstreamSession;
use crate::text::to_bvid;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

const SEARCH_PATH: &str = "/x/web-interface/search/type";
const VIEW_PATH: &str = "/x/web-interface/view";
const PAGELIST_PATH: &str = "/x/player/pagelist";
const PLAYURL_PATH: &str = "/x/player/playurl";
const FAVORITES_PATH: &str = "/x/v3/fav/resource/list";

/// DASH : l'audio est servi séparément de la vidéo
const FNVAL_DASH: &str = "16";
const FAVORITES_PAGE_SIZE: &str = "20";

fn checked_bvid(canonical_id: &str) -> Result<String> {
    let id = canonical_id.trim();
    if id.is_empty() {
        return Err(BilibiliError::Configuration(
            "empty content identifier".to_string(),
        ));
    }
    Ok(to_bvid(id))
}

/// Recherche de vidéos par mot-clé, dans l'ordre renvoyé par Bilibili
///
/// Les résultats sans `bvid` sont ignorés.
pub async fn search(session: &UpstreamSession, keyword: &str) -> Result<Vec<MediaRecord>> {
    let data = get_data(
        session,
        "search",
        SEARCH_PATH,
        &[
            ("keyword", keyword.to_string()),
            ("search_type", "video".to_string()),
        ],
    )
    .await?;

    let data: SearchData = decode("search", "data.result", data)?;
    let total = data.result.len();
    let records: Vec<MediaRecord> = data
        .result
        .into_iter()
        .filter_map(SearchItem::into_record)
        .collect();

    debug!(
        "search '{}': {} results ({} discarded)",
        keyword,
        records.len(),
        total - records.len()
    );
    Ok(records)
}

/// Détail d'une vidéo
pub async fn get_detail(session: &UpstreamSession, canonical_id: &str) -> Result<MediaRecord> {
    let bvid = checked_bvid(canonical_id)?;
    let data = get_data(session, "detail", VIEW_PATH, &[("bvid", bvid)]).await?;

    let view: ViewData = decode("detail", "data", data)?;
    view.into_record()
        .ok_or_else(|| BilibiliError::schema("detail", "data.bvid"))
}

/// Résout le `cid` de la première partie d'une vidéo
pub async fn resolve_content_index(session: &UpstreamSession, canonical_id: &str) -> Result<i64> {
    let bvid = checked_bvid(canonical_id)?;
    let data = get_data(session, "pagelist", PAGELIST_PATH, &[("bvid", bvid.clone())]).await?;

    let pages: Vec<PageEntry> = decode("pagelist", "data", data)?;
    let first = pages
        .into_iter()
        .next()
        .ok_or_else(|| BilibiliError::NotFound(format!("no playable part for {}", bvid)))?;

    debug!("{} -> cid {}", bvid, first.cid);
    Ok(first.cid)
}

/// Résout l'URL signée du premier flux audio DASH
pub async fn resolve_media_url(
    session: &UpstreamSession,
    canonical_id: &str,
    content_index: i64,
) -> Result<Url> {
    let bvid = checked_bvid(canonical_id)?;
    let data = get_data(
        session,
        "playurl",
        PLAYURL_PATH,
        &[
            ("bvid", bvid),
            ("cid", content_index.to_string()),
            ("fnval", FNVAL_DASH.to_string()),
        ],
    )
    .await?;

    let play: PlayUrlData = decode("playurl", "data", data)?;
    let dash = play
        .dash
        .ok_or_else(|| BilibiliError::schema("playurl", "data.dash"))?;
    let audio = dash
        .audio
        .and_then(|streams| streams.into_iter().next())
        .ok_or_else(|| BilibiliError::schema("playurl", "data.dash.audio"))?;

    Ok(Url::parse(&audio.base_url)?)
}

/// Chaîne complète identifiant → `cid` → URL signée
///
/// Rien n'est mis en cache : chaque lecture refait les deux appels.
pub async fn resolve_playable(
    session: &UpstreamSession,
    canonical_id: &str,
) -> Result<PlayableLocator> {
    let content_index = resolve_content_index(session, canonical_id).await?;
    let media_url = resolve_media_url(session, canonical_id, content_index).await?;
    Ok(PlayableLocator {
        canonical_id: canonical_id.to_string(),
        content_index,
        media_url,
    })
}

/// Contenu d'un dossier de favoris, page par page
///
/// La lecture s'arrête quand `has_more` est faux ou au plafond de pages
/// configuré. Un dossier vide renvoie `medias: null`.
pub async fn resolve_favorite_list(
    session: &UpstreamSession,
    media_id: &str,
) -> Result<Vec<MediaRecord>> {
    let media_id = media_id.trim();
    if media_id.is_empty() {
        return Err(BilibiliError::Configuration(
            "empty favorites folder identifier".to_string(),
        ));
    }

    let max_pages = session.settings().favorites_max_pages.max(1);
    let mut records = Vec::new();

    for page in 1..=max_pages {
        let data = get_data(
            session,
            "favorites",
            FAVORITES_PATH,
            &[
                ("media_id", media_id.to_string()),
                ("pn", page.to_string()),
                ("ps", FAVORITES_PAGE_SIZE.to_string()),
                ("platform", "web".to_string()),
            ],
        )
        .await?;

        if data == Value::Null {
            break;
        }

        let folder: FavoriteData = decode("favorites", "data", data)?;
        records.extend(
            folder
                .medias
                .unwrap_or_default()
                .into_iter()
                .filter_map(FavoriteMedia::into_record),
        );

        if !folder.has_more {
            break;
        }
        if page == max_pages {
            warn!(
                "Favorites {} truncated after {} pages ({} entries)",
                media_id,
                max_pages,
                records.len()
            );
        }
    }

    debug!("favorites {}: {} entries", media_id, records.len());
    Ok(records)
}
