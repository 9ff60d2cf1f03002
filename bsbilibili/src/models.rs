//! Modèles de données Bilibili
//!
//! Les structures publiques ([`MediaRecord`], [`PlayableLocator`]) sont celles
//! que manipule le reste de BiliSonic. Les structures `pub(crate)` reflètent
//! le JSON brut des endpoints et ne servent qu'au décodage.

use crate::text::{parse_clock_duration, protocol_relative, strip_bv_prefix, strip_markup};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Entier tolérant : Bilibili renvoie parfois les identifiants en texte
pub(crate) fn deserialize_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| Error::custom("integer out of range")),
        Value::String(s) => s.trim().parse().map_err(Error::custom),
        Value::Null => Ok(0),
        _ => Err(Error::custom("expected an integer or a numeric string")),
    }
}

/// Durée en secondes (`205`) ou en texte (`"3:25"`); absente si illisible
pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => parse_clock_duration(&s),
        _ => None,
    })
}

/// Une entrée de catalogue résolue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRecord {
    /// Code BV sans son préfixe, jamais vide
    pub id: String,
    /// Titre en texte brut
    pub title: String,
    pub author_name: String,
    pub author_id: i64,
    /// URL relative au protocole (`//i0.hdslb.com/...`)
    pub cover_url: String,
    pub duration_seconds: Option<u32>,
}

impl MediaRecord {
    /// Construit un enregistrement normalisé, `None` si l'identifiant est vide
    pub(crate) fn normalized(
        bvid: &str,
        title: &str,
        author_name: String,
        author_id: i64,
        cover: &str,
        duration_seconds: Option<u32>,
    ) -> Option<Self> {
        let id = strip_bv_prefix(bvid.trim());
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            title: strip_markup(title),
            author_name,
            author_id,
            cover_url: protocol_relative(cover),
            duration_seconds,
        })
    }
}

/// Chaîne résolue pour une lecture : identifiant, `cid`, puis URL signée
#[derive(Debug, Clone)]
pub struct PlayableLocator {
    pub canonical_id: String,
    pub content_index: i64,
    pub media_url: Url,
}

// ============ Réponses brutes ============

/// `data` de /x/web-interface/search/type
#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    #[serde(default)]
    pub bvid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub mid: i64,
    #[serde(default)]
    pub pic: String,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<u32>,
}

impl SearchItem {
    pub fn into_record(self) -> Option<MediaRecord> {
        MediaRecord::normalized(
            &self.bvid,
            &self.title,
            self.author,
            self.mid,
            &self.pic,
            self.duration,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Owner {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub mid: i64,
}

/// `data` de /x/web-interface/view
#[derive(Debug, Deserialize)]
pub(crate) struct ViewData {
    pub bvid: String,
    #[serde(default)]
    pub title: String,
    pub owner: Owner,
    #[serde(default)]
    pub pic: String,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<u32>,
}

impl ViewData {
    pub fn into_record(self) -> Option<MediaRecord> {
        MediaRecord::normalized(
            &self.bvid,
            &self.title,
            self.owner.name,
            self.owner.mid,
            &self.pic,
            self.duration,
        )
    }
}

/// Élément de /x/player/pagelist
#[derive(Debug, Deserialize)]
pub(crate) struct PageEntry {
    #[serde(deserialize_with = "deserialize_i64")]
    pub cid: i64,
}

/// `data` de /x/player/playurl (format DASH, `fnval=16`)
#[derive(Debug, Deserialize)]
pub(crate) struct PlayUrlData {
    #[serde(default)]
    pub dash: Option<Dash>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Dash {
    #[serde(default)]
    pub audio: Option<Vec<DashStream>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashStream {
    #[serde(rename = "baseUrl", alias = "base_url")]
    pub base_url: String,
}

/// `data` de /x/v3/fav/resource/list
#[derive(Debug, Deserialize)]
pub(crate) struct FavoriteData {
    #[serde(default)]
    pub medias: Option<Vec<FavoriteMedia>>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoriteMedia {
    #[serde(default)]
    pub bvid: String,
    #[serde(default)]
    pub title: String,
    pub upper: Owner,
    #[serde(default)]
    pub cover: String,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<u32>,
}

impl FavoriteMedia {
    pub fn into_record(self) -> Option<MediaRecord> {
        MediaRecord::normalized(
            &self.bvid,
            &self.title,
            self.upper.name,
            self.upper.mid,
            &self.cover,
            self.duration,
        )
    }
}
