//! # bssubsonic - Adaptateur Subsonic / OpenSubsonic
//!
//! Traduit les requêtes d'un client Subsonic en appels au catalogue Bilibili
//! et sérialise les réponses dans deux encodages :
//!
//! - [`legacy`] : JSON sur les chemins `/rest/<op>.view`
//! - [`strict`] : XML sur les chemins `/rest/<op>`
//!
//! Les deux partagent le même modèle ([`model`]) et les mêmes handlers
//! ([`api_rest`]).

pub mod api_rest;
pub mod auth;
pub mod config_ext;
pub mod error;
pub mod ids;
pub mod legacy;
pub mod model;
pub mod response;
pub mod server_ext;
pub mod state;
pub mod strict;

pub use api_rest::create_router;
pub use config_ext::SubsonicConfigExt;
pub use error::{Result, SubsonicError};
pub use model::{Payload, Playlist, SearchResult, Song, SubsonicResponse};
pub use response::{Encoding, Params, Reply};
pub use server_ext::SubsonicExt;
pub use state::{SubsonicSettings, SubsonicState};
