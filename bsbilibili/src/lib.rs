//! # bsbilibili - Client Bilibili pour BiliSonic
//!
//! Cette crate regroupe tout ce qui parle à Bilibili :
//!
//! - [`session`] : session anonyme (jar de cookies, User-Agent de navigateur)
//! - [`api::catalog`] : recherche, détail, résolution `cid` et URL signée, favoris
//! - [`relay`] : relais en flux des pochettes et de l'audio
//! - [`config_ext`] : lecture de la section `bilibili` de la configuration
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use bsbilibili::{SessionSettings, UpstreamSession, api::catalog};
//!
//! # async fn example() -> bsbilibili::Result<()> {
//! let session = UpstreamSession::open(SessionSettings::default()).await?;
//! for record in catalog::search(&session, "lofi").await? {
//!     println!("{} - {}", record.author_name, record.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config_ext;
pub mod error;
pub mod models;
pub mod relay;
pub mod session;
pub mod text;

pub use config_ext::BilibiliConfigExt;
pub use error::{BilibiliError, Result};
pub use models::{MediaRecord, PlayableLocator};
pub use relay::{MediaHead, MediaStream};
pub use session::{SessionSettings, UpstreamSession};
