//! Extension bsserver pour l'API Subsonic
//!
//! `bsserver` reste un serveur HTTP générique; cette crate lui ajoute les
//! routes Subsonic via le trait [`SubsonicExt`].
//!
//! ```rust,no_run
//! use bsbilibili::{BilibiliConfigExt, UpstreamSession};
//! use bsserver::ServerBuilder;
//! use bssubsonic::{SubsonicConfigExt, SubsonicExt, SubsonicState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = bsconfig::get_config();
//! let session = UpstreamSession::open(config.get_bilibili_settings()).await?;
//! let state = SubsonicState::with_storage(
//!     session,
//!     config.get_subsonic_storage_dir()?,
//!     config.get_subsonic_settings(),
//! );
//!
//! let mut server = ServerBuilder::new_configured().build();
//! server.init_subsonic(state).await;
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

use crate::api_rest::create_router;
use crate::state::SubsonicState;
use bsserver::Server;
use tracing::info;

pub trait SubsonicExt {
    /// Enregistre toutes les opérations sur `/rest/<op>.view` et `/rest/<op>`,
    /// ainsi que le ping de `/`
    async fn init_subsonic(&mut self, state: SubsonicState);
}

impl SubsonicExt for Server {
    async fn init_subsonic(&mut self, state: SubsonicState) {
        info!("Initializing Subsonic API...");
        self.add_router("/", create_router(state)).await;
        info!("Subsonic API available at /rest/*");
    }
}
