use bsbilibili::{BilibiliConfigExt, UpstreamSession};
use bsserver::{LoggingOptions, ServerBuilder};
use bssubsonic::{SubsonicConfigExt, SubsonicExt, SubsonicState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bsconfig::get_config();

    // ========== PHASE 1 : Serveur HTTP et journalisation ==========

    let mut server = ServerBuilder::new_configured().build();
    server
        .init_logging(LoggingOptions::from_config(&config))
        .await;

    // ========== PHASE 2 : Session Bilibili et stores ==========

    info!("🔑 Opening Bilibili session...");
    let session = UpstreamSession::open(config.get_bilibili_settings()).await?;

    let storage_dir = config.get_subsonic_storage_dir()?;
    info!("💾 Storage directory: {}", storage_dir);

    let state = SubsonicState::with_storage(session, &storage_dir, config.get_subsonic_settings());
    server.init_subsonic(state).await;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    let server_info = server.info();
    info!("✅ BiliSonic is ready at {}", server_info.base_url);
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
