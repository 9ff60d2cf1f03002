//! # bsserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit l'enveloppe HTTP de BiliSonic : un routeur Axum partagé
//! sur lequel les autres crates viennent greffer leurs routes, un démarrage
//! avec arrêt gracieux sur Ctrl+C et un système de logs consultable en direct.
//!
//! ## Fonctionnalités
//!
//! - **Sous-routeurs** : chaque crate enregistre ses routes avec `add_router()`
//! - **Server-Sent Events (SSE)** : logs en temps réel via `/log-sse`
//! - **Documentation OpenAPI** : Swagger UI pour l'API de gestion des logs
//! - **Arrêt gracieux** : gestion propre de l'arrêt sur Ctrl+C
//!
//! ## Architecture
//!
//! - [`server`] : implémentation du serveur principal et du builder
//! - [`logs`] : buffer circulaire, couche `tracing` et handlers SSE
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use bsserver::{ServerBuilder, logs::LoggingOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!     server.init_logging(LoggingOptions::default()).await;
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, LoggingOptions, SseLayer, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
