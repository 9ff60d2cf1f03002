//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module cache la construction du routeur et le cycle de vie du serveur.
//! Les routes sont accumulées dans un `Router` partagé puis servies par
//! `start()`.

use crate::logs::{LogState, LoggingOptions, LogsApiDoc, create_logs_router, init_logging, log_dump, log_sse};
use anyhow::{Context, Result};
use axum::Router;
use axum::handler::Handler;
use axum::routing::get;
use bsconfig::get_config;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_SERVER_NAME: &str = "BiliSonic";

/// Info serveur sérialisable
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
    log_state: Option<LogState>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé dans les logs (ex: "192.168.1.10")
    /// * `http_port` - Port HTTP à écouter (0 pour un port éphémère)
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            log_state: None,
        }
    }

    pub fn new_configured() -> Self {
        let config = get_config();
        Self::new(DEFAULT_SERVER_NAME, config.get_base_url(), config.get_http_port())
    }

    /// Ajoute un handler avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route("/", get(handler)).with_state(state);

        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Ajoute une API documentée avec OpenAPI et Swagger UI
    ///
    /// - `/api/{name}/...` sert les routes de `api_router`
    /// - `/swagger-ui/{name}` affiche la documentation
    /// - `/api-docs/{name}.json` fournit la spécification OpenAPI
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let swagger_path = format!("/swagger-ui/{}", name);
        let openapi_json_path = format!("/api-docs/{}.json", name);
        let swagger = SwaggerUi::new(swagger_path).url(openapi_json_path, openapi);

        let base_path = format!("/api/{}", name);
        let nested_router = Router::new().nest(&base_path, api_router);

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(nested_router).merge(swagger);
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;

        *r = if path == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    /// Copie du routeur courant, utile pour servir ou tester sans socket
    pub async fn router(&self) -> Router {
        self.router.read().await.clone()
    }

    /// Démarre le serveur HTTP
    ///
    /// Le port est lié avant de rendre la main, une erreur de bind est donc
    /// remontée à l'appelant. La gestion de Ctrl+C est installée en parallèle.
    pub async fn start(&mut self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Cannot bind HTTP port {}", self.http_port))?;
        if let Ok(local) = listener.local_addr() {
            self.http_port = local.port();
        }

        info!(
            "Server {} running at http://{}:{}",
            self.name, self.base_url, self.http_port
        );

        let router = self.router().await;
        let server_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router.into_make_service()).await {
                error!("HTTP server stopped: {}", e);
            }
        });

        let shutdown_task = tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => info!("Ctrl+C reçu, arrêt gracieux"),
                Err(e) => {
                    warn!("Cannot listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        });

        self.join_handle = Some(tokio::spawn(async move {
            tokio::select! {
                _ = server_task => {},
                _ = shutdown_task => {},
            }
        }));

        Ok(())
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }

    /// État des logs, disponible après `init_logging`
    pub fn log_state(&self) -> Option<LogState> {
        self.log_state.clone()
    }

    /// Initialise le système de logging et enregistre les routes de logs
    ///
    /// Routes enregistrées :
    /// - `GET /log-sse` : flux SSE des logs (historique puis temps réel)
    /// - `GET /log-dump` : contenu du buffer en JSON
    /// - `GET|POST /api/logs/log_setup` : lecture et changement du niveau
    pub async fn init_logging(&mut self, options: LoggingOptions) {
        let log_state = init_logging(options);

        self.add_handler_with_state("/log-sse", log_sse, log_state.clone())
            .await;
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(
            create_logs_router(log_state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;

        self.log_state = Some(log_state);
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_add_router_nests_under_path() {
        let mut server = ServerBuilder::new("test", "localhost", 0).build();
        server
            .add_router("/rest", Router::new().route("/ping", get(|| async { "pong" })))
            .await;

        let response = server
            .router()
            .await
            .oneshot(Request::get("/rest/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"pong");
    }

    #[tokio::test]
    async fn test_add_router_merges_at_root() {
        let mut server = ServerBuilder::new("test", "localhost", 0).build();
        server
            .add_router("/", Router::new().route("/", get(|| async { "root" })))
            .await;

        let response = server
            .router()
            .await
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_start_binds_ephemeral_port() {
        let mut server = ServerBuilder::new("test", "localhost", 0).build();
        server.start().await.unwrap();
        assert_ne!(server.info().http_port, 0);
    }
}
