//! Logs du serveur : buffer circulaire, diffusion SSE et réglage du niveau à chaud.
mod sselayer;

use bsconfig::Config;
pub use sselayer::SseLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, RwLock},
    time::SystemTime,
};

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

const AVAILABLE_LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

/// Représente une entrée de log
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Buffer circulaire partagé
#[derive(Clone)]
pub struct LogState {
    buffer: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
    tx: broadcast::Sender<LogEntry>,
    max_level: Arc<RwLock<Level>>,
    reload_handle: Option<reload::Handle<LevelFilter, Registry>>,
}

impl LogState {
    pub fn new(capacity: usize, reload_handle: reload::Handle<LevelFilter, Registry>) -> Self {
        let mut state = Self::detached(capacity);
        state.reload_handle = Some(reload_handle);
        state
    }

    /// État sans filtre rechargeable, pour une couche montée à la main
    pub fn detached(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
            tx: broadcast::channel(1000).0,
            max_level: Arc::new(RwLock::new(Level::TRACE)),
            reload_handle: None,
        }
    }

    pub fn set_max_level(&self, level: Level) {
        if let Ok(mut max) = self.max_level.write() {
            *max = level;
        }

        let Some(handle) = &self.reload_handle else {
            return;
        };
        let level_filter = level_to_levelfilter(level);
        if let Err(e) = handle.reload(level_filter) {
            eprintln!("Failed to reload log level filter: {}", e);
        }
    }

    pub fn get_max_level(&self) -> Level {
        self.max_level
            .read()
            .map(|level| *level)
            .unwrap_or(Level::TRACE)
    }

    pub(crate) fn push(&self, entry: LogEntry) {
        if let Ok(mut buf) = self.buffer.write() {
            if buf.len() >= self.capacity {
                buf.pop_front();
            }
            buf.push_back(entry.clone());
        }
        let _ = self.tx.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer
            .read()
            .map(|buf| buf.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Query params pour /log-sse
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub warn: Option<bool>,
    #[serde(default)]
    pub info: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub trace: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Handler SSE
pub async fn log_sse(
    State(state): State<LogState>,
    Query(params): Query<LogQuery>,
) -> impl IntoResponse {
    let mut rx = state.subscribe();

    let history = state.dump();
    let stream_state = state.clone();
    let current_level = stream_state.get_max_level();

    let stream = async_stream::stream! {
        // Historique d'abord, filtré par le niveau courant
        for entry in history {
            if !is_level_allowed(&entry.level, current_level) || !filter_entry(&entry, &params) {
                continue;
            }
            if let Ok(json) = serde_json::to_string(&entry) {
                yield Ok::<_, axum::Error>(Event::default().data(json));
            }
        }

        // Puis le temps réel
        loop {
            let entry = match rx.recv().await {
                Ok(entry) => entry,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let max_level = stream_state.get_max_level();
            if !is_level_allowed(&entry.level, max_level) || !filter_entry(&entry, &params) {
                continue;
            }
            if let Ok(json) = serde_json::to_string(&entry) {
                yield Ok::<_, axum::Error>(Event::default().data(json));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handler REST (dump JSON du buffer)
pub async fn log_dump(State(state): State<LogState>) -> impl IntoResponse {
    Json(state.dump())
}

/// Vérifie si un niveau de log est autorisé selon le niveau maximum configuré
fn is_level_allowed(log_level: &str, max_level: Level) -> bool {
    match string_to_level(log_level) {
        // Level ordonne TRACE > DEBUG > INFO > WARN > ERROR
        Some(entry_level) => entry_level <= max_level,
        None => false,
    }
}

/// Fonction de filtrage
fn filter_entry(entry: &LogEntry, q: &LogQuery) -> bool {
    let lvl = entry.level.to_lowercase();
    let flags = [
        ("error", q.error),
        ("warn", q.warn),
        ("info", q.info),
        ("debug", q.debug),
        ("trace", q.trace),
    ];

    // si aucun flag → tout est autorisé
    let any_flag = flags.iter().any(|(_, flag)| flag.unwrap_or(false));
    let mut allowed = !any_flag
        || flags
            .iter()
            .any(|(name, flag)| flag.unwrap_or(false) && lvl == *name);

    if let Some(search) = &q.search {
        allowed &= entry.message.contains(search) || entry.target.contains(search);
    }

    allowed
}

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Capacité du buffer circulaire (nombre d'entrées conservées)
    pub buffer_capacity: usize,
    /// Activer la sortie vers stderr/stdout
    pub enable_console: bool,
    /// Niveau minimum au démarrage
    pub min_level: Level,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1000,
            enable_console: true,
            min_level: Level::TRACE,
        }
    }
}

impl LoggingOptions {
    /// Lit la section `host.logger` de la configuration
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            buffer_capacity: config
                .get_log_cache_size()
                .unwrap_or(defaults.buffer_capacity),
            enable_console: config
                .get_log_enable_console()
                .unwrap_or(defaults.enable_console),
            min_level: config
                .get_log_min_level()
                .ok()
                .and_then(|l| string_to_level(&l))
                .unwrap_or(defaults.min_level),
        }
    }
}

/// Initialise le système de logging avec SSE et optionnellement la console
///
/// Retourne le `LogState` à partir duquel les routes de logs sont montées.
/// Si un subscriber global existe déjà, le buffer reste fonctionnel mais
/// ne reçoit rien.
pub fn init_logging(options: LoggingOptions) -> LogState {
    let (filter, reload_handle) = reload::Layer::new(level_to_levelfilter(options.min_level));

    let log_state = LogState::new(options.buffer_capacity, reload_handle);
    if let Ok(mut max) = log_state.max_level.write() {
        *max = options.min_level;
    }

    // Le filtre rechargeable doit précéder les autres couches
    let subscriber = Registry::default()
        .with(filter)
        .with(SseLayer::new(log_state.clone()));

    let result = if options.enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }

    log_state
}

/// Request body pour la configuration du logging
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Response pour la configuration du logging
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl LogSetupResponse {
    fn new(level: Level) -> Self {
        Self {
            current_level: level_to_string(level),
            available_levels: AVAILABLE_LEVELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Handler pour GET /api/logs/log_setup - retourne la configuration actuelle
#[utoipa::path(
    get,
    path = "/log_setup",
    responses(
        (status = 200, description = "Log configuration retrieved successfully", body = LogSetupResponse)
    ),
    tag = "logs"
)]
pub async fn log_setup_get(State(state): State<LogState>) -> impl IntoResponse {
    Json(LogSetupResponse::new(state.get_max_level()))
}

/// Handler pour POST /api/logs/log_setup - met à jour le niveau de log
#[utoipa::path(
    post,
    path = "/log_setup",
    request_body = LogSetupRequest,
    responses(
        (status = 200, description = "Log level updated successfully", body = LogSetupResponse),
        (status = 400, description = "Invalid log level")
    ),
    tag = "logs"
)]
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> impl IntoResponse {
    let Some(level) = string_to_level(&payload.level) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Invalid log level. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE"
            })),
        )
            .into_response();
    };

    state.set_max_level(level);
    tracing::info!("Log level changed to: {}", payload.level);

    (StatusCode::OK, Json(LogSetupResponse::new(level))).into_response()
}

fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_string(level: Level) -> String {
    level.as_str().to_string()
}

fn level_to_levelfilter(level: Level) -> LevelFilter {
    LevelFilter::from_level(level)
}

/// Crée le router pour l'API de gestion des logs
pub fn create_logs_router(log_state: LogState) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route("/log_setup", get(log_setup_get).post(log_setup_post))
        .with_state(log_state)
}

/// API OpenAPI pour la gestion des logs
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        log_setup_get,
        log_setup_post,
    ),
    components(
        schemas(LogSetupRequest, LogSetupResponse)
    ),
    tags(
        (name = "logs", description = "Log level configuration endpoints")
    )
)]
pub struct LogsApiDoc;
