//! Axum-based API Gateway: HTTP entry point for the HR desk. Config-driven via CoreConfig.

mod handlers;

use axum::http::Method;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use dashmap::DashMap;
use hrdesk_core::{ChatSession, CoreConfig, FeedbackStore, KnowledgeBase, SharedKnowledgeBase};
use std::path::Path as StdPath;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pre-flight check: config, knowledge base, feedback store and port.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking knowledge base {}... ", config.knowledge_base_path);
    let base = KnowledgeBase::load_csv(&config.knowledge_base_path)
        .map_err(|e| format!("no base available: {}", e))?;
    let stats = base.stats();
    println!(
        "OK ({} questions, {} profiles, {} domains)",
        stats.questions, stats.profiles, stats.domains
    );

    print!("Checking hrdesk_feedback... ");
    let feedback_path = StdPath::new(&config.storage_path).join("hrdesk_feedback");
    let store = FeedbackStore::open_path(&feedback_path)
        .map_err(|e| format!("hrdesk_feedback LOCKED or inaccessible: {}", e))?;
    let votes = store.count().map_err(|e| format!("hrdesk_feedback unreadable: {}", e))?;
    drop(store);
    println!("OK ({} votes)", votes);

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\nSUCCESS: all checks passed. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[hrdesk-gateway] .env not loaded: {} (using system environment)", e);
    }

    if std::env::args().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(CoreConfig::load()?);

    // Without a base the engine must not run at all.
    let knowledge = match SharedKnowledgeBase::load(&config.knowledge_base_path) {
        Ok(kb) => Arc::new(kb),
        Err(e) => {
            tracing::error!(target: "hrdesk::gateway", error = %e, "no base available");
            return Err(e.into());
        }
    };
    let stats = knowledge.snapshot().stats();
    tracing::info!(
        target: "hrdesk::gateway",
        "Knowledge base ready: {} questions, {} profiles, {} domains",
        stats.questions,
        stats.profiles,
        stats.domains
    );

    let feedback_path = StdPath::new(&config.storage_path).join("hrdesk_feedback");
    let feedback = Arc::new(FeedbackStore::open_path(&feedback_path)?);

    let state = AppState {
        config: Arc::clone(&config),
        knowledge,
        sessions: Arc::new(DashMap::new()),
        feedback,
    };
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    let frontend_enabled = state.config.frontend_enabled;

    let app = Router::new()
        .route("/v1/status", get(status))
        .route("/api/v1/health", get(health))
        .route("/api/v1/kb-stats", get(handlers::knowledge::kb_stats))
        .route("/api/v1/reload", post(handlers::knowledge::reload))
        .route("/api/v1/ask", post(handlers::chat::ask))
        .route(
            "/api/v1/feedback",
            get(handlers::chat::feedback_summary).post(handlers::chat::feedback),
        )
        .route("/api/v1/history/:session_id", get(handlers::chat::history))
        .route("/api/v1/reset/:session_id", post(handlers::chat::reset))
        .with_state(state);

    if !frontend_enabled {
        return app;
    }

    // CORS: allow the Frontend/UI port range (3001-3099).
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &axum::http::HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            let port = s
                .rsplit(':')
                .next()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            (3001..=3099).contains(&port)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);
    app.layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) knowledge: Arc<SharedKnowledgeBase>,
    /// Per-user chat history keyed by session id.
    pub(crate) sessions: Arc<DashMap<String, ChatSession>>,
    pub(crate) feedback: Arc<FeedbackStore>,
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity and knowledge-base summary.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let snapshot = state.knowledge.snapshot();
    let feedback_count = state.feedback.count().unwrap_or_else(|e| {
        tracing::warn!(target: "hrdesk::gateway", error = %e, "feedback count unavailable");
        0
    });
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "knowledge_base_path": state.knowledge.source().display().to_string(),
        "records": snapshot.len(),
        "sessions": state.sessions.len(),
        "feedback_count": feedback_count,
    }))
}
