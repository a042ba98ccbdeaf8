use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use tower::ServiceBuilder;
use tracing::{info, warn};

use crate::detect;
use crate::error::ServeError;
use crate::types::{CssTarget, ProjectInfo};
use crate::writer;

mod middleware;
pub mod protocol;

use protocol::{ApplyCommand, ApplyResponse, HealthResponse};

pub const DEFAULT_PORT: u16 = 3847;
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Project root detection runs against and targets are relative to.
    pub root: PathBuf,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

/// Shared server state.
///
/// Detection runs once, on first use, and the result is kept for the life of
/// the process. Two racing first requests may both detect; they compute the
/// same value and only one is stored.
pub struct AppState {
    root_dir: PathBuf,
    project: OnceLock<ProjectInfo>,
}

impl AppState {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            project: OnceLock::new(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn project(&self) -> &ProjectInfo {
        self.project.get_or_init(|| detect::detect_project(&self.root_dir))
    }

    /// The detected target, or the project type's default stylesheet.
    pub fn write_target(&self) -> CssTarget {
        let project = self.project();
        project
            .css_target
            .clone()
            .unwrap_or_else(|| CssTarget::file(detect::default_css_path(project.project_type)))
    }

    pub fn health(&self) -> HealthResponse {
        let project = self.project();
        HealthResponse {
            status: "ok".to_string(),
            version: VERSION.to_string(),
            project_type: project.project_type,
            css_file: project.css_target.as_ref().map(|t| t.path.clone()),
        }
    }

    /// Write a validated request into the project.
    pub fn apply(&self, command: &ApplyCommand) -> ApplyResponse {
        let project_type = self.project().project_type;
        let target = self.write_target();

        let result = match command {
            ApplyCommand::Theme { colors, is_dark_mode } => {
                writer::write_theme_to_target(&self.root_dir, &target, colors, *is_dark_mode)
            }
            ApplyCommand::Font { family } => writer::write_font_to_target(&self.root_dir, &target, family),
        };

        match result {
            Ok(outcome) => {
                info!(file = %target.path, created = outcome.created, "{}", outcome.message);
                ApplyResponse {
                    success: true,
                    message: outcome.message,
                    file: Some(target.path.clone()),
                    project_type: Some(project_type),
                    created: Some(outcome.created),
                    import_instruction: outcome
                        .created
                        .then(|| detect::import_instruction(project_type, &target.path)),
                }
            }
            Err(e) => {
                warn!(file = %target.path, "apply failed: {e}");
                ApplyResponse {
                    success: false,
                    message: e.to_string(),
                    file: Some(target.path),
                    project_type: Some(project_type),
                    created: Some(false),
                    import_instruction: None,
                }
            }
        }
    }
}

/// Build the HTTP app around `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(serve_health).fallback(not_found))
        .route("/api/apply", post(serve_apply).fallback(not_found))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::log_requests))
                .layer(axum_middleware::from_fn(middleware::cors)),
        )
        .with_state(state)
}

/// Bind and run the server until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let state = Arc::new(AppState::new(config.root));
    let addr = SocketAddr::new(config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            return Err(ServeError::PortInUse { port: config.port });
        }
        Err(source) => return Err(ServeError::Bind { addr, source }),
    };

    print_banner(&state, config.port);
    info!(%addr, root = %state.root_dir().display(), "listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn print_banner(state: &AppState, port: u16) {
    let project = state.project();
    eprintln!("ThemeForseen dev server");
    eprintln!("  url:        http://localhost:{port}");
    eprintln!("  project:    {}", project.project_type);
    match &project.css_target {
        Some(target) if target.is_inline() => eprintln!("  css target: <style> in {}", target.path),
        Some(target) => eprintln!("  css target: {}", target.path),
        None => eprintln!(
            "  css target: will create {}",
            detect::default_css_path(project.project_type)
        ),
    }
    if project.has_tailwind {
        eprintln!("  tailwind:   detected");
    }
    eprintln!("  apply a theme from the widget to write it here, Ctrl+C to stop");
}

// ── Route handlers ────────────────────────────────────────────────────

async fn serve_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.health())
}

async fn serve_apply(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, Json<ApplyResponse>) {
    let command = match protocol::parse_apply_request(&body) {
        Ok(command) => command,
        Err(e) => {
            warn!("rejected apply request: {e}");
            return (StatusCode::BAD_REQUEST, Json(ApplyResponse::rejected(e.to_string())));
        }
    };

    let response = state.apply(&command);
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(response))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "Not found" })))
}
