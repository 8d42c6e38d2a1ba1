//! SubTrack Web Server
//!
//! Axum-based REST API for the SubTrack subscription tracker.
//!
//! Security features:
//! - Bearer token authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Every query scoped to the authenticated user
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use subtrack_core::db::Database;
use subtrack_core::Error as CoreError;

pub mod auth;
mod handlers;

pub use auth::{AuthUser, Claims};

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "SUBTRACK_JWT_SECRET";

/// Environment variable holding comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "SUBTRACK_ALLOWED_ORIGINS";

/// Environment variable overriding the token lifetime in days
pub const TOKEN_TTL_ENV: &str = "SUBTRACK_TOKEN_TTL_DAYS";

/// Token lifetime when not configured
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Owner of all data when authentication is disabled
pub const DEFAULT_LOCAL_USER: &str = "local@localhost";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl_days: i64,
    /// User that requests act as when `require_auth` is false
    pub local_user_email: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            jwt_secret: String::new(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            local_user_email: DEFAULT_LOCAL_USER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Fill secret, origins and token lifetime from the environment
    pub fn from_env(require_auth: bool) -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let token_ttl_days = match std::env::var(TOKEN_TTL_ENV) {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    warn!(value = %raw, "Ignoring invalid {}", TOKEN_TTL_ENV);
                    DEFAULT_TOKEN_TTL_DAYS
                }
            },
            Err(_) => DEFAULT_TOKEN_TTL_DAYS,
        };

        Self {
            require_auth,
            allowed_origins,
            jwt_secret: std::env::var(JWT_SECRET_ENV).unwrap_or_default(),
            token_ttl_days,
            ..Self::default()
        }
    }
}

/// Parse a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Authentication middleware - resolves the acting user and stores it as an `AuthUser` extension
///
/// With auth disabled every request acts as the configured local user, which
/// is created on first use.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return match state.db.ensure_user(&state.config.local_user_email) {
            Ok(user) => {
                request.extensions_mut().insert(AuthUser {
                    id: user.id,
                    email: user.email,
                });
                next.run(request).await
            }
            Err(e) => AppError::from(e).into_response(),
        };
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let claims = auth::bearer_token(header_value)
        .and_then(|token| auth::validate_token(token, &state.config.jwt_secret));

    match claims {
        Ok(claims) => {
            debug!(user_id = claims.id, path = %request.uri().path(), "Authenticated via bearer token");
            request.extensions_mut().insert(AuthUser {
                id: claims.id,
                email: claims.email,
            });
            next.run(request).await
        }
        Err(reason) => {
            warn!(path = %request.uri().path(), reason = reason.message(), "Unauthorized request");
            AppError::unauthorized(reason.message()).into_response()
        }
    }
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/me", get(handlers::get_me))
        // Subscriptions
        .route(
            "/subscriptions",
            get(handlers::list_subscriptions).post(handlers::create_subscription),
        )
        .route(
            "/subscriptions/:id",
            get(handlers::get_subscription)
                .put(handlers::update_subscription)
                .delete(handlers::delete_subscription),
        )
        // Settings
        .route(
            "/users/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        // Analytics
        .route("/analytics/overview", get(handlers::analytics_overview))
        .route("/analytics/by-category", get(handlers::analytics_by_category))
        .route("/analytics/dead-weight", get(handlers::analytics_dead_weight))
        .route("/analytics/trends", get(handlers::analytics_trends))
        .route(
            "/analytics/recommendations",
            get(handlers::analytics_recommendations),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with the default (authenticated) configuration
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env(true)).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.require_auth && config.jwt_secret.is_empty() {
        anyhow::bail!(
            "{} must be set when authentication is enabled (or pass --no-auth for local use)",
            JWT_SECRET_ENV
        );
    }
    if !config.require_auth {
        warn!(
            user = %config.local_user_email,
            "⚠️  Authentication disabled - do not expose to network!"
        );
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error from user-supplied input to a client-facing status
    ///
    /// Storage failures still become a generic 500.
    pub fn from_input(err: CoreError) -> Self {
        match err {
            CoreError::InvalidBillingCycle(_) => Self::bad_request("Invalid billing cycle"),
            CoreError::InvalidCost(_) => Self::bad_request("Invalid cost"),
            CoreError::InvalidData(msg) => Self::bad_request(&msg),
            CoreError::NotFound(msg) => Self::not_found(&msg),
            CoreError::AlreadyExists(msg) => Self::conflict(&msg),
            CoreError::Auth(msg) => Self::unauthorized(&msg),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Generic message to the client, full error kept for logging
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}
