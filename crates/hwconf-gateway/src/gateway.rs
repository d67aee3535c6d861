//! Main Gateway implementation
//!
//! REST API over the configurator core: account management, configuration
//! generation and per-user history.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hwconf_core::requirements::Requirements;
use hwconf_core::storage::{ConfigurationStore, NewConfiguration, User, UserUpdate};
use hwconf_core::summary::Summarizer;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{
    hash_password, session_cookie, verify_password, AuthUser, TokenIssuer, MIN_PASSWORD_LEN,
};
use crate::config::GatewayConfig;
use crate::{GatewayError, Result};

/// Gateway state shared across handlers
pub struct AppState {
    pub config: GatewayConfig,
    pub store: Mutex<ConfigurationStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        store: ConfigurationStore,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            tokens: TokenIssuer::from_settings(&config.auth),
            config,
            store: Mutex::new(store),
            summarizer,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SignupRequest {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateRequest {
    name: Option<String>,
    email: Option<String>,
    current_password: Option<String>,
    new_password: Option<String>,
}

/// Main Gateway
pub struct Gateway {
    state: Arc<AppState>,
}

impl Gateway {
    /// Open the store and summarizer named by `config`
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let store = ConfigurationStore::open(&config.database_path)
            .map_err(|e| GatewayError::persistence("Failed to open database", e))?;
        let summarizer = hwconf_advisor::build_summarizer(&config.openrouter);
        Ok(Self::from_parts(config, store, summarizer))
    }

    /// Assemble a gateway from ready-made parts
    pub fn from_parts(
        config: GatewayConfig,
        store: ConfigurationStore,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            state: Arc::new(AppState::new(config, store, summarizer)),
        }
    }

    /// Get gateway state
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .route("/api/auth/signup", post(Self::handle_signup))
            .route("/api/auth/login", post(Self::handle_login))
            .route(
                "/api/auth/profile",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            )
            .route("/api/generate", post(Self::handle_generate))
            .route("/api/configurations", get(Self::handle_list_configurations))
            .route(
                "/api/configurations/:id",
                get(Self::handle_get_configuration),
            )
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the gateway server
    pub async fn start(&self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let router = self.build_router();

        tracing::info!(
            summarizer = self.state.summarizer.name(),
            "Hardware configurator API starting on {}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(())
    }

    // HTTP handlers

    async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
        let ping = state.store.lock().ping();
        match ping {
            Ok(now) => Json(json!({
                "success": true,
                "message": "Database connection successful!",
                "timestamp": now.to_rfc3339(),
                "version": crate::VERSION,
            }))
            .into_response(),
            Err(e) => {
                tracing::error!("Database connection test failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Database connection failed",
                        "error": e.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }

    async fn handle_signup(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
        let request: SignupRequest = parse_body(&body)?;
        let (Some(email), Some(password)) = (non_blank(request.email), non_blank(request.password))
        else {
            return Err(GatewayError::InvalidPayload(
                "Email and password are required".to_string(),
            ));
        };
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GatewayError::InvalidPayload(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let existing = state.store.lock().find_user_by_email(&email)?;
        if existing.is_some() {
            return Err(GatewayError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&password, state.config.auth.bcrypt_cost).await?;
        let name = non_blank(request.name);
        let user = state
            .store
            .lock()
            .create_user(&email, &password_hash, name.as_deref())?;
        let token = state.tokens.issue(user.id, &user.email)?;

        tracing::info!(user_id = user.id, "User signed up");
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "User created successfully",
                "user": public_user(&user),
                "token": token,
            })),
        )
            .into_response())
    }

    async fn handle_login(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
        let request: LoginRequest = parse_body(&body)?;
        let (Some(email), Some(password)) = (non_blank(request.email), non_blank(request.password))
        else {
            return Err(GatewayError::InvalidPayload(
                "Email and password are required".to_string(),
            ));
        };

        let invalid = || GatewayError::Unauthenticated("Invalid email or password".to_string());

        let user = state
            .store
            .lock()
            .find_user_by_email(&email)?
            .ok_or_else(invalid)?;
        if !verify_password(&password, &user.password_hash).await {
            return Err(invalid());
        }

        let token = state.tokens.issue(user.id, &user.email)?;
        let cookie = session_cookie(
            &token,
            state.tokens.ttl_secs(),
            state.config.auth.secure_cookies,
        );

        tracing::info!(user_id = user.id, "User logged in");
        Ok((
            [(SET_COOKIE, cookie)],
            Json(json!({
                "success": true,
                "message": "Login successful",
                "user": public_user(&user),
                "token": token,
            })),
        )
            .into_response())
    }

    async fn handle_get_profile(
        State(state): State<Arc<AppState>>,
        auth: AuthUser,
    ) -> Result<Json<Value>> {
        let user = load_user(&state, auth.id())?;
        Ok(Json(json!({ "success": true, "user": user })))
    }

    async fn handle_update_profile(
        State(state): State<Arc<AppState>>,
        auth: AuthUser,
        body: Bytes,
    ) -> Result<Json<Value>> {
        let request: ProfileUpdateRequest = parse_body(&body)?;
        let user = load_user(&state, auth.id())?;
        let mut update = UserUpdate {
            name: request.name,
            ..Default::default()
        };

        if let Some(email) = request.email.filter(|e| *e != user.email) {
            let taken = state.store.lock().find_user_by_email(&email)?;
            if taken.is_some() {
                return Err(GatewayError::Conflict("Email already in use".to_string()));
            }
            update.email = Some(email);
        }

        if let Some(new_password) = request.new_password {
            let Some(current) = non_blank(request.current_password) else {
                return Err(GatewayError::InvalidPayload(
                    "Current password required to change password".to_string(),
                ));
            };
            if !verify_password(&current, &user.password_hash).await {
                return Err(GatewayError::Unauthenticated(
                    "Current password is incorrect".to_string(),
                ));
            }
            if new_password.chars().count() < MIN_PASSWORD_LEN {
                return Err(GatewayError::InvalidPayload(format!(
                    "New password must be at least {} characters",
                    MIN_PASSWORD_LEN
                )));
            }
            update.password_hash =
                Some(hash_password(&new_password, state.config.auth.bcrypt_cost).await?);
        }

        if update.is_empty() {
            return Err(GatewayError::InvalidPayload(
                "No fields to update".to_string(),
            ));
        }

        let user = state.store.lock().update_user(user.id, &update)?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(Json(json!({
            "success": true,
            "message": "Profile updated successfully",
            "user": user,
        })))
    }

    async fn handle_generate(
        State(state): State<Arc<AppState>>,
        auth: AuthUser,
        body: Bytes,
    ) -> Result<Response> {
        let raw: Value = serde_json::from_slice(&body)
            .map_err(|_| GatewayError::InvalidPayload("Invalid request payload".to_string()))?;
        let requirements = Requirements::from_value(&raw)?;

        let recommendation =
            hwconf_core::recommend(&requirements, state.summarizer.as_ref()).await;

        let configuration = state.store.lock().insert_configuration(&NewConfiguration {
            user_id: auth.id(),
            requirements: &requirements,
            summary: &recommendation.summary,
            used_ai: recommendation.used_ai,
        })?;

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Configuration generated & stored.",
                "requirements": requirements,
                "baselineSpec": recommendation.baseline,
                "aiSummary": recommendation.summary,
                "usedAI": recommendation.used_ai,
                "configuration": configuration,
                "generatedAt": chrono::Utc::now().to_rfc3339(),
            })),
        )
            .into_response())
    }

    async fn handle_list_configurations(
        State(state): State<Arc<AppState>>,
        auth: AuthUser,
    ) -> Result<Json<Value>> {
        let configurations = state.store.lock().list_configurations(auth.id())?;
        Ok(Json(json!({
            "success": true,
            "configurations": configurations,
        })))
    }

    async fn handle_get_configuration(
        State(state): State<Arc<AppState>>,
        auth: AuthUser,
        Path(id): Path<String>,
    ) -> Result<Json<Value>> {
        let not_found = || GatewayError::NotFound("Configuration not found".to_string());

        let id: i64 = id.parse().map_err(|_| not_found())?;
        let configuration = state
            .store
            .lock()
            .get_configuration(auth.id(), id)?
            .ok_or_else(not_found)?;

        Ok(Json(json!({
            "success": true,
            "configuration": configuration,
        })))
    }
}

/// Empty bodies decode as the all-`None` request
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|_| GatewayError::InvalidPayload("Invalid request payload".to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn load_user(state: &AppState, id: i64) -> Result<User> {
    state
        .store
        .lock()
        .find_user_by_id(id)?
        .ok_or_else(|| GatewayError::NotFound("User not found".to_string()))
}

fn public_user(user: &User) -> Value {
    json!({ "id": user.id, "email": user.email, "name": user.name })
}
