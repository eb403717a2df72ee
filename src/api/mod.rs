//! API handlers for Bookshelf REST endpoints

pub mod auth;
pub mod books;
pub mod cors;
pub mod echo;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde::de::DeserializeOwned;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::auth::TokenClaims,
    AppState,
};

/// Extractor for an authenticated caller. Rejects the request when the
/// bearer token is absent, malformed, invalid or expired.
pub struct AuthenticatedUser(pub TokenClaims);

/// Extractor for endpoints open to anonymous callers. No header, or an
/// empty one, means `None`; any other value must carry a valid token.
pub struct MaybeAuthenticated(pub Option<TokenClaims>);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match MaybeAuthenticated::from_request_parts(parts, state).await? {
            MaybeAuthenticated(Some(claims)) => Ok(AuthenticatedUser(claims)),
            MaybeAuthenticated(None) => Err(AppError::Authentication(
                "Missing authorization header".to_string(),
            )),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeAuthenticated(None));
        };

        let header = value
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid authorization header format".to_string()))?;
        if header.is_empty() {
            return Ok(MaybeAuthenticated(None));
        }

        let token = bearer_token(header)?;
        let claims = state.services.auth.verify_token(token)?;
        Ok(MaybeAuthenticated(Some(claims)))
    }
}

/// Extract the token from `Bearer <token>`: exactly two space-separated
/// parts, the scheme compared case-insensitively.
fn bearer_token(header: &str) -> AppResult<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AppError::Authentication(
            "Invalid authorization header format".to_string(),
        )),
    }
}

/// JSON body extractor: decodes regardless of Content-Type, runs
/// `validator` rules, and turns every failure into a 400.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let value: T = serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid payload: {}", e)))?;
        value
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Liveness
        .route("/ping", get(health::ping))
        .route("/echo", post(echo::echo))
        // Authentication
        .route("/auth/token", post(auth::token))
        .route("/auth/me", get(auth::me))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    api.merge(openapi).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(state, cors::cors)),
    )
}
