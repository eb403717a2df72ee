//! Authentication endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::auth::{PrincipalInfo, TokenRequest, TokenResponse},
    AppState,
};

use super::{AuthenticatedUser, ValidatedJson};

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth
        .issue_token(&request.username, &request.password)?;
    Ok(Json(TokenResponse { token }))
}

/// Describe the principal behind the presented token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Verified token claims", body = PrincipalInfo),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<PrincipalInfo> {
    Json(PrincipalInfo::from(claims))
}
