use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fairway_core::{Principal, Role};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Principal id (uuid).
    pub sub: String,
    pub role: String,
    pub team_id: Option<Uuid>,
    pub exp: usize,
}

/// Decode the bearer token and inject the acting `Principal` into
/// request extensions. Role-based decisions stay in the reservation
/// manager; this layer only establishes identity.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let claims = token_data.claims;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let role = Role::parse(&claims.role).ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut()
        .insert(Principal::new(id, role, claims.team_id));

    Ok(next.run(req).await)
}
