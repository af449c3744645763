use axum::body::Body;
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::{Parts, Request},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn issue_token(cfg: &Config, user_id: i64) -> AppResult<String> {
    let expires = chrono::Utc::now() + chrono::Duration::hours(cfg.token_ttl_hours);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("could not sign token: {e}")))
}

pub fn session_cookie(token: &str, cfg: &Config) -> String {
    format!(
        "token={}; HttpOnly; Path=/; Max-Age={}; SameSite=Strict",
        token,
        cfg.token_ttl_hours * 3600
    )
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string());
    if bearer.is_some() {
        return bearer;
    }

    parts
        .headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .map(|s| s.trim())
        .find_map(|s| s.strip_prefix("token="))
        .map(|s| s.to_string())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let token = match token_from_parts(&parts) {
        Some(t) => t,
        None => return AppError::Unauthorized("Missing token").into_response(),
    };

    let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
    let user_id = decode::<Claims>(&token, &decoding_key, &Validation::default())
        .ok()
        .and_then(|data| data.claims.sub.parse::<i64>().ok());

    match user_id {
        Some(id) => {
            // Attach user ID to extensions
            parts.extensions.insert(AuthUser(id));
            let req = Request::from_parts(parts, body);
            next.run(req).await
        }
        None => AppError::Unauthorized("Invalid token").into_response(),
    }
}

/// User id proven by the request's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

impl AuthUser {
    /// Players may only act on their own account.
    pub fn ensure(&self, user_id: i64) -> AppResult<()> {
        if self.0 == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden("Token does not belong to this user"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: (axum::http::HeaderName, &str)) -> Parts {
        let (parts, _) = Request::builder()
            .header(header.0, header.1)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_token_from_cookie() {
        let parts = parts_with((COOKIE, "theme=dark; token=abc.def; lang=en"));
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc.def"));
    }

    #[test]
    fn reads_bearer_token() {
        let parts = parts_with((AUTHORIZATION, "Bearer xyz"));
        assert_eq!(token_from_parts(&parts).as_deref(), Some("xyz"));
    }

    #[test]
    fn issued_token_decodes_to_user() {
        let cfg = Config::for_tests();
        let token = issue_token(&cfg, 42).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "42");
    }

    #[test]
    fn ensure_rejects_other_users() {
        assert!(AuthUser(1).ensure(1).is_ok());
        assert!(matches!(AuthUser(1).ensure(2), Err(AppError::Forbidden(_))));
    }
}
