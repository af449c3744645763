use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::{load_user, non_blank};
use crate::error::{require, AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middlewares::auth::{issue_token, session_cookie};
use crate::models::User;
use crate::AppState;

const MAX_USERNAME_LEN: usize = 64;

#[derive(Deserialize)]
struct LoginRequest {
    username: Option<String>,
    email: Option<String>,
}

#[derive(Serialize)]
struct LoginResponse {
    user: User,
    token: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    let username = require(non_blank(req.username), "username")?;
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::BadRequest(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    let email = non_blank(req.email);

    let user = state
        .store
        .find_or_create_user(&username, email.as_deref())
        .await?;
    let token = issue_token(&state.config, user.id)?;
    let cookie = session_cookie(&token, &state.config);

    tracing::info!(user_id = user.id, username = %user.username, "player logged in");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(LoginResponse { user, token }),
    )
        .into_response())
}

async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(load_user(&state, user_id).await?))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/login", post(login))
        .route("/user/profile/:user_id", get(profile))
}
