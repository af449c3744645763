use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::{load_user, non_blank};
use crate::error::{require, AppResult};
use crate::extract::{Json, Path};
use crate::middlewares::auth::AuthUser;
use crate::models::{Doll, NewDoll};
use crate::services::image::doll_prompt;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    user_id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    is_good: Option<bool>,
}

async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<GenerateRequest>,
) -> AppResult<(StatusCode, Json<Doll>)> {
    let user_id = require(req.user_id, "userId")?;
    let name = require(non_blank(req.name), "name")?;
    let description = require(non_blank(req.description), "description")?;
    let is_good = req.is_good.unwrap_or(true);
    auth.ensure(user_id)?;
    load_user(&state, user_id).await?;

    let prompt = doll_prompt(&name, &description, is_good);
    let image_url = state.images.generate(&prompt).await?;

    let doll = state
        .store
        .insert_doll(NewDoll {
            user_id,
            name,
            description,
            image_url,
            is_good,
        })
        .await?;

    tracing::info!(user_id, doll_id = doll.id, is_good, "doll generated");
    Ok((StatusCode::CREATED, Json(doll)))
}

async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Doll>>> {
    Ok(Json(state.store.dolls_for_user(user_id).await?))
}

pub fn doll_routes() -> Router<AppState> {
    Router::new().route("/doll/history/:user_id", get(history))
}

pub fn protected_doll_routes() -> Router<AppState> {
    Router::new().route("/doll/generate", post(generate))
}
