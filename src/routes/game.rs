use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::load_user;
use crate::error::{require, AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middlewares::auth::AuthUser;
use crate::models::GameStats;
use crate::services::economy::{coins_for_score, MAX_RUN_SCORE, RUN_ENERGY_COST};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest {
    user_id: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    energy: i64,
    city_seed: u32,
}

async fn start_run(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<StartRequest>,
) -> AppResult<Json<StartResponse>> {
    let user_id = require(req.user_id, "userId")?;
    auth.ensure(user_id)?;
    load_user(&state, user_id).await?;

    if !state.store.spend_energy(user_id, RUN_ENERGY_COST).await? {
        return Err(AppError::BadRequest("Not enough energy".to_string()));
    }
    let user = load_user(&state, user_id).await?;
    let city_seed = rand::random::<u32>();

    tracing::info!(user_id, city_seed, energy = user.energy, "run started");
    Ok(Json(StartResponse {
        energy: user.energy,
        city_seed,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddScoreRequest {
    user_id: Option<i64>,
    score: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddScoreResponse {
    score: i64,
    coins: i64,
    coins_earned: i64,
}

async fn add_score(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddScoreRequest>,
) -> AppResult<Json<AddScoreResponse>> {
    let user_id = require(req.user_id, "userId")?;
    let score = require(req.score, "score")?;
    auth.ensure(user_id)?;
    if !(0..=MAX_RUN_SCORE).contains(&score) {
        return Err(AppError::BadRequest(format!(
            "score must be between 0 and {MAX_RUN_SCORE}"
        )));
    }

    let coins_earned = coins_for_score(score);
    let user = state
        .store
        .add_score(user_id, score, coins_earned)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    state.ledger.record_game(user_id, score).await;

    tracing::info!(user_id, score, coins_earned, "score recorded");
    Ok(Json(AddScoreResponse {
        score: user.score,
        coins: user.coins,
        coins_earned,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    user_id: i64,
    score: i64,
    coins: i64,
    energy: i64,
    #[serde(flatten)]
    stats: GameStats,
}

async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<StatsResponse>> {
    let user = load_user(&state, user_id).await?;
    let stats = state.ledger.stats(user_id).await;
    Ok(Json(StatsResponse {
        user_id,
        score: user.score,
        coins: user.coins,
        energy: user.energy,
        stats,
    }))
}

pub fn game_routes() -> Router<AppState> {
    Router::new().route("/game/stats/:user_id", get(stats))
}

pub fn protected_game_routes() -> Router<AppState> {
    Router::new()
        .route("/game/start", post(start_run))
        .route("/game/add-score", post(add_score))
}
