use axum::{routing::get, Router};

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::scene::room::Room;
use crate::scene::{build_room, generate_city, CityLayout, CityParams, RoomKind};
use crate::AppState;

async fn city(Path(seed): Path<u64>) -> Json<CityLayout> {
    Json(generate_city(&CityParams::with_seed(seed)))
}

async fn room(Path(kind): Path<String>) -> AppResult<Json<Room>> {
    let kind: RoomKind = kind.parse().map_err(AppError::NotFound)?;
    Ok(Json(build_room(kind)))
}

pub fn scene_routes() -> Router<AppState> {
    Router::new()
        .route("/city/:seed", get(city))
        .route("/room/:kind", get(room))
}
