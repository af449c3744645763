pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod scene;
pub mod services;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::ledger::PlayerLedger;
use crate::middlewares::auth::auth_middleware;
use crate::routes::doll::{doll_routes, protected_doll_routes};
use crate::routes::game::{game_routes, protected_game_routes};
use crate::routes::home::home_routes;
use crate::routes::scene::scene_routes;
use crate::routes::shop::{protected_shop_routes, shop_routes};
use crate::routes::user::user_routes;
use crate::services::image::ImageGenerator;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub ledger: Arc<PlayerLedger>,
    pub images: Arc<dyn ImageGenerator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>, images: Arc<dyn ImageGenerator>) -> Self {
        Self {
            store,
            ledger: Arc::new(PlayerLedger::new()),
            images,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let protected_api = Router::new()
        .merge(protected_game_routes())
        .merge(protected_shop_routes())
        .merge(protected_doll_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_api = Router::new()
        .merge(user_routes())
        .merge(game_routes())
        .merge(shop_routes())
        .merge(doll_routes())
        .merge(scene_routes());

    Router::new()
        .merge(home_routes())
        .merge(public_api)
        .merge(protected_api)
        .nest_service(
            "/assets",
            axum::routing::get_service(ServeDir::new(&state.config.assets_dir)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
