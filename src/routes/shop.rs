use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::{load_user, non_blank};
use crate::error::{require, AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middlewares::auth::AuthUser;
use crate::models::shop::find_item;
use crate::models::user::MAX_ENERGY;
use crate::models::{Inventory, ShopItem, CATALOG};
use crate::services::economy::{check_purchase, energy_gain, PurchaseRefusal};
use crate::AppState;

async fn catalog() -> Json<&'static [ShopItem]> {
    Json(CATALOG)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuyRequest {
    user_id: Option<i64>,
    item_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyResponse {
    item_id: &'static str,
    coins: i64,
    energy: i64,
    inventory: Inventory,
}

async fn buy(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BuyRequest>,
) -> AppResult<Json<BuyResponse>> {
    let user_id = require(req.user_id, "userId")?;
    let item_id = require(non_blank(req.item_id), "itemId")?;
    auth.ensure(user_id)?;

    let item =
        find_item(&item_id).ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    let user = load_user(&state, user_id).await?;

    // Once-only items are claimed before any coins move.
    let reserved = !item.is_consumable();
    if reserved && !state.ledger.try_grant(user_id, item.id).await {
        return Err(AppError::BadRequest(PurchaseRefusal::AlreadyOwned.message()));
    }

    if let Err(e) = charge(&state, user_id, item, user.coins).await {
        if reserved {
            state.ledger.release(user_id, item.id).await;
        }
        return Err(e);
    }

    if let Some(amount) = energy_gain(item) {
        state
            .store
            .restore_energy(user_id, amount, MAX_ENERGY)
            .await?;
    }

    let user = load_user(&state, user_id).await?;
    let inventory = state.ledger.inventory(user_id).await;
    tracing::info!(
        user_id,
        item_id = item.id,
        price = item.price,
        coins = user.coins,
        "item bought"
    );

    Ok(Json(BuyResponse {
        item_id: item.id,
        coins: user.coins,
        energy: user.energy,
        inventory,
    }))
}

async fn charge(state: &AppState, user_id: i64, item: &ShopItem, coins: i64) -> AppResult<()> {
    check_purchase(item, coins, false).map_err(|r| AppError::BadRequest(r.message()))?;
    // The balance may have moved since it was read; the debit itself re-checks it.
    if !state.store.spend_coins(user_id, item.price).await? {
        return Err(AppError::BadRequest("Not enough coins".to_string()));
    }
    Ok(())
}

async fn inventory(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Inventory>> {
    load_user(&state, user_id).await?;
    Ok(Json(state.ledger.inventory(user_id).await))
}

pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/shop/catalog", get(catalog))
        .route("/shop/inventory/:user_id", get(inventory))
}

pub fn protected_shop_routes() -> Router<AppState> {
    Router::new().route("/shop/buy", post(buy))
}
