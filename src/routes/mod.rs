pub mod doll;
pub mod game;
pub mod home;
pub mod scene;
pub mod shop;
pub mod user;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::AppState;

pub(crate) async fn load_user(state: &AppState, user_id: i64) -> AppResult<User> {
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Treats blank strings like absent ones.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
