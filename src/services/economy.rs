//! Coin, score and energy rules shared by the game and shop routes.

use crate::models::{ItemEffect, ShopItem};

/// Energy one city run costs.
pub const RUN_ENERGY_COST: i64 = 10;

/// Highest score one run can report.
pub const MAX_RUN_SCORE: i64 = 1_000_000;

/// Coins earned for a finished run: one coin per ten points.
pub fn coins_for_score(score: i64) -> i64 {
    score.max(0) / 10
}

/// Why a purchase was turned down before any balance moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseRefusal {
    AlreadyOwned,
    NotEnoughCoins { price: i64, coins: i64 },
}

impl PurchaseRefusal {
    pub fn message(&self) -> String {
        match self {
            PurchaseRefusal::AlreadyOwned => "Item already owned".to_string(),
            PurchaseRefusal::NotEnoughCoins { price, coins } => {
                format!("Not enough coins: item costs {price}, you have {coins}")
            }
        }
    }
}

pub fn check_purchase(item: &ShopItem, coins: i64, owned: bool) -> Result<(), PurchaseRefusal> {
    if owned && !item.is_consumable() {
        return Err(PurchaseRefusal::AlreadyOwned);
    }
    if coins < item.price {
        return Err(PurchaseRefusal::NotEnoughCoins {
            price: item.price,
            coins,
        });
    }
    Ok(())
}

pub fn energy_gain(item: &ShopItem) -> Option<i64> {
    match item.effect {
        ItemEffect::Energy { amount } => Some(amount),
        _ => None,
    }
}
