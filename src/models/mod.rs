pub mod doll;
pub mod shop;
pub mod stats;
pub mod user;

pub use doll::{Doll, NewDoll};
pub use shop::{ItemEffect, ShopItem, CATALOG};
pub use stats::{GameStats, Inventory};
pub use user::User;
