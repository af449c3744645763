use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemEffect {
    /// Consumed on purchase, restores robot energy.
    Energy { amount: i64 },
    /// Wearable part for the robot, owned once.
    Cosmetic { slot: &'static str },
    /// Unlocks a room or district, owned once.
    Unlock { target: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub price: i64,
    pub effect: ItemEffect,
}

impl ShopItem {
    pub fn is_consumable(&self) -> bool {
        matches!(self.effect, ItemEffect::Energy { .. })
    }
}

pub const CATALOG: &[ShopItem] = &[
    ShopItem {
        id: "battery-small",
        name: "Small Battery",
        price: 10,
        effect: ItemEffect::Energy { amount: 20 },
    },
    ShopItem {
        id: "battery-large",
        name: "Big Battery",
        price: 25,
        effect: ItemEffect::Energy { amount: 60 },
    },
    ShopItem {
        id: "propeller-hat",
        name: "Propeller Hat",
        price: 40,
        effect: ItemEffect::Cosmetic { slot: "head" },
    },
    ShopItem {
        id: "rocket-boots",
        name: "Rocket Boots",
        price: 120,
        effect: ItemEffect::Cosmetic { slot: "feet" },
    },
    ShopItem {
        id: "rainbow-paint",
        name: "Rainbow Paint",
        price: 60,
        effect: ItemEffect::Cosmetic { slot: "body" },
    },
    ShopItem {
        id: "workshop-key",
        name: "Workshop Key",
        price: 80,
        effect: ItemEffect::Unlock { target: "workshop" },
    },
];

pub fn find_item(id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == id)
}
