//! Decorative rooms the robot can visit between runs.

use std::str::FromStr;

use glam::Vec3;
use serde::Serialize;

/// Rooms are 10 x 10 metres centred on the origin.
pub const ROOM_HALF_EXTENT: f32 = 5.0;
pub const ROOM_HEIGHT: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomKind {
    Bedroom,
    Workshop,
    Shop,
}

impl FromStr for RoomKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bedroom" => Ok(RoomKind::Bedroom),
            "workshop" => Ok(RoomKind::Workshop),
            "shop" => Ok(RoomKind::Shop),
            other => Err(format!("unknown room: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Furniture {
    pub name: &'static str,
    /// Centre of the piece at floor level.
    pub position: Vec3,
    pub size: Vec3,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub kind: RoomKind,
    pub half_extent: f32,
    pub height: f32,
    pub wall_color: [f32; 3],
    pub furniture: Vec<Furniture>,
}

fn piece(name: &'static str, x: f32, z: f32, size: [f32; 3], color: [f32; 3]) -> Furniture {
    Furniture {
        name,
        position: Vec3::new(x, 0.0, z),
        size: Vec3::from_array(size),
        color,
    }
}

pub fn build_room(kind: RoomKind) -> Room {
    let (wall_color, furniture) = match kind {
        RoomKind::Bedroom => (
            [0.93, 0.86, 0.95],
            vec![
                piece("bed", -3.0, -3.2, [2.0, 0.6, 3.0], [0.45, 0.60, 0.90]),
                piece("nightstand", -1.4, -4.2, [0.6, 0.6, 0.6], [0.80, 0.62, 0.42]),
                piece("toy-chest", 3.2, -3.8, [1.6, 0.8, 0.9], [0.95, 0.55, 0.35]),
                piece("rug", 0.0, 0.5, [3.0, 0.02, 2.2], [0.98, 0.80, 0.40]),
                piece("bookshelf", 4.4, 1.5, [0.5, 2.0, 1.8], [0.70, 0.50, 0.32]),
            ],
        ),
        RoomKind::Workshop => (
            [0.78, 0.80, 0.82],
            vec![
                piece("workbench", 0.0, -4.0, [3.5, 1.0, 1.2], [0.60, 0.45, 0.30]),
                piece("tool-rack", -4.4, -1.0, [0.4, 2.2, 2.5], [0.35, 0.38, 0.42]),
                piece("charging-pad", 2.5, 2.5, [1.8, 0.1, 1.8], [0.30, 0.85, 0.95]),
                piece("parts-bin", -2.5, 3.5, [1.2, 0.9, 1.2], [0.95, 0.75, 0.20]),
            ],
        ),
        RoomKind::Shop => (
            [0.98, 0.93, 0.80],
            vec![
                piece("counter", 0.0, -3.0, [4.0, 1.1, 1.0], [0.85, 0.35, 0.35]),
                piece("display-left", -4.0, 0.5, [1.0, 1.8, 3.0], [0.40, 0.70, 0.45]),
                piece("display-right", 4.0, 0.5, [1.0, 1.8, 3.0], [0.40, 0.55, 0.85]),
                piece("battery-stand", 0.0, 2.8, [1.0, 1.4, 1.0], [0.95, 0.85, 0.25]),
            ],
        ),
    };

    Room {
        kind,
        half_extent: ROOM_HALF_EXTENT,
        height: ROOM_HEIGHT,
        wall_color,
        furniture,
    }
}
