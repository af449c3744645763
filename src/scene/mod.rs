//! Deterministic scene logic shared with the browser client.
//!
//! The client renders meshes; everything here is plain data so the server can
//! hand out layouts and the same rules can be unit tested.

pub mod city;
pub mod gait;
pub mod gesture;
pub mod path;
pub mod room;

pub use city::{generate_city, Building, BuildingKind, CityLayout, CityParams};
pub use gait::{Gait, RobotController};
pub use gesture::{classify, Directions, GestureRef, Landmark};
pub use path::PathCurve;
pub use room::{build_room, Furniture, RoomKind};
