//! Procedural "Manhattan" blocks lining the robot's path.
//!
//! Generation is deterministic for a given [`CityParams`]: the same seed
//! always yields the same skyline, so the server only has to hand the client
//! a seed and both sides agree on the layout.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::path::PathCurve;

const TOWER_PALETTE: &[[f32; 3]] = &[
    [0.55, 0.62, 0.72],
    [0.42, 0.50, 0.63],
    [0.70, 0.74, 0.80],
    [0.36, 0.44, 0.58],
];
const BROWNSTONE_PALETTE: &[[f32; 3]] = &[
    [0.55, 0.33, 0.25],
    [0.62, 0.40, 0.30],
    [0.72, 0.52, 0.38],
    [0.48, 0.30, 0.24],
];
const PARK_COLOR: [f32; 3] = [0.30, 0.62, 0.28];
const PARK_HEIGHT: f32 = 0.2;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityParams {
    pub seed: u64,
    /// Path length along +Z in metres.
    pub length: f32,
    /// Blocks along the path; each has one lot per side.
    pub blocks: u32,
    pub street_half_width: f32,
    /// Deepest a lot reaches along the street; short blocks cap it further.
    pub block_depth: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            seed: 1,
            length: 480.0,
            blocks: 24,
            street_half_width: 6.0,
            block_depth: 14.0,
            min_height: 6.0,
            max_height: 60.0,
        }
    }
}

impl CityParams {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildingKind {
    Tower,
    Brownstone,
    Park,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub kind: BuildingKind,
    /// Centre of the footprint at ground level.
    pub position: Vec3,
    /// x across the street, y height, z along the street.
    pub size: Vec3,
    pub yaw: f32,
    pub color: [f32; 3],
    /// Curve parameter of the lot this building sits on.
    pub path_t: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityLayout {
    pub seed: u64,
    pub path: Vec<Vec3>,
    pub buildings: Vec<Building>,
}

pub fn city_path(params: &CityParams) -> PathCurve {
    let control_points = (params.blocks as usize / 4).max(2);
    PathCurve::meander(
        params.seed,
        params.length,
        control_points,
        params.street_half_width,
    )
}

pub fn generate_city(params: &CityParams) -> CityLayout {
    let curve = city_path(params);
    // Separate stream from the path so tweaking block rules never moves the road.
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(0x9e37_79b9));
    let blocks = params.blocks.max(1);
    let spacing = curve.length() / blocks as f32;
    let max_depth = params.block_depth.min(spacing * 0.85);
    let tower_floor = (params.max_height * 0.5).max(params.min_height);
    let brownstone_cap = (params.max_height * 0.4).max(params.min_height);

    let mut buildings = Vec::with_capacity(blocks as usize * 2);
    for block in 0..blocks {
        let t = (block as f32 + 0.5) / blocks as f32;
        let base = curve.sample(t);
        let side = curve.side(t);
        let yaw = curve.yaw(t);

        for dir in [-1.0f32, 1.0] {
            let kind = pick_kind(&mut rng);
            let width = rng.random_range(8.0..16.0);
            let depth = max_depth * rng.random_range(0.65..=1.0);
            let height = match kind {
                BuildingKind::Tower => rng.random_range(tower_floor..=params.max_height),
                BuildingKind::Brownstone => rng.random_range(params.min_height..=brownstone_cap),
                BuildingKind::Park => PARK_HEIGHT,
            };
            let setback = rng.random_range(1.0..3.0);
            let offset = params.street_half_width + width * 0.5 + setback;
            let color = match kind {
                BuildingKind::Tower => TOWER_PALETTE[rng.random_range(0..TOWER_PALETTE.len())],
                BuildingKind::Brownstone => {
                    BROWNSTONE_PALETTE[rng.random_range(0..BROWNSTONE_PALETTE.len())]
                }
                BuildingKind::Park => PARK_COLOR,
            };

            buildings.push(Building {
                kind,
                position: base + side * dir * offset,
                size: Vec3::new(width, height, depth),
                yaw,
                color,
                path_t: t,
            });
        }
    }

    CityLayout {
        seed: params.seed,
        path: curve.points(blocks as usize * 4),
        buildings,
    }
}

fn pick_kind(rng: &mut ChaCha8Rng) -> BuildingKind {
    let roll: f32 = rng.random();
    if roll < 0.15 {
        BuildingKind::Park
    } else if roll < 0.5 {
        BuildingKind::Tower
    } else {
        BuildingKind::Brownstone
    }
}
