//! city_preview: print the city layout for a seed as JSON, plus a summary.
//!
//! Usage:
//!   cargo run --bin city_preview -- <seed> [blocks]
//! Example:
//!   cargo run --bin city_preview -- 42 32 > city.json

use anyhow::{Context, Result};
use robo_city::scene::{generate_city, BuildingKind, CityParams};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("seed '{raw}' is not a number"))?,
        None => 1,
    };
    let mut params = CityParams::with_seed(seed);
    if let Some(raw) = args.next() {
        params.blocks = raw
            .parse()
            .with_context(|| format!("block count '{raw}' is not a number"))?;
    }

    let city = generate_city(&params);
    let count = |kind: BuildingKind| city.buildings.iter().filter(|b| b.kind == kind).count();
    tracing::info!(
        seed,
        blocks = params.blocks,
        towers = count(BuildingKind::Tower),
        brownstones = count(BuildingKind::Brownstone),
        parks = count(BuildingKind::Park),
        "generated city"
    );

    println!("{}", serde_json::to_string_pretty(&city)?);
    Ok(())
}
