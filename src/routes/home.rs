use axum::{response::Html, routing::get, Json, Router};
use dioxus::prelude::*;
use dioxus_core::{NoOpMutations, VirtualDom};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{ShopItem, CATALOG};
use crate::AppState;

fn price_tag(item: &ShopItem) -> String {
    format!("{} - {} coins", item.name, item.price)
}

fn app() -> Element {
    let items: Vec<(String, String)> = CATALOG
        .iter()
        .map(|item| (item.id.to_string(), price_tag(item)))
        .collect();

    rsx! {
        head {
            title { "Robo City" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            link { rel: "stylesheet", href: "/assets/index.css" }
        }
        body {
            class: "landing",
            h1 { "Robo City" }
            p { "Wave your hand to walk the robot through the city!" }
            div { id: "root" }
            h2 { "Shop" }
            ul {
                for (id, label) in items {
                    li { key: "{id}", "{label}" }
                }
            }
            script { r#type: "module", src: "/assets/index.js" }
        }
    }
}

async fn home() -> AppResult<Html<String>> {
    let mut renderer = dioxus_ssr::Renderer::new();
    let mut buffer = String::new();
    let mut vdom = VirtualDom::new(app);
    let mut mutations = NoOpMutations;
    vdom.rebuild(&mut mutations);
    renderer
        .render_to(&mut buffer, &vdom)
        .map_err(|e| AppError::Internal(format!("could not render landing page: {e}")))?;
    Ok(Html(format!("<!DOCTYPE html><html>{}</html>", buffer)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
}
