use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use robo_city::config::Config;
use robo_city::models::{Doll, NewDoll, User};
use robo_city::services::image::{FallbackChain, ImageError, ImageGenerator, PromptUrlImages};
use robo_city::store::{MemoryStore, Store, StoreError};
use robo_city::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubImages;

#[async_trait]
impl ImageGenerator for StubImages {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        Ok(format!("https://img.test/{}.png", prompt.len()))
    }
}

struct Offline;

#[async_trait]
impl ImageGenerator for Offline {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
        Err(ImageError::Status(500))
    }
}

/// Memory store that yields between reading a balance and debiting it, so
/// concurrent requests interleave the way they do against a real database.
struct SlowStore(MemoryStore);

#[async_trait]
impl Store for SlowStore {
    async fn find_or_create_user(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError> {
        self.0.find_or_create_user(username, email).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = self.0.find_user(id).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        user
    }

    async fn add_score(
        &self,
        id: i64,
        score: i64,
        coins: i64,
    ) -> Result<Option<User>, StoreError> {
        self.0.add_score(id, score, coins).await
    }

    async fn spend_coins(&self, id: i64, amount: i64) -> Result<bool, StoreError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.0.spend_coins(id, amount).await
    }

    async fn spend_energy(&self, id: i64, amount: i64) -> Result<bool, StoreError> {
        self.0.spend_energy(id, amount).await
    }

    async fn restore_energy(
        &self,
        id: i64,
        amount: i64,
        cap: i64,
    ) -> Result<Option<User>, StoreError> {
        self.0.restore_energy(id, amount, cap).await
    }

    async fn insert_doll(&self, doll: NewDoll) -> Result<Doll, StoreError> {
        self.0.insert_doll(doll).await
    }

    async fn dolls_for_user(&self, user_id: i64) -> Result<Vec<Doll>, StoreError> {
        self.0.dolls_for_user(user_id).await
    }
}

fn test_app_on(store: Arc<dyn Store>, images: Arc<dyn ImageGenerator>) -> Router {
    app(AppState::new(Config::for_tests(), store, images))
}

fn test_app_with(images: Arc<dyn ImageGenerator>) -> Router {
    test_app_on(Arc::new(MemoryStore::new()), images)
}

fn test_app() -> Router {
    test_app_with(Arc::new(StubImages))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router, username: &str) -> (i64, String) {
    let (status, body) =
        send(app, post("/user/login", None, json!({ "username": username }))).await;
    assert_eq!(status, StatusCode::OK);
    (
        body["user"]["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

fn buy(token: &str, user_id: i64, item_id: &str) -> Request<Body> {
    post("/shop/buy", Some(token), json!({ "userId": user_id, "itemId": item_id }))
}

async fn earn(app: &Router, user_id: i64, token: &str, score: i64) -> Value {
    let (status, body) = send(
        app,
        post("/game/add-score", Some(token), json!({ "userId": user_id, "score": score })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn login_creates_user_once() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(post("/user/login", None, json!({ "username": "robo", "email": "r@x.io" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token="));

    let (first, _) = login(&app, "robo").await;
    let (second, _) = login(&app, "robo").await;
    let (other, _) = login(&app, "bolt").await;
    assert_eq!(first, second);
    assert_ne!(first, other);

    let (status, profile) = send(&app, get(&format!("/user/profile/{first}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "robo");
    assert_eq!(profile["email"], "r@x.io");
    assert_eq!(profile["coins"], 0);
    assert_eq!(profile["energy"], 100);
}

#[tokio::test]
async fn login_requires_username() {
    let app = test_app();
    let (status, body) = send(&app, post("/user/login", None, json!({ "email": "a@b.c" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username is required");

    let (status, _) = send(&app, post("/user/login", None, json!({ "username": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, get("/user/profile/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn add_score_pays_a_tenth_in_coins() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;

    let body = earn(&app, user_id, &token, 125).await;
    assert_eq!(body, json!({ "score": 125, "coins": 12, "coinsEarned": 12 }));

    let body = earn(&app, user_id, &token, 9).await;
    assert_eq!(body, json!({ "score": 134, "coins": 12, "coinsEarned": 0 }));

    let (status, stats) = send(&app, get(&format!("/game/stats/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["score"], 134);
    assert_eq!(stats["gamesPlayed"], 2);
    assert_eq!(stats["bestScore"], 125);
    assert_eq!(stats["lastScore"], 9);
}

#[tokio::test]
async fn add_score_validates_input() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;

    let (status, body) =
        send(&app, post("/game/add-score", Some(&token), json!({ "userId": user_id }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "score is required");

    let (status, _) = send(
        &app,
        post("/game/add-score", Some(&token), json!({ "userId": user_id, "score": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_score_refuses_scores_past_the_run_limit() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;
    earn(&app, user_id, &token, 50).await;

    let huge = json!({ "userId": user_id, "score": i64::MAX });
    let (status, body) = send(&app, post("/game/add-score", Some(&token), huge)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("score must be between"));

    let (_, profile) = send(&app, get(&format!("/user/profile/{user_id}"))).await;
    assert_eq!(profile["score"], 50);
    assert_eq!(profile["coins"], 5);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;

    let wrong_type = json!({ "userId": user_id, "score": "ten" });
    let (status, body) = send(&app, post("/game/add-score", Some(&token), wrong_type)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let broken = Request::post("/user/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = send(&app, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get("/user/profile/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get("/shop/inventory/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn protected_routes_check_the_token() {
    let app = test_app();
    let (robo, _) = login(&app, "robo").await;
    let (_, bolt_token) = login(&app, "bolt").await;
    let payload = json!({ "userId": robo, "score": 50 });

    let (status, _) = send(&app, post("/game/add-score", None, payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, post("/game/add-score", Some("not-a-jwt"), payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, post("/game/add-score", Some(&bolt_token), payload)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, profile) = send(&app, get(&format!("/user/profile/{robo}"))).await;
    assert_eq!(profile["score"], 0);
}

#[tokio::test]
async fn buying_without_enough_coins_changes_nothing() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;
    earn(&app, user_id, &token, 300).await;

    let (status, body) = send(
        &app,
        post("/shop/buy", Some(&token), json!({ "userId": user_id, "itemId": "rocket-boots" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Not enough coins"));

    let (_, profile) = send(&app, get(&format!("/user/profile/{user_id}"))).await;
    assert_eq!(profile["coins"], 30);
    let (_, inventory) = send(&app, get(&format!("/shop/inventory/{user_id}"))).await;
    assert_eq!(inventory, json!({}));
}

#[tokio::test]
async fn cosmetics_are_owned_once() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;
    earn(&app, user_id, &token, 1000).await;
    let buy_hat = || buy(&token, user_id, "propeller-hat");

    let (status, body) = send(&app, buy_hat()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coins"], 60);
    assert_eq!(body["inventory"], json!({ "propeller-hat": 1 }));

    let (status, body) = send(&app, buy_hat()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Item already owned");

    let (_, profile) = send(&app, get(&format!("/user/profile/{user_id}"))).await;
    assert_eq!(profile["coins"], 60);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_buys_of_one_cosmetic_charge_once() {
    let app = test_app_on(Arc::new(SlowStore(MemoryStore::new())), Arc::new(StubImages));
    let (user_id, token) = login(&app, "robo").await;
    earn(&app, user_id, &token, 2000).await;

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            let req = buy(&token, user_id, "rocket-boots");
            tokio::spawn(async move { send(&app, req).await.0 })
        })
        .collect();
    let mut bought = 0;
    for attempt in attempts {
        if attempt.await.unwrap() == StatusCode::OK {
            bought += 1;
        }
    }
    assert_eq!(bought, 1);

    let (_, profile) = send(&app, get(&format!("/user/profile/{user_id}"))).await;
    assert_eq!(profile["coins"], 80);
    let (_, inventory) = send(&app, get(&format!("/shop/inventory/{user_id}"))).await;
    assert_eq!(inventory, json!({ "rocket-boots": 1 }));
}

#[tokio::test]
async fn failed_payment_releases_the_claim() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;
    earn(&app, user_id, &token, 1000).await;

    let (status, _) = send(&app, buy(&token, user_id, "rocket-boots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, inventory) = send(&app, get(&format!("/shop/inventory/{user_id}"))).await;
    assert_eq!(inventory, json!({}));

    earn(&app, user_id, &token, 200).await;
    let (status, body) = send(&app, buy(&token, user_id, "rocket-boots")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"], json!({ "rocket-boots": 1 }));
}

#[tokio::test]
async fn unknown_items_and_missing_fields() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;

    let (status, _) = send(
        &app,
        post("/shop/buy", Some(&token), json!({ "userId": user_id, "itemId": "flying-car" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&app, post("/shop/buy", Some(&token), json!({ "userId": user_id }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "itemId is required");
}

#[tokio::test]
async fn runs_cost_energy_and_batteries_refill_it() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;
    let start = || post("/game/start", Some(&token), json!({ "userId": user_id }));

    for expected in (0..10).rev().map(|i| i * 10) {
        let (status, body) = send(&app, start()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["energy"], expected);
        assert!(body["citySeed"].is_u64());
    }

    let (status, body) = send(&app, start()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not enough energy");

    earn(&app, user_id, &token, 200).await;
    let (status, body) = send(
        &app,
        post("/shop/buy", Some(&token), json!({ "userId": user_id, "itemId": "battery-small" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["energy"], 20);
    assert_eq!(body["coins"], 10);
    assert_eq!(body["inventory"], json!({}));
}

#[tokio::test]
async fn dolls_are_generated_and_listed() {
    let app = test_app();
    let (user_id, token) = login(&app, "robo").await;

    for name in ["Pip", "Zap"] {
        let (status, doll) = send(
            &app,
            post(
                "/doll/generate",
                Some(&token),
                json!({ "userId": user_id, "name": name, "description": "a tin robot with a bow" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(doll["name"], name);
        assert_eq!(doll["isGood"], true);
        assert!(doll["imageUrl"].as_str().unwrap().starts_with("https://img.test/"));
    }

    let (status, history) = send(&app, get(&format!("/doll/history/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = history.as_array().unwrap().iter().map(|d| d["name"].clone()).collect();
    assert_eq!(names, [json!("Zap"), json!("Pip")]);

    let (status, body) = send(
        &app,
        post("/doll/generate", Some(&token), json!({ "userId": user_id, "name": "Pip" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "description is required");
}

#[tokio::test]
async fn doll_generation_falls_back_quietly() {
    let chain = FallbackChain::new(
        Box::new(Offline),
        Box::new(PromptUrlImages::new("https://free.test/prompt/").unwrap()),
    );
    let app = test_app_with(Arc::new(chain));
    let (user_id, token) = login(&app, "robo").await;

    let (status, doll) = send(
        &app,
        post(
            "/doll/generate",
            Some(&token),
            json!({
                "userId": user_id,
                "name": "Grumble",
                "description": "a grumpy teapot",
                "isGood": false,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(doll["isGood"], false);
    assert!(doll["imageUrl"].as_str().unwrap().starts_with("https://free.test/prompt/"));
}

#[tokio::test]
async fn city_layout_is_deterministic() {
    let app = test_app();
    let (status, first) = send(&app, get("/city/42")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, get("/city/42")).await;
    assert_eq!(first, second);
    assert_eq!(first["seed"], 42);
    assert!(!first["buildings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn rooms_by_name() {
    let app = test_app();
    let (status, room) = send(&app, get("/room/workshop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["kind"], "workshop");

    let (status, _) = send(&app, get("/room/attic")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_and_landing_page() {
    let app = test_app();
    let (status, catalog) = send(&app, get("/shop/catalog")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(catalog
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["id"] == "battery-small" && item["effect"]["type"] == "energy"));

    let (status, page) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let page = page.as_str().unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("Robo City"));
    assert!(page.contains("Propeller Hat"));

    let (status, health) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}
