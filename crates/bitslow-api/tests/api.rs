use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use bitslow_api::{build_router, ApiConfig, AppState};
use bitslow_core::{compute_hash, ClientId, Components};
use bitslow_db::models::NewTransaction;
use bitslow_db::repositories::{ClientRepository, CoinRepository, TransactionRepository};
use bitslow_db::DatabasePool;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    db: Arc<DatabasePool>,
}

impl TestApp {
    async fn new() -> Self {
        let db = Arc::new(DatabasePool::in_memory().await.unwrap());
        let config = ApiConfig {
            debug_endpoints: true,
            ..ApiConfig::default()
        };
        let state = AppState::new(db.clone(), ClientId(config.default_buyer_id));
        Self {
            router: build_router(state, &config),
            db,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    async fn post_as(&self, uri: &str, body: Option<Value>, user: i64) -> (StatusCode, Value) {
        self.request(Method::POST, uri, body, Some(&user.to_string()))
            .await
    }

    async fn register(&self, name: &str, email: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/register",
                json!({ "name": name, "email": email, "password": "secret" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn generate(&self, amount: Value) -> (StatusCode, Value) {
        self.post("/api/bitslows/generate", json!({ "amount": amount }))
            .await
    }
}

#[tokio::test]
async fn test_register_then_duplicate_fails() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/register",
            json!({ "name": "Alice", "email": "alice@example.com", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Alice", "email": "alice@example.com" }));

    let (status, body) = app
        .post(
            "/api/register",
            json!({ "name": "Other", "email": "alice@example.com", "password": "pw2" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Email already registered" }));
}

#[tokio::test]
async fn test_register_rejects_bad_body() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/register", json!({ "name": "NoEmail" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    let (status, body) = app
        .post(
            "/api/register",
            json!({ "name": "Blank", "email": "b@example.com", "password": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid password: must not be empty");
}

#[tokio::test]
async fn test_login_does_not_leak_user_existence() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app
        .post(
            "/api/login",
            json!({ "email": "alice@example.com", "password": "secret" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Alice", "email": "alice@example.com" }));
    assert!(body.get("password_hash").is_none());

    let (wrong_status, wrong_body) = app
        .post(
            "/api/login",
            json!({ "email": "alice@example.com", "password": "nope" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post(
            "/api/login",
            json!({ "email": "ghost@example.com", "password": "secret" }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body, json!({ "error": "Invalid email or password" }));
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_generate_validates_amount() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;

    for amount in [json!(0), json!(-5), json!("abc"), json!(null), json!({})] {
        let (status, body) = app.generate(amount.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
        assert_eq!(body["error"], "Invalid amount");
    }

    let (_, list) = app.get("/api/bitslows").await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_generate_mints_with_single_history_entry() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app.generate(json!(50)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);

    let coin = &body["bitslow"];
    let id = coin["id"].as_i64().unwrap();
    let parts: Vec<i64> = coin["componentNumbers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|p| (0..100).contains(p)));
    assert_eq!(coin["monetaryValue"], 50.0);
    assert_eq!(coin["hash"], compute_hash(parts[0], parts[1], parts[2]));

    let (status, history) = app.get(&format!("/api/bitslows/{id}/history")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["bitslowId"], id);
    assert_eq!(history[0]["previousOwner"], Value::Null);
    assert_eq!(history[0]["newOwner"], "Alice");
}

#[tokio::test]
async fn test_generate_accepts_numeric_string() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app.generate(json!("12.5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bitslow"]["monetaryValue"], 12.5);
}

#[tokio::test]
async fn test_each_buy_appends_one_transfer_from_prior_buyer() {
    let app = TestApp::new().await;
    let alice = app.register("Alice", "alice@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;

    let (_, minted) = app.generate(json!(20)).await;
    let id = minted["bitslow"]["id"].as_i64().unwrap();
    let history_uri = format!("/api/bitslows/{id}/history");
    let buy_uri = format!("/api/bitslows/{id}/buy");

    let (status, body) = app.post_as(&buy_uri, None, bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, history) = app.get(&history_uri).await;
    let history = history.as_array().unwrap().clone();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["previousOwner"], "Alice");
    assert_eq!(history[0]["newOwner"], "Bob");

    // No header: the default buyer (client 1) acts
    let (status, _) = app
        .request(Method::POST, &buy_uri, None, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = app.get(&history_uri).await;
    let history = history.as_array().unwrap().clone();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["previousOwner"], "Bob");
    assert_eq!(history[0]["newOwner"], "Alice");
    assert_eq!(history[2]["previousOwner"], Value::Null);

    let pool = app.db.inner();
    assert_eq!(
        TransactionRepository::current_owner(pool, id).await.unwrap(),
        Some(alice)
    );
}

#[tokio::test]
async fn test_concurrent_buys_both_succeed() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;
    let carol = app.register("Carol", "carol@example.com").await;

    let (_, minted) = app.generate(json!(5)).await;
    let id = minted["bitslow"]["id"].as_i64().unwrap();
    let uri = format!("/api/bitslows/{id}/buy");

    let (first, second) = tokio::join!(
        app.post_as(&uri, None, bob),
        app.post_as(&uri, None, carol)
    );
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);

    let (_, history) = app.get(&format!("/api/bitslows/{id}/history")).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 3);

    // Whichever order the requests land in, neither is rejected and each
    // sale names a seller who owned the coin at some point
    let mut buyers: Vec<&str> = history[..2]
        .iter()
        .map(|h| h["newOwner"].as_str().unwrap())
        .collect();
    buyers.sort();
    assert_eq!(buyers, vec!["Bob", "Carol"]);
    for entry in &history[..2] {
        let seller = entry["previousOwner"].as_str().unwrap();
        assert!(["Alice", "Bob", "Carol"].contains(&seller), "{seller}");
        assert_ne!(Some(seller), entry["newOwner"].as_str());
    }
}

#[tokio::test]
async fn test_buy_errors() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app.post_as("/api/bitslows/999/buy", None, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "BitSlow not found" }));

    let (status, body) = app.post_as("/api/bitslows/abc/buy", None, 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid BitSlow ID");

    let (_, minted) = app.generate(json!(5)).await;
    let id = minted["bitslow"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post_as(&format!("/api/bitslows/{id}/buy"), None, 77)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown client: 77");

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/bitslows/{id}/buy"),
            None,
            Some("not-a-number"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");
}

#[tokio::test]
async fn test_profile_totals_match_holdings() {
    let app = TestApp::new().await;
    let alice = app.register("Alice", "alice@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;

    let mut ids = Vec::new();
    for amount in [10.0, 25.5, 4.5] {
        let (_, minted) = app.generate(json!(amount)).await;
        ids.push(minted["bitslow"]["id"].as_i64().unwrap());
    }
    app.post_as(&format!("/api/bitslows/{}/buy", ids[1]), None, bob)
        .await;

    let (status, profile) = app.get(&format!("/api/profile/{alice}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["totalTransactions"], 4);
    assert_eq!(profile["totalBitSlows"], 2);
    assert_eq!(profile["totalValue"], 14.5);

    let holdings = profile["holdings"].as_array().unwrap();
    let sum: f64 = holdings.iter().map(|h| h["value"].as_f64().unwrap()).sum();
    assert_eq!(sum, 14.5);
    let held: Vec<i64> = holdings.iter().map(|h| h["coin_id"].as_i64().unwrap()).collect();
    assert_eq!(held, vec![ids[0], ids[2]]);
    for h in holdings {
        let hash = compute_hash(
            h["bit1"].as_i64().unwrap(),
            h["bit2"].as_i64().unwrap(),
            h["bit3"].as_i64().unwrap(),
        );
        assert_eq!(h["computedBitSlow"], hash);
    }

    let (_, profile) = app.get(&format!("/api/profile/{bob}")).await;
    assert_eq!(profile["totalTransactions"], 1);
    assert_eq!(profile["totalBitSlows"], 1);
    assert_eq!(profile["totalValue"], 25.5);

    let (status, body) = app.get("/api/profile/nobody").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");

    let (status, empty) = app.get("/api/profile/404").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["totalBitSlows"], 0);
    assert_eq!(empty["totalValue"], 0.0);
}

#[tokio::test]
async fn test_listing_pages_in_insertion_order() {
    let app = TestApp::new().await;
    let owner = app.register("Alice", "alice@example.com").await;
    let pool = app.db.inner();

    for i in 0..65u8 {
        let coin_id = CoinRepository::insert(pool, Components::new(i, 0, 99 - i), 1.0)
            .await
            .unwrap();
        TransactionRepository::insert(
            pool,
            &NewTransaction {
                coin_id,
                seller_id: None,
                buyer_id: owner,
                amount: 1.0,
            },
        )
        .await
        .unwrap();
    }

    let (status, body) = app.get("/api/bitslows?page=2&limit=30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 65);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 30);

    let items = body["bitslows"].as_array().unwrap();
    let ids: Vec<i64> = items.iter().map(|c| c["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, (31..=60).collect::<Vec<i64>>());

    let first = &items[0];
    assert_eq!(first["bit1"], 30);
    assert_eq!(first["componentNumbers"], json!([30, 0, 69]));
    assert_eq!(first["currentOwner"], "Alice");
    assert_eq!(first["monetaryValue"], 1.0);
    assert_eq!(first["hash"], compute_hash(30, 0, 69));

    let (_, defaults) = app.get("/api/bitslows").await;
    assert_eq!(defaults["page"], 1);
    assert_eq!(defaults["limit"], 30);
    assert_eq!(defaults["bitslows"].as_array().unwrap().len(), 30);

    let (status, body) = app.get("/api/bitslows?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid page: must be a positive integer");
}

#[tokio::test]
async fn test_transactions_listing_and_filters() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;

    let (_, first) = app.generate(json!(100)).await;
    app.generate(json!(3)).await;
    let id = first["bitslow"]["id"].as_i64().unwrap();
    app.post_as(&format!("/api/bitslows/{id}/buy"), None, bob)
        .await;

    let (status, all) = app.get("/api/transactions").await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["buyer_name"], "Bob");
    assert_eq!(all[0]["seller_name"], "Alice");
    assert_eq!(all[0]["coin_id"], id);
    assert_eq!(all[0]["amount"], 100.0);
    assert_eq!(all[2]["seller_id"], Value::Null);
    for tx in all {
        let hash = compute_hash(
            tx["bit1"].as_i64().unwrap(),
            tx["bit2"].as_i64().unwrap(),
            tx["bit3"].as_i64().unwrap(),
        );
        assert_eq!(tx["computedBitSlow"], hash);
    }

    let (_, by_buyer) = app.get("/api/transactions?buyerName=ali").await;
    assert_eq!(by_buyer.as_array().unwrap().len(), 2);

    let (_, by_value) = app.get("/api/transactions?minValue=50&sellerName=").await;
    assert_eq!(by_value.as_array().unwrap().len(), 2);

    let (_, future) = app.get("/api/transactions?startDate=2999-01-01").await;
    assert!(future.as_array().unwrap().is_empty());

    let (status, body) = app.get("/api/transactions?endDate=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid endDate"));
}

#[tokio::test]
async fn test_duplicate_components_share_hash() {
    let app = TestApp::new().await;
    let owner = app.register("Alice", "alice@example.com").await;
    let pool = app.db.inner();

    // The schema does not stop two coins from sharing a triple
    for _ in 0..2 {
        let coin_id = CoinRepository::insert(pool, Components::new(3, 7, 42), 1.0)
            .await
            .unwrap();
        TransactionRepository::insert(
            pool,
            &NewTransaction {
                coin_id,
                seller_id: None,
                buyer_id: owner,
                amount: 1.0,
            },
        )
        .await
        .unwrap();
    }

    let (_, body) = app.get("/api/bitslows").await;
    let items = body["bitslows"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["hash"], "aff1dc34b2c9339fb327f2f02c1e0871");
    assert_eq!(items[0]["hash"], items[1]["hash"]);
}

#[tokio::test]
async fn test_debug_users_hides_password_hash() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com").await;
    app.register("Bob", "bob@example.com").await;

    let (status, users) = app.get("/api/debug/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        users,
        json!([
            { "id": 1, "name": "Alice", "email": "alice@example.com" },
            { "id": 2, "name": "Bob", "email": "bob@example.com" }
        ])
    );
    assert_eq!(ClientRepository::count(app.db.inner()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_debug_users_not_routed_by_default() {
    let db = Arc::new(DatabasePool::in_memory().await.unwrap());
    let config = ApiConfig::default();
    let router = build_router(AppState::new(db, ClientId(1)), &config);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/debug/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_and_health() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".into()));
}

#[tokio::test]
async fn test_wrong_method_gets_json_not_found() {
    let app = TestApp::new().await;

    for (method, uri) in [
        (Method::GET, "/api/register"),
        (Method::GET, "/api/bitslows/1/buy"),
        (Method::DELETE, "/api/bitslows"),
    ] {
        let (status, body) = app.request(method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, json!({ "error": "Not Found" }), "{method} {uri}");
    }
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/bitslows")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight_answered() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/bitslows/generate")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type,x-user-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
}
