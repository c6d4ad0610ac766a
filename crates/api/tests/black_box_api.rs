use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port. With no backend
        // env vars set this wires the in-memory store/host and the no-op
        // cache.
        let app = storefront_api::app::build_app().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn draft_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "price": 24.99,
        "category": "misc",
        "image": "data:image/png;base64,AAAA",
    })
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_then_list_roundtrip() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.base_url))
        .json(&draft_body("tote"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(created["name"], "tote");
    assert!(!created["image"].as_str().unwrap().is_empty());
    assert_eq!(created["isFeatured"], false);
    assert_eq!(created["stock"], 100);

    let listed: serde_json::Value = client
        .get(format!("{}/api/products", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let products = listed["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], created["id"]);
}

#[tokio::test]
async fn create_without_image_is_a_validation_error() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/products", server.base_url))
        .json(&json!({
            "name": "tote",
            "description": "bag",
            "price": 10.0,
            "category": "misc",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn toggle_featured_shows_up_in_featured_listing() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.base_url))
        .json(&draft_body("tote"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let toggled: serde_json::Value = client
        .patch(format!("{}/api/products/{id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["isFeatured"], true);

    let featured: serde_json::Value = client
        .get(format!("{}/api/products/featured", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let featured = featured.as_array().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["id"].as_str().unwrap(), id);
    // Lean projection only.
    assert!(featured[0].get("images").is_none());
}

#[tokio::test]
async fn update_and_delete_roundtrip() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/api/products", server.base_url))
        .json(&draft_body("tote"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let updated: serde_json::Value = client
        .put(format!("{}/api/products/{id}", server.base_url))
        .json(&json!({ "price": 12.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["price"], 12.5);
    assert_eq!(updated["name"], "tote");

    let deleted = client
        .delete(format!("{}/api/products/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let listed: serde_json::Value = client
        .get(format!("{}/api/products", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_reported() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let missing = client
        .delete(format!(
            "{}/api/products/00000000-0000-7000-8000-000000000000",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = client
        .delete(format!("{}/api/products/not-a-uuid", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}
