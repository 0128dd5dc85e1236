//! Router tests for Lendhub API
//!
//! Drive the full axum router over the in-memory store, no server needed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use lendhub_server::{
    api,
    config::{AppConfig, BootstrapAdmin, StorageBackend},
    repository::Repository,
    AppState,
};

const ADMIN_EMAIL: &str = "admin@lendhub.test";
const ADMIN_PASSWORD: &str = "admin-pw";

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.auth.jwt_secret = "router-test-secret".to_string();
        config.auth.bootstrap_admin = Some(BootstrapAdmin {
            email: ADMIN_EMAIL.to_string(),
            username: "admin".to_string(),
            password: ADMIN_PASSWORD.to_string(),
        });

        let state = AppState::new(config, Repository::in_memory());
        state.services.users.ensure_bootstrap_admin().await.unwrap();
        Self {
            router: api::create_router(state),
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{}", uri));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/users/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    async fn signup(&self, email: &str, role: &str) -> (StatusCode, Value) {
        let username = email.split('@').next().unwrap();
        self.request(
            Method::POST,
            "/users",
            None,
            Some(json!({
                "firstName": "Test",
                "lastName": "User",
                "age": "30",
                "gender": "other",
                "contactNumber": "555-0199",
                "email": email,
                "username": format!("{}-user", username),
                "password": "password",
                "address": "1 Test Street",
                "type": role
            })),
        )
        .await
    }

    /// Sign up an approved viewer and return its id and token
    async fn viewer(&self, email: &str) -> (String, String) {
        let (status, body) = self.signup(email, "viewer").await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();
        (id, self.login(email, "password").await)
    }

    async fn create_item(&self, token: &str, name: &str, qty: i64) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/items",
                Some(token),
                Some(json!({ "name": name, "qtyTotal": qty })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create item failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_inquiry(&self, token: &str, item_id: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/inquiries",
            Some(token),
            Some(json!({ "itemId": item_id, "userMessage": "Is this available?" })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.request(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_editor_signup_waits_for_approval() {
    let app = TestApp::new().await;

    let (status, body) = app.signup("editor@lendhub.test", "editor").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["approvalStatus"], "pending");
    assert_eq!(body["type"], "editor");
    assert!(body.get("passwordHash").is_none());
    assert_eq!(
        body["message"],
        "Account created successfully. Please wait for admin approval."
    );
    let editor_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "editor@lendhub.test", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("pending approval"));

    let admin = app.admin_token().await;
    let (status, body) = app
        .request(Method::GET, "/users/pending", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/users/{}/approve", editor_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["approvalStatus"], "approved");

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/users/{}/reject", editor_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token = app.login("editor@lendhub.test", "password").await;
    let (status, body) = app.request(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "editor@lendhub.test");
}

#[tokio::test]
async fn test_viewer_signup_and_login() {
    let app = TestApp::new().await;

    let (status, body) = app.signup("viewer@lendhub.test", "viewer").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["approvalStatus"], "approved");
    assert_eq!(body["message"], "Account created successfully.");

    let (status, body) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "viewer@lendhub.test", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["type"], "viewer");
    assert!(body["token"].as_str().is_some());

    let (status, _) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "viewer@lendhub.test", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.signup("viewer@lendhub.test", "viewer").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_missing_or_bad_token() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2);

    let (status, _) = app
        .request(Method::GET, "/users/me", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_item_quantity_guard() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/items",
            Some(&viewer),
            Some(json!({ "name": "Camera" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::POST,
            "/items",
            Some(&admin),
            Some(json!({ "name": "Camera", "qtyTotal": "3", "qtyAvailable": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "qtyAvailable cannot exceed qtyTotal");

    let item_id = app.create_item(&admin, "Camera", 3).await;
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/items/{}", item_id),
            Some(&admin),
            Some(json!({ "name": "Renamed", "qtyTotal": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.request(Method::GET, "/items", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Camera");
    assert_eq!(body["items"][0]["qtyTotal"], 3);
    assert_eq!(body["items"][0]["qtyAvailable"], 3);
    assert_eq!(body["sortBy"], "createdAt");
    assert_eq!(body["sortOrder"], "desc");

    let (status, body) = app
        .request(Method::DELETE, &format!("/items/{}", item_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted successfully");
    let (status, _) = app
        .request(Method::DELETE, &format!("/items/{}", item_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archived_items_require_staff() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;
    app.create_item(&admin, "Projector", 1).await;

    let (status, body) = app
        .request(Method::GET, "/items?inactive=true", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required to access archived items");

    let (status, _) = app
        .request(Method::GET, "/items?inactive=true", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request(Method::GET, "/items/archived", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(Method::GET, "/items/archived?inactive=true", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_inquiry_reply_is_one_shot() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;
    let item_id = app.create_item(&admin, "Camera", 2).await;

    let (status, body) = app.create_inquiry(&viewer, &item_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["inquiry"]["status"], "pending");
    assert_eq!(body["inquiry"]["itemName"], "Camera");
    let inquiry_id = body["inquiry"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.create_inquiry(&viewer, &item_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "You already have a pending inquiry for this item"
    );

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/inquiries/{}/reply", inquiry_id),
            Some(&viewer),
            Some(json!({ "adminReply": "ok", "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/inquiries/{}/reply", inquiry_id),
            Some(&admin),
            Some(json!({ "adminReply": "ok", "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inquiry"]["status"], "approved");
    assert_eq!(body["inquiry"]["isReadByAdmin"], true);
    assert!(body["inquiry"]["repliedAt"].is_string());
    assert_eq!(body["inquiry"]["replier"]["firstName"], "System");

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/inquiries/{}/reply", inquiry_id),
            Some(&admin),
            Some(json!({ "adminReply": "changed", "status": "rejected" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already been replied to"));

    let (status, body) = app
        .request(Method::GET, "/inquiries/user", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inquiries"][0]["adminReply"], "ok");
    assert_eq!(body["inquiries"][0]["status"], "approved");
}

#[tokio::test]
async fn test_inquiry_for_missing_item() {
    let app = TestApp::new().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;

    let (status, body) = app
        .create_inquiry(&viewer, "6f1c2d4e-0000-4000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    let (status, body) = app
        .request(Method::GET, "/inquiries/user", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 0);
}

#[tokio::test]
async fn test_mark_read_by_non_owner() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, owner) = app.viewer("owner@lendhub.test").await;
    let (_, stranger) = app.viewer("stranger@lendhub.test").await;
    let item_id = app.create_item(&admin, "Tripod", 1).await;

    let (_, body) = app.create_inquiry(&owner, &item_id).await;
    let inquiry_id = body["inquiry"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/inquiries/{}/read", inquiry_id),
            Some(&stranger),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/inquiries/{}/read", inquiry_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inquiry"]["isRead"], true);

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/inquiries/{}/read-admin", inquiry_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inquiry"]["isReadByAdmin"], true);

    let (status, body) = app
        .request(Method::GET, "/inquiries/stats", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total"], 1);
    assert_eq!(body["stats"]["unreadByAdmin"], 0);
    assert_eq!(body["stats"]["byStatus"][0]["status"], "pending");
}

#[tokio::test]
async fn test_inquiry_pagination() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;

    for name in ["Camera", "Tripod", "Microphone"] {
        let item_id = app.create_item(&admin, name, 1).await;
        let (status, _) = app.create_inquiry(&viewer, &item_id).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .request(Method::GET, "/inquiries/all?page=2&limit=2", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inquiries"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["hasNextPage"], false);
    assert_eq!(body["hasPrevPage"], true);

    let (status, _) = app
        .request(Method::GET, "/inquiries/all", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_huge_page_is_rejected() {
    let app = TestApp::new().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;
    let huge = format!("page={}", i64::MAX);

    let (status, body) = app
        .request(Method::GET, &format!("/inquiries/user?{}", huge), Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, body) = app
        .request(Method::GET, &format!("/items?{}&limit=100", huge), None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, body) = app
        .request(Method::GET, "/items?page=1000000", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_input_is_reported_as_json() {
    let app = TestApp::new().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/inquiries")
        .header(header::AUTHORIZATION, format!("Bearer {}", viewer))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, body) = app
        .request(Method::GET, "/inquiries/user?page=0", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, body) = app
        .request(Method::PATCH, "/inquiries/not-a-uuid/read", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, _) = app
        .request(Method::GET, "/items?sortBy=password", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request(Method::POST, "/inquiries", Some(&viewer), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item ID and message are required");
}

#[tokio::test]
async fn test_wishlist() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, viewer) = app.viewer("viewer@lendhub.test").await;
    let item_id = app.create_item(&admin, "Lens", 1).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/items/wishlist/add",
            Some(&viewer),
            Some(json!({ "itemId": item_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wishlist"][0], item_id.as_str());

    let (status, _) = app
        .request(
            Method::POST,
            "/items/wishlist/add",
            Some(&viewer),
            Some(json!({ "itemId": item_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .request(Method::GET, "/items/wishlist", Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Lens");
    assert_eq!(body["total"], 1);

    let (status, body) = app
        .request(
            Method::POST,
            "/items/wishlist/remove",
            Some(&viewer),
            Some(json!({ "itemId": item_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["wishlist"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_user_is_self_or_staff() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (viewer_id, viewer) = app.viewer("viewer@lendhub.test").await;
    let (other_id, _) = app.viewer("other@lendhub.test").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/users/{}", viewer_id),
            Some(&viewer),
            Some(json!({ "firstName": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Renamed");

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/users/{}", other_id),
            Some(&viewer),
            Some(json!({ "firstName": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/users/{}", other_id),
            Some(&admin),
            Some(json!({ "isActive": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], false);

    let (status, body) = app
        .request(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": "other@lendhub.test", "password": "password" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Your account is inactive. Please contact support."
    );
}
