use async_trait::async_trait;
use crm_gateway::{
    AppConfig, AppState, create_router,
    models::{HealthResponse, LoginResponse, User},
    password,
    repository::{RepositoryState, UserRepository},
};
use reqwest::{StatusCode, header, redirect::Policy};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Two accounts: an administrator and a warehouse clerk, both with password "pw".
struct InMemoryUsers {
    users: Vec<User>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

async fn spawn_app() -> TestApp {
    let hash = password::hash_password("pw").unwrap();
    let users = InMemoryUsers {
        users: vec![
            User {
                id: Uuid::new_v4(),
                email: "admin@acme.example".to_string(),
                role_name: "admin".to_string(),
                password_hash: hash.clone(),
            },
            User {
                id: Uuid::new_v4(),
                email: "clerk@acme.example".to_string(),
                role_name: "warehouse".to_string(),
                password_hash: hash,
            },
        ],
    };

    let state = AppState::new(Arc::new(users) as RepositoryState, AppConfig::default());
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Redirects are part of what is under test, so never follow them.
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    TestApp { address, client }
}

impl TestApp {
    async fn login(&self, email: &str) -> String {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.address))
            .json(&serde_json::json!({ "email": email, "password": "pw" }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        let body: LoginResponse = response.json().await.unwrap();
        assert_eq!(body.user.email, email);

        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(format!("{}{}", self.address, path));
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.send().await.expect("request failed")
    }
}

fn location(response: &reqwest::Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;

    let response = app.get("/api/health", None).await;

    assert!(response.status().is_success());
    let body: HealthResponse = response.json().await.unwrap();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn test_browser_session_lifecycle() {
    let app = spawn_app().await;

    // Anonymous: sent to login, remembering where we were going.
    let response = app.get("/orders", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?from=%2Forders");

    // Logged in: dashboard is served, login page bounces to dashboard.
    let cookie = app.login("clerk@acme.example").await;
    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/login", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/dashboard");

    // Logout clears the cookie value.
    let response = app
        .client
        .post(format!("{}/api/auth/logout", app.address))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("session=;"));

    // The browser now sends the emptied cookie.
    let response = app.get("/dashboard", Some("session=")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_admin_panel_by_role() {
    let app = spawn_app().await;

    let clerk = app.login("clerk@acme.example").await;
    let response = app.get("/admin", Some(&clerk)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/dashboard");

    let admin = app.login("admin@acme.example").await;
    let response = app.get("/admin", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_without_session_gets_json_401() {
    let app = spawn_app().await;

    let response = app.get("/api/me", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Unauthorized" }));
}
