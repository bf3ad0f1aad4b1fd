use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenHandler;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub token_handler: TokenHandler,
}

impl TestApp {
    /// Spawn the application with the default one hour token lifetime
    pub async fn spawn() -> Self {
        Self::spawn_with_token_lifetime(chrono::Duration::seconds(
            TokenHandler::DEFAULT_LIFETIME_SECS,
        ))
        .await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with_token_lifetime(lifetime: chrono::Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());

        // Cheap hashing keeps the suite fast; the cost is embedded in each hash
        let authenticator = Arc::new(
            Authenticator::with_lifetime(TEST_SECRET, lifetime).with_password_hasher(
                PasswordHasher::with_cost(1024, 1, 1).expect("Failed to build password hasher"),
            ),
        );

        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_handler: TokenHandler::with_lifetime(TEST_SECRET, lifetime),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// POST a URL-encoded form body
    pub async fn post_form(&self, path: &str, body: &'static str) -> reqwest::Response {
        self.post(path)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a user and return the raw response
    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the raw response
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register then log in, returning the issued token
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;

        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }
}
