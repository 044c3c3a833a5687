use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use roleplay::config::{Config, SmtpConfig};
use roleplay::email::trap::MailTrap;
use roleplay::email::{Mail, Mailer};
use roleplay::store::memory::MemStore;

/// A running test server backed by the in-memory store and a mail trap.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemStore>,
    pub mailer: Arc<MailTrap>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Create a user and return the response body. Panics on non-201.
    pub async fn create_user(&self, email: &str, username: &str, password: &str) -> Value {
        let (body, status) = self
            .post(
                "/users",
                &json!({
                    "email": email,
                    "username": username,
                    "password": password,
                    "avatar": "https://images.roleplay.com/avatar/1",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
        body
    }

    /// Login via POST /sessions, returning body + status.
    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        self.post("/sessions", &json!({ "email": email, "password": password }))
            .await
    }

    /// Request a password reset for `email` and pull the issued token out
    /// of the trapped mail's link.
    pub async fn request_reset_token(&self, email: &str) -> String {
        let (body, status) = self
            .post(
                "/forgot-password",
                &json!({
                    "email": email,
                    "resetPasswordUrl": "https://roleplay.com/reset",
                }),
            )
            .await;
        assert_eq!(
            status,
            StatusCode::NO_CONTENT,
            "forgot-password failed: {body}"
        );

        let mail = self.mailer.sent().pop().expect("no reset mail captured");
        extract_token(&mail.html)
    }
}

pub fn extract_token(html: &str) -> String {
    let (_, rest) = html
        .split_once("?token=")
        .expect("reset link missing from mail");
    rest.chars().take_while(|c| c.is_ascii_hexdigit()).collect()
}

/// Spawn a test app on a random port.
pub async fn spawn_app() -> TestApp {
    let mailer = Arc::new(MailTrap::new());
    let (addr, client, store) = spawn_with(mailer.clone()).await;
    TestApp {
        addr,
        client,
        store,
        mailer,
    }
}

/// Spawn a test app whose mailer always fails to deliver.
pub async fn spawn_app_with_failing_mail() -> TestApp {
    let (addr, client, store) = spawn_with(Arc::new(FailingMailer)).await;
    TestApp {
        addr,
        client,
        store,
        mailer: Arc::new(MailTrap::new()),
    }
}

async fn spawn_with(mailer: Arc<dyn Mailer>) -> (SocketAddr, Client, Arc<MemStore>) {
    let store = Arc::new(MemStore::new());

    let config = Config {
        database_url: String::new(),
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        mail_from: "no-reply@roleplay.com".to_string(),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 587,
            user: String::new(),
            pass: String::new(),
        },
    };

    let app = roleplay::build_app(store.clone(), mailer, config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (addr, Client::new(), store)
}

/// Mailer that refuses every message, for exercising delivery-failure
/// handling.
struct FailingMailer;

#[async_trait::async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: Mail) -> Result<(), String> {
        Err("smtp connection refused".to_string())
    }
}
