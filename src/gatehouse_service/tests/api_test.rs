//! End-to-end tests driving the assembled service over HTTP.

use axum::{Router, middleware, routing::get};
use chrono::{Duration, Utc};
use gatehouse_adapters::{
    InMemoryUserStore, JwtTokenService, MockNotifier, Settings,
    config::{AllowedOrigins, AppSettings, AuthSettings, EmailSettings},
    email::Delivery,
};
use gatehouse_axum::{
    AppState, MaybeUser,
    middleware::{optional_auth, require_auth, require_role},
};
use gatehouse_core::{Email, NewUser, Password, Role, UserId};
use gatehouse_service::GatehouseService;
use secrecy::Secret;
use serde_json::{Value, json};

const COOKIE_NAME: &str = "gatehouse_session";
const JWT_SECRET: &str = "e2e-signing-secret";
const PUBLIC_URL: &str = "http://gatehouse.test";

struct TestApp {
    address: String,
    client: reqwest::Client,
    notifier: MockNotifier,
    tokens: JwtTokenService,
}

fn test_settings(reset_window_minutes: i64) -> Settings {
    Settings {
        app: AppSettings {
            address: "127.0.0.1:0".to_string(),
            public_url: PUBLIC_URL.to_string(),
            allowed_origins: AllowedOrigins::default(),
        },
        auth: AuthSettings {
            jwt: gatehouse_adapters::JwtConfig {
                cookie_name: COOKIE_NAME.to_string(),
                secret: Secret::from(JWT_SECRET.to_string()),
                ttl_seconds: 3600,
            },
            reset_window_minutes,
        },
        email: EmailSettings {
            base_url: "http://postmark.test".to_string(),
            sender: "noreply@gatehouse.test".to_string(),
            auth_token: Secret::from("server-token".to_string()),
            timeout_millis: 1000,
        },
    }
}

async fn spawn_app_with(settings: Settings) -> TestApp {
    let notifier = MockNotifier::new();
    let tokens = JwtTokenService::new(settings.auth.jwt.clone());

    let state = AppState::new(InMemoryUserStore::new(), notifier.clone(), settings);
    let service = GatehouseService::new(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(service.run(listener, None));

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address,
        client,
        notifier,
        tokens,
    }
}

async fn spawn_app() -> TestApp {
    spawn_app_with(test_settings(10)).await
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/users{path}", self.address)
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/signup"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "passwordConfirm": password,
            }))
            .send()
            .await
            .unwrap()
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// The reset secret mailed by the most recent forgot-password request.
    fn last_mailed_secret(&self) -> String {
        let deliveries = self.notifier.deliveries();
        let Some(Delivery::PasswordReset { reset_url, .. }) = deliveries
            .iter()
            .rev()
            .find(|d| matches!(d, Delivery::PasswordReset { .. }))
        else {
            panic!("no reset delivery recorded");
        };
        reset_url.rsplit('/').next().unwrap().to_string()
    }
}

#[tokio::test]
async fn signup_issues_a_session_and_sends_one_welcome() {
    let app = spawn_app().await;

    let response = app.signup("Leah", "leah@example.com", "secret123").await;
    assert_eq!(response.status(), 201);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{COOKIE_NAME}=")));
    assert!(set_cookie.contains("HttpOnly"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert!(body["token"].is_string());
    assert_eq!(body["data"]["user"]["email"], "leah@example.com");
    assert_eq!(body["data"]["user"]["role"], "member");
    assert!(body["data"]["user"].get("password").is_none());

    let deliveries = app.notifier.deliveries();
    assert_eq!(
        deliveries,
        vec![Delivery::Welcome {
            email: "leah@example.com".to_string(),
            context_url: format!("{PUBLIC_URL}/me"),
        }]
    );

    // The cookie set at signup authenticates follow-up requests.
    let me = app.client.get(app.url("/me")).send().await.unwrap();
    assert_eq!(me.status(), 200);
}

#[tokio::test]
async fn signup_rejects_mismatched_confirmation() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/signup"))
        .json(&json!({
            "name": "Leah",
            "email": "leah@example.com",
            "password": "secret123",
            "passwordConfirm": "secret124",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(app.notifier.deliveries().is_empty());
}

#[tokio::test]
async fn signup_rejects_a_blank_name() {
    let app = spawn_app().await;

    let response = app.signup("", "leah@example.com", "secret123").await;
    assert_eq!(response.status(), 400);

    // No account was created and nothing was mailed.
    assert_eq!(app.login("leah@example.com", "secret123").await.status(), 401);
    assert!(app.notifier.deliveries().is_empty());
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let app = spawn_app().await;

    app.signup("Leah", "leah@example.com", "secret123").await;
    let response = app.signup("Other", "leah@example.com", "secret456").await;

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn login_does_not_reveal_which_credential_was_wrong() {
    let app = spawn_app().await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    let wrong_password = app.login("leah@example.com", "wrong-password").await;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password: Value = wrong_password.json().await.unwrap();

    let unknown_email = app.login("nobody@example.com", "secret123").await;
    assert_eq!(unknown_email.status(), 401);
    let unknown_email: Value = unknown_email.json().await.unwrap();

    assert_eq!(wrong_password["error"], unknown_email["error"]);
}

#[tokio::test]
async fn bearer_token_from_login_authenticates_requests() {
    let app = spawn_app().await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    let login: Value = app
        .login("leah@example.com", "secret123")
        .await
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().unwrap();

    // A clean client without the cookie store, header only.
    let response = reqwest::Client::new()
        .get(app.url("/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user"]["name"], "Leah");
}

#[tokio::test]
async fn gated_routes_reject_anonymous_callers() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(app.url("/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = spawn_app().await;
    let signup: Value = app
        .signup("Leah", "leah@example.com", "secret123")
        .await
        .json()
        .await
        .unwrap();
    let user_id = UserId::parse(signup["data"]["user"]["id"].as_str().unwrap()).unwrap();

    // ttl is 3600s, so a token minted two hours ago is past its expiry.
    let stale = app
        .tokens
        .issue_at(user_id, Utc::now() - Duration::hours(2))
        .unwrap();

    let response = reqwest::Client::new()
        .get(app.url("/me"))
        .bearer_auth(stale)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn password_change_invalidates_earlier_sessions() {
    let app = spawn_app().await;
    let signup: Value = app
        .signup("Leah", "leah@example.com", "secret123")
        .await
        .json()
        .await
        .unwrap();
    let user_id = UserId::parse(signup["data"]["user"]["id"].as_str().unwrap()).unwrap();

    // Minted well before the change so the rotation check is unambiguous.
    let old_token = app
        .tokens
        .issue_at(user_id, Utc::now() - Duration::minutes(2))
        .unwrap();

    let client = reqwest::Client::new();
    let change = client
        .patch(app.url("/update-password"))
        .bearer_auth(&old_token)
        .json(&json!({
            "passwordCurrent": "secret123",
            "password": "new-secret-1",
            "passwordConfirm": "new-secret-1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(change.status(), 200);
    let change: Value = change.json().await.unwrap();
    let fresh_token = change["token"].as_str().unwrap();

    let with_old = client
        .get(app.url("/me"))
        .bearer_auth(&old_token)
        .send()
        .await
        .unwrap();
    assert_eq!(with_old.status(), 401);

    let with_fresh = client
        .get(app.url("/me"))
        .bearer_auth(fresh_token)
        .send()
        .await
        .unwrap();
    assert_eq!(with_fresh.status(), 200);

    let relogin = app.login("leah@example.com", "new-secret-1").await;
    assert_eq!(relogin.status(), 200);
    assert_eq!(app.login("leah@example.com", "secret123").await.status(), 401);
}

#[tokio::test]
async fn update_password_requires_the_current_password() {
    let app = spawn_app().await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    let response = app
        .client
        .patch(app.url("/update-password"))
        .json(&json!({
            "passwordCurrent": "not-the-password",
            "password": "new-secret-1",
            "passwordConfirm": "new-secret-1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    assert_eq!(app.login("leah@example.com", "secret123").await.status(), 200);
}

#[tokio::test]
async fn forgot_password_reports_unknown_emails() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/forgot-password"))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn mailed_secret_resets_the_password_exactly_once() {
    let app = spawn_app().await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    let response = app
        .client
        .post(app.url("/forgot-password"))
        .json(&json!({ "email": "leah@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let secret = app.last_mailed_secret();
    let reset_body = json!({
        "password": "new-secret-1",
        "passwordConfirm": "new-secret-1",
    });

    let reset = app
        .client
        .patch(app.url(&format!("/reset-password/{secret}")))
        .json(&reset_body)
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), 200);
    let reset: Value = reset.json().await.unwrap();
    assert!(reset["token"].is_string());

    assert_eq!(app.login("leah@example.com", "new-secret-1").await.status(), 200);
    assert_eq!(app.login("leah@example.com", "secret123").await.status(), 401);

    // Consumed on first use.
    let replay = app
        .client
        .patch(app.url(&format!("/reset-password/{secret}")))
        .json(&reset_body)
        .send()
        .await
        .unwrap();
    assert_eq!(replay.status(), 400);
}

#[tokio::test]
async fn reset_secret_expires_with_the_configured_window() {
    let app = spawn_app_with(test_settings(0)).await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    app.client
        .post(app.url("/forgot-password"))
        .json(&json!({ "email": "leah@example.com" }))
        .send()
        .await
        .unwrap();

    let secret = app.last_mailed_secret();
    let response = app
        .client
        .patch(app.url(&format!("/reset-password/{secret}")))
        .json(&json!({
            "password": "new-secret-1",
            "passwordConfirm": "new-secret-1",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn a_second_reset_request_supersedes_the_first() {
    let app = spawn_app().await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    for _ in 0..2 {
        app.client
            .post(app.url("/forgot-password"))
            .json(&json!({ "email": "leah@example.com" }))
            .send()
            .await
            .unwrap();
    }

    let deliveries = app.notifier.deliveries();
    let secrets: Vec<String> = deliveries
        .iter()
        .filter_map(|d| match d {
            Delivery::PasswordReset { reset_url, .. } => {
                Some(reset_url.rsplit('/').next().unwrap().to_string())
            }
            _ => None,
        })
        .collect();
    assert_eq!(secrets.len(), 2);
    assert_ne!(secrets[0], secrets[1]);

    let reset_body = json!({
        "password": "new-secret-1",
        "passwordConfirm": "new-secret-1",
    });

    let with_first = app
        .client
        .patch(app.url(&format!("/reset-password/{}", secrets[0])))
        .json(&reset_body)
        .send()
        .await
        .unwrap();
    assert_eq!(with_first.status(), 400);

    let with_second = app
        .client
        .patch(app.url(&format!("/reset-password/{}", secrets[1])))
        .json(&reset_body)
        .send()
        .await
        .unwrap();
    assert_eq!(with_second.status(), 200);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let app = spawn_app().await;
    app.signup("Leah", "leah@example.com", "secret123").await;

    assert_eq!(app.client.get(app.url("/me")).send().await.unwrap().status(), 200);

    let logout = app.client.get(app.url("/logout")).send().await.unwrap();
    assert_eq!(logout.status(), 200);

    // The removal cookie evicted the session from the jar.
    assert_eq!(app.client.get(app.url("/me")).send().await.unwrap().status(), 401);
}

#[tokio::test]
async fn optional_auth_tells_members_and_visitors_apart_without_rejecting() {
    let settings = test_settings(10);
    let tokens = JwtTokenService::new(settings.auth.jwt.clone());
    let store = InMemoryUserStore::new();
    let state = AppState::new(store.clone(), MockNotifier::new(), settings);

    async fn greet(user: MaybeUser) -> String {
        match user.0 {
            Some(user) => format!("hello {}", user.name()),
            None => "hello stranger".to_string(),
        }
    }

    let router = Router::new()
        .route("/greet", get(greet))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/greet", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await });

    let user = store
        .insert_user_with_role(
            NewUser::new(
                "Leah".to_string(),
                Email::parse("leah@example.com").unwrap(),
                Password::try_from(Secret::from("secret123".to_string())).unwrap(),
            ),
            Role::Member,
        )
        .await
        .unwrap();

    let client = reqwest::Client::new();

    let anonymous = client.get(&url).send().await.unwrap();
    assert_eq!(anonymous.text().await.unwrap(), "hello stranger");

    let token = tokens.issue_at(user.id(), Utc::now()).unwrap();
    let known = client.get(&url).bearer_auth(token).send().await.unwrap();
    assert_eq!(known.text().await.unwrap(), "hello Leah");

    // A bad credential downgrades to anonymous instead of failing.
    let forged = client
        .get(&url)
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), 200);
    assert_eq!(forged.text().await.unwrap(), "hello stranger");
}

#[tokio::test]
async fn role_gate_admits_only_listed_roles() {
    let settings = test_settings(10);
    let tokens = JwtTokenService::new(settings.auth.jwt.clone());
    let store = InMemoryUserStore::new();
    let state = AppState::new(store.clone(), MockNotifier::new(), settings);

    let router = Router::new()
        .route("/admin-only", get(|| async { "ok" }))
        .route_layer(middleware::from_fn(require_role(&[Role::Admin])))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await });

    let member = store
        .insert_user_with_role(
            NewUser::new(
                "Member".to_string(),
                Email::parse("member@example.com").unwrap(),
                Password::try_from(Secret::from("secret123".to_string())).unwrap(),
            ),
            Role::Member,
        )
        .await
        .unwrap();
    let admin = store
        .insert_user_with_role(
            NewUser::new(
                "Admin".to_string(),
                Email::parse("admin@example.com").unwrap(),
                Password::try_from(Secret::from("secret123".to_string())).unwrap(),
            ),
            Role::Admin,
        )
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let url = format!("{address}/admin-only");

    let anonymous = client.get(&url).send().await.unwrap();
    assert_eq!(anonymous.status(), 401);

    let member_token = tokens.issue_at(member.id(), Utc::now()).unwrap();
    let as_member = client
        .get(&url)
        .bearer_auth(member_token)
        .send()
        .await
        .unwrap();
    assert_eq!(as_member.status(), 403);

    let admin_token = tokens.issue_at(admin.id(), Utc::now()).unwrap();
    let as_admin = client
        .get(&url)
        .bearer_auth(admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(as_admin.status(), 200);
}
