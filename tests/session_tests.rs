//! Login and logout tests
//!
//! Run with: cargo test --test session_tests

mod common;

use agora::auth::{validate_token, SessionClaims, SessionStore};
use common::{session_store, test_user, Outcome, TestServer, COOKIE_NAME, SESSION_SECRET};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn set_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let server = TestServer::start(Outcome::Value).await;

    let response = server
        .post_anonymous("/login", &[("username", "alice"), ("password", "pw")])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with(&format!("{}=", COOKIE_NAME)));
    assert!(cookie.contains("HttpOnly"));

    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["user"]["id"], "42");
    assert_eq!(body["user"]["displayName"], "Alice");

    let call = server.stub.last_call().unwrap();
    assert_eq!(call.operation, "login");
    assert_eq!(call.args, vec!["alice", "pw"]);
}

#[tokio::test]
async fn test_login_cookie_authenticates_next_call() {
    let server = TestServer::start(Outcome::Value).await;

    let response = server
        .post_anonymous("/login", &[("username", "alice"), ("password", "pw")])
        .await;
    let cookie = set_cookie(&response);
    let pair = cookie.split(';').next().unwrap().to_string();

    let response = server
        .client
        .post(server.url("/api/post/share"))
        .header(reqwest::header::COOKIE, pair)
        .form(&[("postId", "1001")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let call = server.stub.last_call().unwrap();
    assert_eq!(call.args, vec!["42", "1001"]);
    assert_eq!(call.token, "wp-token-42");
}

#[tokio::test]
async fn test_login_failure_passes_message_through() {
    let server =
        TestServer::start(Outcome::Fail("The password you entered is incorrect.".to_string()))
            .await;

    let response = server
        .post_anonymous("/login", &[("username", "alice"), ("password", "wrong")])
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(reqwest::header::SET_COOKIE).is_none());
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "The password you entered is incorrect." })
    );
}

#[tokio::test]
async fn test_login_empty_result() {
    let server = TestServer::start(Outcome::Empty).await;

    let response = server
        .post_anonymous("/login", &[("username", "alice"), ("password", "pw")])
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Unable to log in" })
    );
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let server = TestServer::start(Outcome::Value).await;

    let response = server.post_anonymous("/login", &[("username", "alice")]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "password is required" })
    );
    assert_eq!(server.stub.call_count(), 0);
}

#[tokio::test]
async fn test_logout_get_and_post_clear_cookie() {
    let server = TestServer::start(Outcome::Value).await;

    for request in [
        server.client.get(server.url("/logout")),
        server.client.post(server.url("/logout")),
    ] {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(reqwest::header::LOCATION).unwrap(),
            "/login"
        );
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with(&format!("{}=;", COOKIE_NAME)));
        assert!(cookie.contains("Max-Age=0"));
    }

    assert_eq!(server.stub.call_count(), 0);
}

#[test]
fn test_expired_session_is_no_session() {
    let store = session_store();
    let mut claims = SessionClaims::new(
        test_user("42"),
        "wp".to_string(),
        chrono::Duration::hours(1),
        None,
    );
    claims.exp = chrono::Utc::now().timestamp() - 3600;
    let token = store.sign(&claims).unwrap();

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        format!("{}={}", COOKIE_NAME, token).parse().unwrap(),
    );
    assert!(store.get_user_from_session(&headers).is_none());
}

#[test]
fn test_session_expired_seconds_ago_is_no_session() {
    let store = session_store();
    let mut claims = SessionClaims::new(
        test_user("42"),
        "wp".to_string(),
        chrono::Duration::hours(1),
        None,
    );
    claims.exp = chrono::Utc::now().timestamp() - 30;
    let token = store.sign(&claims).unwrap();

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        format!("{}={}", COOKIE_NAME, token).parse().unwrap(),
    );
    assert!(store.get_user_from_session(&headers).is_none());
}

#[test]
fn test_session_token_carries_identity() {
    let store = SessionStore::new(SESSION_SECRET, COOKIE_NAME);
    let claims = SessionClaims::new(
        test_user("42"),
        "wp".to_string(),
        chrono::Duration::hours(1),
        None,
    );
    let token = store.sign(&claims).unwrap();

    let decoded = validate_token(SESSION_SECRET.as_bytes(), &token).unwrap();
    assert_eq!(decoded.sub, "42");
    assert_eq!(decoded.user.email, "alice@example.com");
    assert_eq!(decoded.user.roles, vec!["subscriber".to_string()]);
}
