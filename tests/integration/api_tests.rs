//! API integration tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, config::AppConfig, models::auth::TokenClaims, AppState};

const SECRET: &str = "integration-secret";

fn app() -> Router {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some(SECRET.to_string());
    api::create_router(AppState::new(config).expect("Failed to build state"))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("Failed to build request")
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("Failed to send request")
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse response")
}

async fn get_auth_token(app: &Router) -> String {
    let response = send(
        app,
        request(
            Method::POST,
            "/auth/token",
            None,
            Some(json!({"username": "admin", "password": "password"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["token"].as_str().expect("No token in response").to_string()
}

fn with_authorization(method: Method, uri: &str, value: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn create_book(app: &Router, title: &str, author: &str, year: i32) -> Value {
    let response = send(
        app,
        request(
            Method::POST,
            "/books",
            None,
            Some(json!({"title": title, "author": author, "year": year})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_ping() {
    let app = app();
    let response = send(&app, request(Method::GET, "/ping", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));
}

#[tokio::test]
async fn test_echo_returns_body_verbatim() {
    let app = app();
    let raw = r#"{"a":1,"b":[true,null]}"#;
    let response = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_bytes(response).await, raw.as_bytes());
}

#[tokio::test]
async fn test_echo_rejects_invalid_json() {
    let app = app();
    for raw in ["{not json", ""] {
        let response = send(
            &app,
            Request::builder()
                .method(Method::POST)
                .uri("/echo")
                .body(Body::from(raw))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{raw:?}");
        assert!(body_json(response).await["message"].is_string());
    }
}

#[tokio::test]
async fn test_token_issue_and_failures() {
    let app = app();
    let token = get_auth_token(&app).await;
    assert_eq!(token.split('.').count(), 3);

    let response = send(
        &app,
        request(
            Method::POST,
            "/auth/token",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let response = send(
        &app,
        request(
            Method::POST,
            "/auth/token",
            None,
            Some(json!({"username": "nobody", "password": "password"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, wrong_password);

    let response = send(
        &app,
        request(Method::POST, "/auth/token", None, Some(json!({"username": "admin"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_me_requires_token() {
    let app = app();

    let response = send(&app, request(Method::GET, "/auth/me", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = get_auth_token(&app).await;
    let response = send(&app, request(Method::GET, "/auth/me", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["subject"], "admin");
}

#[tokio::test]
async fn test_auth_me_rejects_bad_credentials() {
    let app = app();

    let response = send(&app, request(Method::GET, "/auth/me", Some("garbage"), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    for header in ["Token abc", "Bearer", "Bearer a b", "   "] {
        let response = send(&app, with_authorization(Method::GET, "/auth/me", header)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header:?}");
        assert_eq!(body_json(response).await["code"], 2);
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = app();
    let token = TokenClaims::new("admin", Utc::now() - Duration::hours(2), Duration::hours(1))
        .create_token(SECRET)
        .expect("Failed to sign token");

    let response = send(&app, request(Method::GET, "/books", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request(Method::GET, "/auth/me", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tokens_with_foreign_algorithms_are_rejected() {
    let app = app();
    let claims = TokenClaims::new("admin", Utc::now(), Duration::hours(1));
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("Failed to encode claims"));

    for header in [
        r#"{"alg":"none","typ":"JWT"}"#,
        r#"{"alg":"RS256","typ":"JWT"}"#,
    ] {
        let unsigned = format!("{}.{}.", URL_SAFE_NO_PAD.encode(header), payload);
        let signed = format!("{}{}", unsigned, URL_SAFE_NO_PAD.encode("signature"));

        for token in [unsigned, signed] {
            let response = send(&app, request(Method::GET, "/books", Some(&token), None)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header}");
        }
    }
}

#[tokio::test]
async fn test_book_crud_flow() {
    let app = app();

    let created = create_book(&app, "Dune", "Frank Herbert", 1965).await;
    let id = created["id"].as_str().expect("No book ID").to_string();
    assert_eq!(created["title"], "Dune");

    let response = send(&app, request(Method::GET, &format!("/books/{}", id), None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let response = send(
        &app,
        request(
            Method::PUT,
            &format!("/books/{}", id),
            None,
            Some(json!({"title": "Dune Messiah", "author": "Frank Herbert", "year": 1969})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["year"], 1969);

    let response = send(&app, request(Method::DELETE, &format!("/books/{}", id), None, None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    let response = send(&app, request(Method::DELETE, &format!("/books/{}", id), None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, request(Method::GET, &format!("/books/{}", id), None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_book_is_not_found() {
    let app = app();
    create_book(&app, "Emma", "Jane Austen", 1815).await;

    let response = send(
        &app,
        request(
            Method::PUT,
            "/books/does-not-exist",
            None,
            Some(json!({"title": "X", "author": "Y", "year": 1})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, request(Method::GET, "/books", None, None)).await;
    let books = body_json(response).await;
    assert_eq!(books.as_array().map(Vec::len), Some(1));
    assert_eq!(books[0]["title"], "Emma");
}

#[tokio::test]
async fn test_invalid_book_payloads() {
    let app = app();
    for payload in [
        json!({"title": "No author", "year": 2000}),
        json!({"title": "", "author": "Someone", "year": 2000}),
        json!({"title": "Bad year", "author": "Someone", "year": "soon"}),
        json!({"author": "Someone", "year": 2000}),
        json!({"title": "Year zero", "author": "Someone", "year": 0}),
    ] {
        let response = send(&app, request(Method::POST, "/books", None, Some(payload.clone()))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
    }

    let response = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/books")
            .body(Body::from("not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, request(Method::GET, "/books", None, None)).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_search_and_pagination() {
    let app = app();
    for title in ["A", "B", "C", "D", "E"] {
        create_book(&app, title, "Anonymous", 2000).await;
    }
    create_book(&app, "Dune", "Frank Herbert", 1965).await;

    let response = send(&app, request(Method::GET, "/books?author=herb", None, None)).await;
    let found = body_json(response).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["title"], "Dune");

    let response = send(&app, request(Method::GET, "/books?page=2&limit=2", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["total"], 6);
    assert_eq!(page["data"][0]["title"], "C");
    assert_eq!(page["data"][1]["title"], "D");

    let response = send(&app, request(Method::GET, "/books?page=10&limit=2", None, None)).await;
    let page = body_json(response).await;
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["page"], 10);
    assert_eq!(page["total"], 6);

    let response = send(&app, request(Method::GET, "/books?page=0&limit=abc", None, None)).await;
    let page = body_json(response).await;
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 10);
    assert_eq!(page["data"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn test_optional_auth_on_books() {
    let app = app();

    let response = send(&app, request(Method::GET, "/books", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request(Method::GET, "/books", Some("garbage"), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Empty means anonymous, whitespace is a malformed header
    let response = send(&app, with_authorization(Method::GET, "/books", "")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, with_authorization(Method::GET, "/books", "   ")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Request::builder()
            .uri("/books")
            .header(header::AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = get_auth_token(&app).await;
    let response = send(
        &app,
        request(
            Method::POST,
            "/books",
            Some(&token),
            Some(json!({"title": "Dune", "author": "Frank Herbert", "year": 1965})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // An invalid token is rejected before the payload is looked at
    let response = send(
        &app,
        request(Method::POST, "/books", Some("garbage"), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let issuer = {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("another-secret".to_string());
        api::create_router(AppState::new(config).expect("Failed to build state"))
    };
    let foreign_token = get_auth_token(&issuer).await;

    let app = app();
    let response = send(&app, request(Method::GET, "/books", Some(&foreign_token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cors_reflects_origin_and_answers_preflight() {
    let app = app();

    let response = send(
        &app,
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/books")
            .header(header::ORIGIN, "https://example.org")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://example.org"
    );
    assert!(body_bytes(response).await.is_empty());

    let response = send(&app, request(Method::GET, "/ping", None, None)).await;
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = AppConfig::default();
    config.server.cors_enabled = false;
    let app = api::create_router(AppState::new(config).expect("Failed to build state"));

    let response = send(&app, request(Method::GET, "/ping", None, None)).await;
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let response = send(&app, request(Method::GET, "/openapi.json", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/books"].is_object());
}
