//! Router tests for requests that are decided before any query runs

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::{AUTHORIZATION, CONTENT_TYPE}},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use contest_engine::{
    AppState,
    cache::MemoryStageCache,
    config::{Config, DatabaseConfig, JwtConfig, RedisConfig, ServerConfig, StageConfig},
    constants::{API_BASE_PATH, CONTEST_ID_HEADER},
    handlers,
    middleware::auth::Claims,
};

const SECRET: &str = "router-test-secret";

fn config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 1,
        },
        redis: RedisConfig { url: None },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
        },
        stage: StageConfig {
            cache_ttl: Duration::from_secs(60),
        },
    }
}

fn app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .unwrap();
    let state = AppState::new(pool, Arc::new(MemoryStageCache::new(Duration::from_secs(60))), config());

    Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .with_state(state)
}

fn bearer() -> String {
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_health_is_public() {
    let response = app()
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_contest_routes_require_token() {
    let response = app()
        .oneshot(Request::get("/api/v1/contest").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_contest_header_is_bad_request() {
    let request = Request::get("/api/v1/contest")
        .header(AUTHORIZATION, bearer())
        .header(CONTEST_ID_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_contest_header_is_forbidden() {
    let request = Request::post("/api/v1/contest/winners/recompute")
        .header(AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_file_constraint_batch_is_bounded() {
    let ids: Vec<String> = (0..4).map(|_| format!("\"{}\"", Uuid::new_v4())).collect();

    let bodies = [
        "{\"file_constraint_ids\":[]}".to_string(),
        format!("{{\"file_constraint_ids\":[{}]}}", ids.join(",")),
    ];

    for body in bodies {
        let request = Request::put("/api/v1/contest/file-constraints")
            .header(AUTHORIZATION, bearer())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
