//! Test utilities for integration testing
use crate::api::models::books::BookRequest;
use crate::api::models::users::UserRequest;
use crate::config::{Config, PersistenceStrategy, PoolSettings};
use crate::db::models::books::BookDto;
use crate::db::models::users::UserDto;
use crate::types::UserId;
use crate::Application;
use axum_test::TestServer;
use sqlx::PgPool;

pub const REQUEST_ID_HEADER: &str = "rqid";
pub const TEST_REQUEST_ID: &str = "test123abc";

pub fn create_test_config(strategy: PersistenceStrategy) -> Config {
    let mut config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };
    // The pool is handed in by #[sqlx::test]; the url is never dialed
    config.database.url = "postgres://test@localhost/test".to_string();
    config.database.pool = PoolSettings {
        max_connections: 2,
        min_connections: 0,
        ..Default::default()
    };
    config.persistence.strategy = strategy;
    config.api.request_id_header = REQUEST_ID_HEADER.to_string();
    config
}

pub async fn create_test_app(pool: PgPool, strategy: PersistenceStrategy) -> TestServer {
    Application::new_with_pool(create_test_config(strategy), Some(pool))
        .await
        .expect("Failed to create test application")
        .into_test_server()
}

/// Insert a person row directly, bypassing every repository
pub async fn create_test_user(pool: &PgPool, full_name: &str) -> UserId {
    sqlx::query_scalar("INSERT INTO person (full_name, title, age, country) VALUES ($1, 'reader', 89, 'Russia') RETURNING id")
        .bind(full_name)
        .fetch_one(pool)
        .await
        .expect("Failed to create test user")
}

pub fn user_dto(full_name: &str) -> UserDto {
    UserDto {
        id: None,
        full_name: Some(full_name.to_string()),
        title: Some("reader".to_string()),
        age: Some(89),
        country: Some("Russia".to_string()),
    }
}

pub fn book_dto(owner: UserId, title: &str) -> BookDto {
    BookDto {
        id: None,
        user_id: Some(owner),
        title: Some(title.to_string()),
        author: Some("Test Author".to_string()),
        page_count: Some(1000),
    }
}

pub fn user_request(full_name: &str) -> UserRequest {
    UserRequest {
        full_name: Some(full_name.to_string()),
        title: Some("reader".to_string()),
        country: Some("Russia".to_string()),
        age: Some(89),
    }
}

pub fn book_request(title: &str) -> BookRequest {
    BookRequest {
        user_id: None,
        title: Some(title.to_string()),
        author: Some("Test Author".to_string()),
        page_count: Some(1000),
    }
}
