use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        books::{create_book, delete_book, list_books, read_book, update_book},
        login::{login_access_token, test_token},
        users::{
            create_user, delete_user, delete_user_me, list_users, read_user_by_id, read_user_me,
            register_user, update_password_me, update_user, update_user_me,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        // Login routes
        .route("/login/access-token", post(login_access_token))
        .route("/login/test-token", post(test_token))
        // User routes
        .route("/users", get(list_users).post(create_user))
        .route("/users/signup", post(register_user))
        .route(
            "/users/me",
            get(read_user_me).patch(update_user_me).delete(delete_user_me),
        )
        .route("/users/me/password", patch(update_password_me))
        .route(
            "/users/{id}",
            get(read_user_by_id).patch(update_user).delete(delete_user),
        )
        // Book routes
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(read_book).put(update_book).delete(delete_book),
        )
        .layer(cors);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
