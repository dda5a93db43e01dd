use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::system::middleware::request_logger::request_logger;
use crate::{functions, rest, system};

/// Configure all application routes
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    // ========================================
    // PROTECTED ROUTES (bearer token)
    // ========================================
    let protected = Router::new()
        .route("/api/auth/session", get(system::handlers::auth::session))
        .route(
            "/api/auth/update-password",
            post(system::handlers::auth::update_password),
        )
        // Structured data protocol
        .route(
            "/api/rest/:table",
            get(rest::handlers::list).post(rest::handlers::create),
        )
        .route(
            "/api/rest/:table/:id",
            get(rest::handlers::get_single)
                .patch(rest::handlers::update)
                .delete(rest::handlers::delete),
        )
        // Serverless-style functions
        .route(
            "/api/functions/create-entity-table",
            post(functions::create_entity_table::handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            system::auth::middleware::require_auth,
        ));

    // ========================================
    // PUBLIC ROUTES
    // ========================================
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/auth/sign-up", post(system::handlers::auth::sign_up))
        .route("/api/auth/sign-in", post(system::handlers::auth::sign_in))
        .route("/api/auth/sign-out", post(system::handlers::auth::sign_out))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route(
            "/api/auth/reset-password",
            post(system::handlers::auth::reset_password),
        )
        .route("/api/auth/recover", post(system::handlers::auth::recover))
        .merge(protected)
        .with_state(state)
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
