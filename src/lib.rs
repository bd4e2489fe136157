pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use store::Store;

/// Shared application state: the document store behind its trait seam.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .merge(public_routes())
        // Protected API
        .merge(user_routes())
        .merge(card_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
}

fn user_routes() -> Router<AppState> {
    use axum::routing::patch;
    use handlers::users;

    Router::new()
        .route("/users", get(users::get_users))
        .route(
            "/users/me",
            get(users::get_current_user).patch(users::update_profile),
        )
        .route("/users/me/avatar", patch(users::update_avatar))
        .route("/users/:user_id", get(users::get_user_by_id))
        .route_layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
}

fn card_routes() -> Router<AppState> {
    use axum::routing::{delete, put};
    use handlers::cards;

    Router::new()
        .route("/cards", get(cards::get_cards).post(cards::create_card))
        .route("/cards/:card_id", delete(cards::delete_card))
        .route(
            "/cards/:card_id/likes",
            put(cards::like_card)
                .patch(cards::like_card)
                .delete(cards::unlike_card),
        )
        .route_layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
}
