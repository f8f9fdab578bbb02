//! triage-server
//!
//! HTTP composition root for the intake triage engine. Owns the long-lived
//! knowledge base, the session store and the audit sink, and wires them into
//! the engine per request.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub use config::ServerConfig;
pub use session::SessionStore;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/sessions/{token}/intake",
            put(routes::intake::submit_intake).get(routes::intake::get_intake),
        )
        .route("/triage/run", post(routes::triage::run_triage))
        .route(
            "/assistant-actions/apply",
            post(routes::assistant_actions::apply_action),
        )
        .route(
            "/sessions/{token}/explain/conditions/{condition_id}",
            get(routes::explain::explain_condition),
        )
        .route(
            "/sessions/{token}/explain/anomalies",
            get(routes::explain::explain_anomalies),
        )
        .route(
            "/sessions/{token}/explain/assistant-actions/{action_id}",
            get(routes::explain::explain_action),
        )
        .route(
            "/sessions/{token}/explain/followups/{question_id}",
            get(routes::explain::explain_followup),
        )
        .route(
            "/sessions/{token}/wrapup",
            post(routes::wrapup::finalize_wrapup),
        )
        .route("/knowledge/reload", post(routes::knowledge::reload))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::request_log::request_log)),
        )
        .with_state(state)
}
