use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, docs::ApiDoc, handlers, middleware, state::AppState};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/students", get(handlers::students::list_students))
        .route("/add-student", post(handlers::students::add_student))
        .route(
            "/update-student/{id}",
            put(handlers::students::update_student),
        )
        .route(
            "/delete-student/{id}",
            delete(handlers::students::delete_student),
        )
        .route(
            "/submit-attendance",
            post(handlers::attendance::submit_attendance),
        )
        .route(
            "/attendance-today",
            get(handlers::attendance::attendance_today),
        )
        .route(
            "/available-dates",
            get(handlers::attendance::available_dates),
        )
        .route(
            "/attendance-records",
            get(handlers::attendance::attendance_records),
        )
        .route("/add-result", post(handlers::results::add_result))
        .route("/results", get(handlers::results::list_results))
        .route(
            "/result-individual",
            get(handlers::results::individual_result),
        )
}

/// The complete application: API routes, Swagger UI and the shared layers.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(api_router())
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum_middleware::from_fn(middleware::log_error_responses)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allow_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(24 * 60 * 60))
}
