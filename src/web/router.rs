use super::{WebError, handlers};
use crate::facade::Database;
use crate::models::{Category, Course, Enrollment, Lesson, Resource, Review, User};
use axum::Router;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use http::{HeaderValue, StatusCode, header};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Prefix every resource is mounted under.
pub const API_PREFIX: &str = "/api";

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Builds the full router with permissive CORS.
pub fn build_router(state: AppState) -> Router {
    build_router_with_cors(state, &[])
}

/// Builds the full router. An empty `cors_origins` allows any origin.
pub fn build_router_with_cors(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .merge(resource_routes::<User>())
        .merge(resource_routes::<Category>())
        .merge(resource_routes::<Course>())
        .merge(resource_routes::<Lesson>())
        .merge(resource_routes::<Enrollment>())
        .merge(resource_routes::<Review>())
        // Older clients read and write reviews as ratings.
        .merge(resource_routes_at::<Review>("ratings"))
        .merge(route_both(
            "/courses/:id/lessons",
            get(handlers::course_lessons),
        ))
        .merge(route_both(
            "/courses/:id/reviews",
            get(handlers::course_reviews),
        ))
        .merge(route_both(
            "/courses/:id/ratings",
            get(handlers::course_reviews),
        ));

    Router::new()
        .route("/health", get(handlers::healthcheck))
        .nest(API_PREFIX, api)
        .fallback(handlers::no_route)
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// The five CRUD verbs for one record type.
fn resource_routes<R: Resource>() -> Router<AppState> {
    resource_routes_at::<R>(R::KIND.collection())
}

fn resource_routes_at<R: Resource>(segment: &str) -> Router<AppState> {
    let collection = format!("/{segment}");
    let member = format!("{collection}/:id");

    Router::new()
        .merge(route_both(
            &collection,
            get(handlers::list::<R>).post(handlers::create::<R>),
        ))
        .merge(route_both(
            &member,
            get(handlers::retrieve::<R>)
                .put(handlers::update::<R>)
                .patch(handlers::partial_update::<R>)
                .delete(handlers::destroy::<R>),
        ))
}

/// Mounts `path` with and without a trailing slash.
fn route_both(path: &str, method_router: MethodRouter<AppState>) -> Router<AppState> {
    Router::new()
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// Gives the router's bare 405 the same JSON body as every other error,
/// keeping its `Allow` header.
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = WebError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}
