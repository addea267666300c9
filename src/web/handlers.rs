//! Handlers shared by every record type.
//!
//! Each function is generic over [`Resource`]; the router mounts one
//! instantiation per record type.

use super::{Result, WebError};
use super::extract::{Payload, decode, parse_id};
use super::router::AppState;
use crate::core::ResourceKind;
use crate::models::{Lesson, Resource, Review};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn healthcheck() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn no_route(uri: Uri) -> WebError {
    WebError::NoMatch(format!("no route for {}", uri.path()))
}

pub async fn list<R: Resource>(State(state): State<AppState>) -> Json<Vec<R>> {
    Json(state.db.list::<R>().await)
}

pub async fn retrieve<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>> {
    let id = parse_id(R::KIND, &id)?;
    Ok(Json(state.db.retrieve::<R>(id).await?))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Payload(draft): Payload<R::Draft>,
) -> Result<(StatusCode, Json<R>)> {
    let record = state.db.create::<R>(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// Updates resolve the record before looking at the body's shape, so a
// missing record is reported as such whatever the payload holds.

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<JsonValue>,
) -> Result<Json<R>> {
    let id = parse_id(R::KIND, &id)?;
    state.db.retrieve::<R>(id).await?;
    let draft = decode::<R::Draft>(body)?;
    Ok(Json(state.db.update::<R>(id, draft).await?))
}

pub async fn partial_update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<JsonValue>,
) -> Result<Json<R>> {
    let id = parse_id(R::KIND, &id)?;
    state.db.retrieve::<R>(id).await?;
    let patch = decode::<R::Patch>(body)?;
    Ok(Json(state.db.partial_update::<R>(id, patch).await?))
}

pub async fn destroy<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(R::KIND, &id)?;
    state.db.destroy::<R>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn course_lessons(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Lesson>>> {
    let id = parse_id(ResourceKind::Course, &id)?;
    Ok(Json(state.db.course_lessons(id).await?))
}

pub async fn course_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>> {
    let id = parse_id(ResourceKind::Course, &id)?;
    Ok(Json(state.db.course_reviews(id).await?))
}
