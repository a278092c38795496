//! Request handlers.
//!
//! Handlers parse and check the request, run the catalog operation on the
//! blocking pool, and serialize the result.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use tracing::debug;

use super::dto::{
    required, AddRequest, AllQuery, CatResponse, IdQuery, PrefixQuery, RulesQuery,
    SaveDescriptionRequest, SearchRequest,
};
use super::error::ApiError;
use crate::catalog::Catalog;
use crate::error::{CatalogError, ValidationError};
use crate::record::Record;
use crate::rules::ValidationRule;
use crate::search::{GroupedRecords, PrefixPage};
use crate::storage::BatchInsert;
use crate::types::{Gender, RecordId, RulePurpose, SortOrder};

type Shared = Extension<Arc<Catalog>>;

/// Runs a catalog operation on the blocking thread pool.
async fn run<T, F>(catalog: Arc<Catalog>, op: F) -> Result<T, CatalogError>
where
    T: Send + 'static,
    F: FnOnce(&Catalog) -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&catalog))
        .await
        .map_err(|e| CatalogError::Io(std::io::Error::other(e)))?
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(v)| v)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

fn parse_id(raw: Option<&str>) -> Result<RecordId, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Err(ValidationError::required_field("id").into()),
        Some(raw) => Ok(raw.parse()?),
    }
}

// ============================================================================
// Search
// ============================================================================

pub async fn search(
    Extension(catalog): Shared,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<GroupedRecords>, ApiError> {
    let request = json_body(body)?;
    let name = required(&request.name, "name")?.to_string();
    let genders = request.genders;

    let grouped = run(catalog, move |c| c.search_by_params(&name, &genders)).await?;
    Ok(Json(grouped))
}

pub async fn search_pattern(
    Extension(catalog): Shared,
    params: Result<Query<PrefixQuery>, QueryRejection>,
) -> Result<Json<PrefixPage>, ApiError> {
    let params = query(params)?;
    let name = required(&params.name, "name")?.to_string();
    let limit = params.limit()?;

    let page = run(catalog, move |c| c.search_by_prefix(&name, limit)).await?;
    Ok(Json(page))
}

pub async fn get_all(
    Extension(catalog): Shared,
    params: Result<Query<AllQuery>, QueryRejection>,
) -> Result<Json<GroupedRecords>, ApiError> {
    let params = query(params)?;
    let order: SortOrder = params.order.as_deref().unwrap_or("").parse()?;
    let gender: Option<Gender> = match params.gender.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse()?),
    };

    let grouped = run(catalog, move |c| c.get_all(gender, order)).await?;
    Ok(Json(grouped))
}

// ============================================================================
// Records
// ============================================================================

pub async fn add(
    Extension(catalog): Shared,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(body)?;
    let cats = request
        .cats
        .ok_or_else(|| ValidationError::required_field("cats"))?;
    debug!(count = cats.len(), "Adding records");

    match run(catalog, move |c| c.add_records(cats)).await {
        Ok(outcome) => Ok(Json(outcome).into_response()),
        Err(CatalogError::PartialInsert { inserted, failed }) if !inserted.is_empty() => {
            let outcome = BatchInsert { inserted, failed };
            Ok((StatusCode::MULTI_STATUS, Json(outcome)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn save_description(
    Extension(catalog): Shared,
    body: Result<Json<SaveDescriptionRequest>, JsonRejection>,
) -> Result<Json<CatResponse>, ApiError> {
    let request = json_body(body)?;
    let id = request
        .cat_id
        .ok_or_else(|| ValidationError::required_field("catId"))?;
    let description = required(&request.cat_description, "catDescription")?.to_string();

    let cat = run(catalog, move |c| c.save_description(id, &description)).await?;
    Ok(Json(CatResponse { cat }))
}

pub async fn get_by_id(
    Extension(catalog): Shared,
    params: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<CatResponse>, ApiError> {
    let params = query(params)?;
    let id = parse_id(params.id.as_deref())?;

    let cat = run(catalog, move |c| c.get_by_id(id)).await?;
    Ok(Json(CatResponse { cat }))
}

// ============================================================================
// Validation rules
// ============================================================================

pub async fn validation_rules(
    Extension(catalog): Shared,
    params: Result<Query<RulesQuery>, QueryRejection>,
) -> Result<Json<Vec<ValidationRule>>, ApiError> {
    let params = query(params)?;
    let purpose: Option<RulePurpose> = match params.purpose.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse()?),
    };

    let rules = run(catalog, move |c| c.validation_rules(purpose)).await?;
    Ok(Json(rules))
}

// ============================================================================
// Likes / dislikes
// ============================================================================

async fn counter(
    catalog: Arc<Catalog>,
    id: &str,
    op: fn(&Catalog, RecordId) -> crate::Result<Record>,
) -> Result<&'static str, ApiError> {
    let id = parse_id(Some(id))?;
    run(catalog, move |c| op(c, id)).await?;
    Ok("OK")
}

pub async fn like(
    Extension(catalog): Shared,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    counter(catalog, &id, Catalog::like).await
}

pub async fn unlike(
    Extension(catalog): Shared,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    counter(catalog, &id, Catalog::unlike).await
}

pub async fn dislike(
    Extension(catalog): Shared,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    counter(catalog, &id, Catalog::dislike).await
}

pub async fn undislike(
    Extension(catalog): Shared,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    counter(catalog, &id, Catalog::undislike).await
}

pub async fn likes_rating(Extension(catalog): Shared) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(run(catalog, |c| c.top_liked()).await?))
}

pub async fn dislikes_rating(Extension(catalog): Shared) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(run(catalog, |c| c.top_disliked()).await?))
}

pub async fn health() -> &'static str {
    "ok"
}
