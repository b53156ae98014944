use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{GenreSummary, Movie, MovieDetails, SearchPage},
};

/// Blank means absent; anything else must be an integer.
fn parse_int(param: &'static str, raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::invalid(param, format!("{s:?} is not an integer"))),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDetails>> {
    let id = parse_int("id", Some(id.as_str()))?
        .ok_or_else(|| AppError::invalid("id", "is required"))?;
    Ok(Json(state.catalog.get_movie(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    limit: Option<String>,
}

pub async fn top_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TopQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let limit = parse_int("limit", q.limit.as_deref())?;
    Ok(Json(state.catalog.top_movies(limit).await?))
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    count: Option<String>,
}

pub async fn random_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RandomQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let count = parse_int("count", q.count.as_deref())?;
    Ok(Json(state.catalog.random_movies(count).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<SearchPage>> {
    let page = parse_int("page", q.page.as_deref())?;
    let page_size = parse_int("pageSize", q.page_size.as_deref())?;
    let query = q.q.unwrap_or_default();
    Ok(Json(state.catalog.search_movies(&query, page, page_size).await?))
}

pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<GenreSummary>>> {
    Ok(Json(state.catalog.genres().await?))
}
