use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    models::{GenreSummary, Movie, MovieDetails, SearchPage},
    store::CatalogStore,
};

/// Default and ceiling for every list size the catalog accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub default: u64,
    pub max: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self { default: 20, max: 100 }
    }
}

impl Limits {
    /// Missing → default, non-positive → error, above the ceiling → ceiling.
    fn size(&self, param: &'static str, requested: Option<i64>) -> AppResult<u64> {
        match requested {
            None => Ok(self.default.min(self.max)),
            Some(n) if n <= 0 => Err(AppError::invalid(param, "must be a positive integer")),
            Some(n) => Ok((n as u64).min(self.max)),
        }
    }
}

/// The retrieval operations behind the HTTP surface.
///
/// Inputs are validated here, before any store access. The catalog holds no
/// per-request state, so one instance serves every request concurrently.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
    limits: Limits,
}

impl Catalog {
    pub fn new(store: Arc<dyn CatalogStore>, limits: Limits) -> Self {
        Self { store, limits }
    }

    pub async fn get_movie(&self, id: i64) -> AppResult<MovieDetails> {
        if id <= 0 {
            return Err(AppError::invalid("id", "must be a positive integer"));
        }
        let id = i32::try_from(id).map_err(|_| AppError::invalid("id", "is out of range"))?;

        debug!(id, "get movie");
        self.store.movie_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn top_movies(&self, limit: Option<i64>) -> AppResult<Vec<Movie>> {
        let limit = self.limits.size("limit", limit)?;
        debug!(limit, "top movies");
        self.store.top_movies(limit).await
    }

    pub async fn random_movies(&self, count: Option<i64>) -> AppResult<Vec<Movie>> {
        let count = self.limits.size("count", count)?;
        debug!(count, "random movies");
        self.store.random_movies(count).await
    }

    pub async fn search_movies(
        &self,
        query: &str,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> AppResult<SearchPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::invalid("q", "must not be empty"));
        }

        let page = match page {
            None => 1,
            Some(p) if p < 1 => return Err(AppError::invalid("page", "must be 1 or greater")),
            Some(p) => p as u64,
        };
        let page_size = self.limits.size("pageSize", page_size)?;
        let offset = (page - 1)
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::invalid("page", "is out of range"))?;

        debug!(query, page, page_size, "search movies");
        let (items, total) = self.store.search_movies(query, offset, page_size).await?;
        Ok(SearchPage { items, total, page, page_size })
    }

    pub async fn genres(&self) -> AppResult<Vec<GenreSummary>> {
        debug!("genres");
        self.store.genres().await
    }
}
