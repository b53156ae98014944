//! Data access behind the retrieval core.
//!
//! [`CatalogStore`] is the only thing [`crate::catalog::Catalog`] knows about
//! storage. Implementations must honor the ordering and sampling contracts
//! documented on each method; inputs arrive already validated and clamped.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{GenreSummary, Movie, MovieDetails},
};

#[cfg(test)]
pub mod memory;
pub mod sql;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// The movie with `id` and its genres ordered by name, case-insensitively.
    async fn movie_by_id(&self, id: i32) -> AppResult<Option<MovieDetails>>;

    /// Up to `limit` rated movies ordered by rating desc, popularity desc, id asc.
    /// Unrated movies never appear.
    async fn top_movies(&self, limit: u64) -> AppResult<Vec<Movie>>;

    /// Up to `count` distinct movies, each row equally likely to be picked.
    async fn random_movies(&self, count: u64) -> AppResult<Vec<Movie>>;

    /// Movies whose title or overview contains `query` (case-insensitive),
    /// ordered by rating desc with unrated last, then id asc. Returns the
    /// requested slice and the total number of matches.
    async fn search_movies(&self, query: &str, offset: u64, limit: u64)
    -> AppResult<(Vec<Movie>, u64)>;

    /// Every genre ordered by name (case-insensitive) then id, with movie counts.
    async fn genres(&self) -> AppResult<Vec<GenreSummary>>;
}
