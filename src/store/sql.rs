use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Func, NullOrdering, SimpleExpr},
};
use tracing::debug;

use super::CatalogStore;
use crate::{
    entities::{genre, movie, movie_genre},
    error::{AppError, AppResult},
    models::{Genre, GenreSummary, Movie, MovieDetails},
};

/// [`CatalogStore`] over a pooled sea-orm connection.
///
/// Every call is bounded by `timeout`. When the bound elapses (or the caller
/// drops the future) the in-flight query is dropped and its pooled
/// connection goes back to the pool.
#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
    timeout: Duration,
}

#[derive(Debug, FromQueryResult)]
struct GenreCountRow {
    id: i32,
    name: String,
    movie_count: i64,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn bounded<T, E, F>(&self, op: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, E>>,
        AppError: From<E>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => {
                debug!(op, timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(AppError::StoreUnavailable(format!(
                    "{op} did not complete within {}ms",
                    self.timeout.as_millis()
                )))
            },
        }
    }
}

#[async_trait]
impl CatalogStore for SqlStore {
    async fn movie_by_id(&self, id: i32) -> AppResult<Option<MovieDetails>> {
        self.bounded("movie_by_id", async {
            let Some(row) = movie::Entity::find_by_id(id).one(&self.db).await? else {
                return Ok(None);
            };

            let genres = row
                .find_related(genre::Entity)
                .order_by_asc(lower((genre::Entity, genre::Column::Name)))
                .order_by_asc(genre::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Genre::from)
                .collect();

            Ok::<_, AppError>(Some(MovieDetails { movie: Movie::try_from(row)?, genres }))
        })
        .await
    }

    async fn top_movies(&self, limit: u64) -> AppResult<Vec<Movie>> {
        let rows = self
            .bounded(
                "top_movies",
                movie::Entity::find()
                    .filter(movie::Column::Rating.is_not_null())
                    .order_by_desc(movie::Column::Rating)
                    .order_by_desc(movie::Column::Popularity)
                    .order_by_asc(movie::Column::Id)
                    .limit(sql_limit(limit))
                    .all(&self.db),
            )
            .await?;

        decode_movies(rows)
    }

    async fn random_movies(&self, count: u64) -> AppResult<Vec<Movie>> {
        // Each row draws an independent random key, so every row is equally
        // likely to land in the first `count`.
        let rows = self
            .bounded(
                "random_movies",
                movie::Entity::find()
                    .order_by(Expr::cust("RANDOM()"), Order::Asc)
                    .limit(sql_limit(count))
                    .all(&self.db),
            )
            .await?;

        decode_movies(rows)
    }

    async fn search_movies(
        &self,
        query: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Movie>, u64)> {
        // Column and pattern go through the same LOWER so both sides fold alike.
        let pattern = format!("%{}%", escape_like(query));
        let contains = |column: movie::Column| {
            Expr::cust_with_exprs(
                format!("$1 LIKE LOWER($2) ESCAPE '{LIKE_ESCAPE}'"),
                [lower((movie::Entity, column)), Expr::val(pattern.as_str()).into()],
            )
        };
        let matching = movie::Entity::find().filter(
            Condition::any()
                .add(contains(movie::Column::Title))
                .add(contains(movie::Column::Overview)),
        );

        let (rows, total) = self
            .bounded("search_movies", async {
                let total = matching.clone().count(&self.db).await?;
                if offset >= total {
                    return Ok((Vec::new(), total));
                }
                let rows = matching
                    .order_by_with_nulls(movie::Column::Rating, Order::Desc, NullOrdering::Last)
                    .order_by_asc(movie::Column::Id)
                    .offset(offset)
                    .limit(sql_limit(limit))
                    .all(&self.db)
                    .await?;
                Ok::<_, AppError>((rows, total))
            })
            .await?;

        Ok((decode_movies(rows)?, total))
    }

    async fn genres(&self) -> AppResult<Vec<GenreSummary>> {
        let rows = self
            .bounded(
                "genres",
                genre::Entity::find()
                    .select_only()
                    .column(genre::Column::Id)
                    .column(genre::Column::Name)
                    .column_as(
                        Expr::col((movie_genre::Entity, movie_genre::Column::MovieId)).count(),
                        "movie_count",
                    )
                    .join(JoinType::LeftJoin, genre::Relation::MovieGenre.def())
                    .group_by(genre::Column::Id)
                    .group_by(genre::Column::Name)
                    .order_by_asc(lower((genre::Entity, genre::Column::Name)))
                    .order_by_asc(genre::Column::Id)
                    .into_model::<GenreCountRow>()
                    .all(&self.db),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| GenreSummary { id: row.id, name: row.name, movie_count: row.movie_count })
            .collect())
    }
}

fn lower<C>(column: C) -> SimpleExpr
where
    C: sea_orm::sea_query::IntoColumnRef,
{
    Func::lower(Expr::col(column)).into()
}

const LIKE_ESCAPE: char = '!';

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// SQL binders take signed 64-bit values.
fn sql_limit(n: u64) -> u64 {
    n.min(i64::MAX as u64)
}

fn decode_movies(rows: Vec<movie::Model>) -> AppResult<Vec<Movie>> {
    rows.into_iter().map(Movie::try_from).collect()
}
