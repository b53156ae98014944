//! In-memory [`CatalogStore`] used as a test fixture, plus the sample catalog
//! shared by the store and HTTP tests.

use std::{
    cmp::Ordering,
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

use async_trait::async_trait;
use jiff::civil::date;

use super::CatalogStore;
use crate::{
    error::AppResult,
    models::{Genre, GenreSummary, Movie, MovieDetails},
};

pub struct SampleCatalog {
    pub movies: Vec<Movie>,
    pub genres: Vec<Genre>,
    pub links: Vec<(i32, i32)>,
}

/// Rated ids of the sample catalog in top-N order.
pub const TOP_ORDER: [i32; 9] = [3, 1, 2, 7, 9, 4, 6, 5, 10];

/// Ids matching "the" in the sample catalog, in search order.
pub const THE_SEARCH_ORDER: [i32; 4] = [3, 1, 6, 8];

pub const GENRE_COUNTS: [(&str, i64); 7] = [
    ("Action", 3),
    ("Comedy", 3),
    ("Crime", 2),
    ("Drama", 4),
    ("mystery", 1),
    ("Sci-Fi", 1),
    ("Western", 0),
];

fn movie(id: i32, title: &str, overview: &str, rating: Option<f64>, popularity: f64) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: overview.to_string(),
        release_date: None,
        rating,
        popularity,
        poster_url: Some(format!("/posters/{id}.jpg")),
        backdrop_url: None,
    }
}

pub fn sample_catalog() -> SampleCatalog {
    let mut matrix = movie(1, "The Matrix", "A hacker learns what reality is.", Some(8.7), 90.0);
    matrix.release_date = Some(date(1999, 3, 31));
    let mut untitled = movie(8, "Untitled Project", "In development; the plot is unknown.", None, 5.0);
    untitled.poster_url = None;

    let movies = vec![
        matrix,
        movie(2, "Gladiator", "A Roman general seeks vengeance.", Some(8.5), 80.0),
        movie(3, "The Godfather", "An aging patriarch hands over his empire.", Some(9.2), 95.0),
        movie(4, "Heat", "A group of professional bank robbers pulls one last job.", Some(8.3), 60.0),
        movie(5, "Airplane!", "A former fighter pilot must land a crippled airliner.", Some(7.7), 40.0),
        movie(6, "Groundhog Day", "A weatherman relives one day over and over.", Some(8.0), 55.0),
        movie(7, "Memento", "A man with short-term memory loss hunts a killer.", Some(8.5), 80.0),
        untitled,
        movie(9, "Casablanca", "A cynical nightclub owner shelters an old flame.", Some(8.5), 70.0),
        movie(10, "100% Wolf", "A boy turns into a poodle instead of a werewolf.", Some(5.6), 10.0),
    ];

    let genres = [
        (1, "Drama"),
        (2, "Sci-Fi"),
        (3, "Comedy"),
        (4, "Action"),
        (5, "Crime"),
        (6, "mystery"),
        (7, "Western"),
    ]
    .into_iter()
    .map(|(id, name)| Genre { id, name: name.to_string() })
    .collect();

    let links = vec![
        (1, 4),
        (1, 2),
        (2, 4),
        (2, 1),
        (3, 1),
        (3, 5),
        (4, 4),
        (4, 5),
        (4, 1),
        (5, 3),
        (6, 3),
        (7, 6),
        (9, 1),
        (10, 3),
    ];

    SampleCatalog { movies, genres, links }
}

pub struct MemoryStore {
    catalog: SampleCatalog,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(catalog: SampleCatalog) -> Self {
        Self { catalog, calls: AtomicUsize::new(0) }
    }

    pub fn sample() -> Self {
        Self::new(sample_catalog())
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
    }

    fn genres_of(&self, movie_id: i32) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .catalog
            .links
            .iter()
            .filter(|(m, _)| *m == movie_id)
            .filter_map(|(_, g)| self.catalog.genres.iter().find(|genre| genre.id == *g))
            .cloned()
            .collect();
        genres.sort_by(|a, b| by_name(&a.name, a.id, &b.name, b.id));
        genres
    }
}

fn by_name(a: &str, a_id: i32, b: &str, b_id: i32) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then(a_id.cmp(&b_id))
}

fn rating_desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn movie_by_id(&self, id: i32) -> AppResult<Option<MovieDetails>> {
        self.record_call();
        Ok(self
            .catalog
            .movies
            .iter()
            .find(|m| m.id == id)
            .map(|m| MovieDetails { movie: m.clone(), genres: self.genres_of(id) }))
    }

    async fn top_movies(&self, limit: u64) -> AppResult<Vec<Movie>> {
        self.record_call();
        let mut rated: Vec<Movie> =
            self.catalog.movies.iter().filter(|m| m.rating.is_some()).cloned().collect();
        rated.sort_by(|a, b| {
            rating_desc_nulls_last(a.rating, b.rating)
                .then(b.popularity.total_cmp(&a.popularity))
                .then(a.id.cmp(&b.id))
        });
        rated.truncate(limit as usize);
        Ok(rated)
    }

    async fn random_movies(&self, count: u64) -> AppResult<Vec<Movie>> {
        self.record_call();
        let len = self.catalog.movies.len();
        let amount = (count as usize).min(len);
        let picked = rand::seq::index::sample(&mut rand::thread_rng(), len, amount);
        Ok(picked.into_iter().map(|i| self.catalog.movies[i].clone()).collect())
    }

    async fn search_movies(
        &self,
        query: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Movie>, u64)> {
        self.record_call();
        let needle = query.to_lowercase();
        let mut matches: Vec<Movie> = self
            .catalog
            .movies
            .iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.overview.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| rating_desc_nulls_last(a.rating, b.rating).then(a.id.cmp(&b.id)));

        let total = matches.len() as u64;
        let page = matches.into_iter().skip(offset as usize).take(limit as usize).collect();
        Ok((page, total))
    }

    async fn genres(&self) -> AppResult<Vec<GenreSummary>> {
        self.record_call();
        let mut out: Vec<GenreSummary> = self
            .catalog
            .genres
            .iter()
            .map(|g| GenreSummary {
                id: g.id,
                name: g.name.clone(),
                movie_count: self.catalog.links.iter().filter(|(_, id)| *id == g.id).count() as i64,
            })
            .collect();
        out.sort_by(|a, b| by_name(&a.name, a.id, &b.name, b.id));
        Ok(out)
    }
}
