use jiff::civil::Date;
use serde::Serialize;

use crate::{
    entities::{genre, movie},
    error::{AppError, AppResult},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub overview: String,
    pub release_date: Option<Date>,
    pub rating: Option<f64>,
    pub popularity: f64,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl TryFrom<movie::Model> for Movie {
    type Error = AppError;

    fn try_from(row: movie::Model) -> AppResult<Self> {
        let release_date = match row.release_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Date>().map_err(|err| {
                let id = row.id;
                AppError::Internal(format!("movie {id} has malformed release date {raw:?}: {err}"))
            })?),
        };

        Ok(Self {
            id: row.id,
            title: row.title,
            overview: row.overview,
            release_date,
            rating: row.rating,
            popularity: row.popularity,
            poster_url: row.poster_url,
            backdrop_url: row.backdrop_url,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl From<genre::Model> for Genre {
    fn from(row: genre::Model) -> Self {
        Self { id: row.id, name: row.name }
    }
}

/// A movie together with the genres it is tagged with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreSummary {
    pub id: i32,
    pub name: String,
    pub movie_count: i64,
}

/// One page of search matches. `total` counts matches across every page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub items: Vec<Movie>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}
