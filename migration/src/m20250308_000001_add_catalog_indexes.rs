use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_catalog::{MovieGenres, Movies};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_movies_rating_popularity")
                    .table(Movies::Table)
                    .col(Movies::Rating)
                    .col(Movies::Popularity)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genres_genre")
                    .table(MovieGenres::Table)
                    .col(MovieGenres::GenreId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop().name("idx_movie_genres_genre").table(MovieGenres::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_movies_rating_popularity").table(Movies::Table).to_owned(),
            )
            .await?;

        Ok(())
    }
}
