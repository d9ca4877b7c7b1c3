use crate::entities::prelude::*;
use crate::entities::{cast_members, episode_casts, episodes, genres, seasons, series};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const GENRES: [&str; 5] = ["Comedy", "Animated", "Drama", "Criminal", "Documentary"];

/// (name, position code)
const CAST_MEMBERS: [(&str, i32); 5] = [
    ("Steve Carell", 0),
    ("Justin Roiland", 1),
    ("Bob Odenkirk", 0),
    ("Pedro Pascal", 0),
    ("Steven Avery", 0),
];

/// (title, release year); series `n` belongs to genre `n`.
const SERIES: [(&str, i32); 5] = [
    ("The Office (US)", 2005),
    ("Rick and Morty", 2013),
    ("Better Call Saul", 2015),
    ("Narcos", 2015),
    ("Making a Murderer", 2015),
];

/// Pilot of season 1 for each seeded series.
const EPISODES: [&str; 5] = [
    "The American Office",
    "Pilot",
    "Uno",
    "Descenso",
    "Eighteen Years Lost",
];

fn seeded_ids() -> impl Iterator<Item = i32> {
    1..=5
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(Genres)
            .columns([genres::Column::Id, genres::Column::Name])
            .to_owned();
        for (id, name) in seeded_ids().zip(GENRES) {
            insert.values_panic([id.into(), name.into()]);
        }
        manager.exec_stmt(insert).await?;

        let mut insert = Query::insert()
            .into_table(CastMembers)
            .columns([
                cast_members::Column::Id,
                cast_members::Column::Name,
                cast_members::Column::Position,
            ])
            .to_owned();
        for (id, (name, position)) in seeded_ids().zip(CAST_MEMBERS) {
            insert.values_panic([id.into(), name.into(), position.into()]);
        }
        manager.exec_stmt(insert).await?;

        let mut insert = Query::insert()
            .into_table(Series)
            .columns([
                series::Column::Id,
                series::Column::Title,
                series::Column::ReleaseYear,
                series::Column::GenreId,
            ])
            .to_owned();
        for (id, (title, year)) in seeded_ids().zip(SERIES) {
            insert.values_panic([id.into(), title.into(), year.into(), id.into()]);
        }
        manager.exec_stmt(insert).await?;

        let mut insert = Query::insert()
            .into_table(Seasons)
            .columns([
                seasons::Column::Id,
                seasons::Column::Number,
                seasons::Column::SeriesId,
            ])
            .to_owned();
        for id in seeded_ids() {
            insert.values_panic([id.into(), 1_i32.into(), id.into()]);
        }
        manager.exec_stmt(insert).await?;

        let mut insert = Query::insert()
            .into_table(Episodes)
            .columns([
                episodes::Column::Id,
                episodes::Column::Title,
                episodes::Column::Number,
                episodes::Column::SeasonId,
            ])
            .to_owned();
        for (id, title) in seeded_ids().zip(EPISODES) {
            insert.values_panic([id.into(), title.into(), 1_i32.into(), id.into()]);
        }
        manager.exec_stmt(insert).await?;

        let mut insert = Query::insert()
            .into_table(EpisodeCasts)
            .columns([
                episode_casts::Column::Id,
                episode_casts::Column::EpisodeId,
                episode_casts::Column::CastMemberId,
            ])
            .to_owned();
        for id in seeded_ids() {
            insert.values_panic([id.into(), id.into(), id.into()]);
        }
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cascades clear the dependent rows.
        let delete = Query::delete()
            .from_table(Genres)
            .and_where(Expr::col(genres::Column::Id).is_in(seeded_ids()))
            .to_owned();
        manager.exec_stmt(delete).await?;

        let delete = Query::delete()
            .from_table(CastMembers)
            .and_where(Expr::col(cast_members::Column::Id).is_in(seeded_ids()))
            .to_owned();
        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
