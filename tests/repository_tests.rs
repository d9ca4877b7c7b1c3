use sea_orm::ColumnTrait;
use tvcatalog::db::Store;
use tvcatalog::domain::CastPosition;
use tvcatalog::entities::{episodes, series};
use tvcatalog::models::{CastMember, Episode, EpisodeCastMember, Genre, Season, Series};
use uuid::Uuid;

async fn spawn_store() -> Store {
    let db_path = std::env::temp_dir().join(format!("tvcatalog-repo-{}.db", Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open store")
}

#[tokio::test]
async fn test_unjoined_navigations_stay_unloaded() {
    let store = spawn_store().await;

    let series = store
        .repository::<Series>()
        .get_all()
        .find_by_id(1)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(series.title, "The Office (US)");
    assert_eq!(series.genre_id, 1);
    assert!(series.genre.is_none());
    assert!(series.seasons.is_none());
}

#[tokio::test]
async fn test_include_chain_reaches_cast_members() {
    let store = spawn_store().await;

    let series = store
        .repository::<Series>()
        .join(Series::SEASONS)
        .then_join(Season::EPISODES)
        .then_join(Episode::CAST)
        .then_join(EpisodeCastMember::CAST_MEMBER)
        .find_by_id(2)
        .await
        .unwrap()
        .unwrap();

    let seasons = series.seasons.as_ref().unwrap();
    assert_eq!(seasons.len(), 1);

    let episodes = seasons[0].episodes.as_ref().unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].title, "Pilot");

    let links = episodes[0].cast.as_ref().unwrap();
    assert_eq!(links.len(), 1);
    let member = links[0].cast_member.as_ref().unwrap();
    assert_eq!(member.id, links[0].cast_member_id);
    assert_eq!(member.name, "Justin Roiland");
    assert_eq!(member.position, CastPosition::Director);

    // nothing outside the chain is loaded
    assert!(series.genre.is_none());
    assert!(episodes[0].season.is_none());
}

#[tokio::test]
async fn test_sibling_joins_from_root() {
    let store = spawn_store().await;

    let all = store
        .repository::<Series>()
        .join(Series::GENRE)
        .join(Series::SEASONS)
        .all()
        .await
        .unwrap();

    assert_eq!(all.len(), 5);
    for series in &all {
        assert_eq!(series.genre.as_ref().unwrap().id, series.genre_id);
        assert_eq!(series.seasons.as_ref().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_reference_chain_upwards() {
    let store = spawn_store().await;

    let member = store
        .repository::<CastMember>()
        .join(CastMember::APPEARANCES)
        .then_join(EpisodeCastMember::EPISODE)
        .then_join(Episode::SEASON)
        .then_join(Season::SERIES)
        .then_join(Series::GENRE)
        .find_by_id(4)
        .await
        .unwrap()
        .unwrap();

    let series = member.appearances.as_ref().unwrap()[0]
        .episode
        .as_ref()
        .and_then(|episode| episode.season.as_ref())
        .and_then(|season| season.series.as_ref())
        .unwrap();
    assert_eq!(series.title, "Narcos");
    assert_eq!(series.genre.as_ref().unwrap().name, "Criminal");
}

#[tokio::test]
async fn test_filter_order_and_count() {
    let store = spawn_store().await;
    let repo = store.repository::<Series>();

    let recent = repo
        .get_all()
        .filter(series::Column::ReleaseYear.eq(2015))
        .order_by_desc(series::Column::Id)
        .all()
        .await
        .unwrap();
    let ids: Vec<i32> = recent.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![5, 4, 3]);

    assert_eq!(repo.get_all().count().await.unwrap(), 5);

    let first = repo
        .join(Series::GENRE)
        .first_or_default(series::Column::Title.contains("Saul"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.id, 3);
    assert_eq!(first.genre.unwrap().name, "Drama");

    assert!(repo.get_all().find_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_session_saves_nothing() {
    let store = spawn_store().await;
    let mut session = store.session();

    assert_eq!(session.staged_count(), 0);
    assert!(!store
        .repository::<Genre>()
        .save_changes(&mut session)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_staged_insert_is_visible_after_save() {
    let store = spawn_store().await;
    let repo = store.repository::<Genre>();
    let mut session = store.session();

    let pending = repo.add(
        &mut session,
        Genre {
            name: "Thriller".to_string(),
            ..Genre::default()
        },
    );
    assert!(pending.get().is_none());
    assert_eq!(repo.get_all().count().await.unwrap(), 5);

    assert!(repo.save_changes(&mut session).await.unwrap());
    assert_eq!(session.staged_count(), 0);

    let genre = pending.get().unwrap();
    assert_eq!(genre.id, 6);
    assert_eq!(
        repo.get_all().find_by_id(6).await.unwrap().unwrap().name,
        "Thriller"
    );
}

#[tokio::test]
async fn test_update_of_missing_row_reports_false() {
    let store = spawn_store().await;
    let repo = store.repository::<Episode>();
    let mut session = store.session();

    repo.update(
        &mut session,
        Episode {
            id: 404,
            title: "Ghost".to_string(),
            number: 1,
            season_id: 1,
            ..Episode::default()
        },
    );

    assert!(!repo.save_changes(&mut session).await.unwrap());
}

#[tokio::test]
async fn test_failed_batch_rolls_back() {
    let store = spawn_store().await;
    let mut session = store.session();

    store.repository::<Genre>().add(
        &mut session,
        Genre {
            name: "Thriller".to_string(),
            ..Genre::default()
        },
    );
    store.repository::<Series>().add(
        &mut session,
        Series {
            title: "Orphan".to_string(),
            release_year: 2020,
            genre_id: 999,
            ..Series::default()
        },
    );

    assert!(session.save_changes().await.is_err());
    assert_eq!(
        store.repository::<Genre>().get_all().count().await.unwrap(),
        5
    );
}

#[tokio::test]
async fn test_delete_cascades_through_children() {
    let store = spawn_store().await;
    let seasons = store.repository::<Season>();
    let mut session = store.session();

    let season = seasons.get_all().find_by_id(1).await.unwrap().unwrap();
    seasons.delete(&mut session, season);
    assert!(seasons.save_changes(&mut session).await.unwrap());

    let remaining = store
        .repository::<Episode>()
        .get_all()
        .filter(episodes::Column::SeasonId.eq(1))
        .count()
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert_eq!(
        store
            .repository::<EpisodeCastMember>()
            .get_all()
            .count()
            .await
            .unwrap(),
        4
    );
}
