//! Migrate command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::{CastMember, Genre, Series};

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let genres = store.repository::<Genre>().get_all().count().await?;
    let series = store.repository::<Series>().get_all().count().await?;
    let cast = store.repository::<CastMember>().get_all().count().await?;

    println!("Database ready at {}", config.general.database_path);
    println!("{:-<40}", "");
    println!("  Genres:       {}", genres);
    println!("  Series:       {}", series);
    println!("  Cast members: {}", cast);

    Ok(())
}
