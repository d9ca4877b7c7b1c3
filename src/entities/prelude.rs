pub use super::cast_members::Entity as CastMembers;
pub use super::episode_casts::Entity as EpisodeCasts;
pub use super::episodes::Entity as Episodes;
pub use super::genres::Entity as Genres;
pub use super::seasons::Entity as Seasons;
pub use super::series::Entity as Series;
