use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ActiveValue as AV, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, QueryOrder, SqlErr,
};
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    entity::{playlist, playlist_song, song},
    form::{NewPlaylist, NewSong},
    migration::Migrator,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("constraint violated: {0}")]
    Constraint(String),
}

impl Error {
    fn from_write(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Error::Constraint(msg),
            _ => Error::DbErr(err),
        }
    }
}

#[derive(Debug)]
pub struct DB {
    connection: DatabaseConnection,
}

impl DB {
    /// Connects to `url` and brings the schema up to date.
    pub async fn connect(url: impl AsRef<str>) -> Result<Self, Error> {
        let url = url.as_ref();
        debug!("database URL: {url}");
        let mut opts = ConnectOptions::new(url);
        opts.sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);
        if url.contains(":memory:") {
            // every pooled connection would otherwise get its own empty database
            opts.max_connections(1).min_connections(1);
        }

        let connection = Database::connect(opts).await?;
        Migrator::up(&connection, None).await?;
        info!("database ready");

        Ok(Self { connection })
    }

    pub async fn playlists(&self) -> Result<Vec<playlist::Model>, Error> {
        Ok(playlist::Entity::find()
            .order_by_asc(playlist::Column::Id)
            .all(&self.connection)
            .await?)
    }

    pub async fn playlist(&self, id: i32) -> Result<Option<playlist::Model>, Error> {
        Ok(playlist::Entity::find_by_id(id)
            .one(&self.connection)
            .await?)
    }

    pub async fn songs_in_playlist(
        &self,
        playlist: &playlist::Model,
    ) -> Result<Vec<song::Model>, Error> {
        Ok(playlist
            .find_related(song::Entity)
            .order_by_asc(song::Column::Id)
            .all(&self.connection)
            .await?)
    }

    pub async fn add_playlist(&self, new: NewPlaylist) -> Result<playlist::Model, Error> {
        let model = playlist::ActiveModel {
            id: AV::NotSet,
            name: AV::Set(new.name),
            description: AV::Set(Some(new.description)),
        }
        .insert(&self.connection)
        .await?;
        debug!("added playlist {} ({})", model.id, model.name);
        Ok(model)
    }

    pub async fn songs(&self) -> Result<Vec<song::Model>, Error> {
        Ok(song::Entity::find()
            .order_by_asc(song::Column::Id)
            .all(&self.connection)
            .await?)
    }

    pub async fn song(&self, id: i32) -> Result<Option<song::Model>, Error> {
        Ok(song::Entity::find_by_id(id).one(&self.connection).await?)
    }

    pub async fn playlists_with_song(
        &self,
        song: &song::Model,
    ) -> Result<Vec<playlist::Model>, Error> {
        Ok(song
            .find_related(playlist::Entity)
            .order_by_asc(playlist::Column::Id)
            .all(&self.connection)
            .await?)
    }

    pub async fn add_song(&self, new: NewSong) -> Result<song::Model, Error> {
        let model = song::ActiveModel {
            id: AV::NotSet,
            title: AV::Set(new.title),
            artist: AV::Set(new.artist),
        }
        .insert(&self.connection)
        .await?;
        debug!("added song {} ({} - {})", model.id, model.artist, model.title);
        Ok(model)
    }

    /// All songs that are not yet on `playlist`.
    pub async fn candidate_songs(
        &self,
        playlist: &playlist::Model,
    ) -> Result<Vec<song::Model>, Error> {
        let linked: HashSet<i32> = self
            .songs_in_playlist(playlist)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let mut songs = self.songs().await?;
        songs.retain(|s| !linked.contains(&s.id));
        Ok(songs)
    }

    /// Inserts one membership row. A pair that already exists, or an id that
    /// does not resolve, comes back as [`Error::Constraint`].
    pub async fn add_song_to_playlist(&self, playlist_id: i32, song_id: i32) -> Result<(), Error> {
        let membership = playlist_song::ActiveModel {
            playlist_id: AV::Set(playlist_id),
            song_id: AV::Set(song_id),
        };
        playlist_song::Entity::insert(membership)
            .exec_without_returning(&self.connection)
            .await
            .map_err(|err| {
                let err = Error::from_write(err);
                if let Error::Constraint(msg) = &err {
                    warn!("song {song_id} not added to playlist {playlist_id}: {msg}");
                }
                err
            })?;
        debug!("song {song_id} added to playlist {playlist_id}");
        Ok(())
    }
}
