use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Playlists::Table)
                    .if_not_exists()
                    .col(pk_auto(Playlists::Id))
                    .col(string_len(Playlists::Name, 100))
                    .col(string_len_null(Playlists::Description, 255))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Songs::Table)
                    .if_not_exists()
                    .col(pk_auto(Songs::Id))
                    .col(string_len(Songs::Title, 100))
                    .col(string_len(Songs::Artist, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistSong::Table)
                    .if_not_exists()
                    .col(integer(PlaylistSong::PlaylistId))
                    .col(integer(PlaylistSong::SongId))
                    .primary_key(
                        Index::create()
                            .col(PlaylistSong::PlaylistId)
                            .col(PlaylistSong::SongId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PlaylistSong::Table, PlaylistSong::PlaylistId)
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PlaylistSong::Table, PlaylistSong::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // join table first, it references the other two
        manager
            .drop_table(Table::drop().table(PlaylistSong::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Songs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Playlists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Playlists {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Songs {
    Table,
    Id,
    Title,
    Artist,
}

#[derive(DeriveIden)]
enum PlaylistSong {
    Table,
    PlaylistId,
    SongId,
}
