use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    Title,
    Description,
    YearOfPublication,
    Isbn,
    Series,
    FileLink,
    Edition,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Authors {
    Table,
    Id,
    Name,
    Surname,
    YearOfBirth,
    Biography,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BookAuthors {
    Table,
    BookId,
    AuthorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BookGenres {
    Table,
    BookId,
    GenreId,
    CreatedAt,
}

fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(id_column(Books::Id))
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Books::YearOfPublication).integer().not_null())
                    .col(ColumnDef::new(Books::Isbn).string_len(13).not_null().unique_key())
                    .col(ColumnDef::new(Books::Series).string().not_null().default(""))
                    .col(ColumnDef::new(Books::FileLink).string().not_null().default(""))
                    .col(ColumnDef::new(Books::Edition).string().not_null().default(""))
                    .col(timestamp_column(Books::CreatedAt))
                    .col(timestamp_column(Books::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Authors::Table)
                    .if_not_exists()
                    .col(id_column(Authors::Id))
                    .col(ColumnDef::new(Authors::Name).string().not_null())
                    .col(ColumnDef::new(Authors::Surname).string().not_null())
                    .col(ColumnDef::new(Authors::YearOfBirth).integer().not_null())
                    .col(ColumnDef::new(Authors::Biography).text().not_null().default(""))
                    .col(timestamp_column(Authors::CreatedAt))
                    .col(timestamp_column(Authors::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(id_column(Genres::Id))
                    .col(ColumnDef::new(Genres::Name).string().not_null())
                    .col(ColumnDef::new(Genres::Description).text().not_null().default(""))
                    .col(timestamp_column(Genres::CreatedAt))
                    .col(timestamp_column(Genres::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookAuthors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BookAuthors::BookId).integer().not_null())
                    .col(ColumnDef::new(BookAuthors::AuthorId).integer().not_null())
                    .col(timestamp_column(BookAuthors::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(BookAuthors::BookId)
                            .col(BookAuthors::AuthorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_authors_book_id")
                            .from(BookAuthors::Table, BookAuthors::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_authors_author_id")
                            .from(BookAuthors::Table, BookAuthors::AuthorId)
                            .to(Authors::Table, Authors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BookGenres::BookId).integer().not_null())
                    .col(ColumnDef::new(BookGenres::GenreId).integer().not_null())
                    .col(timestamp_column(BookGenres::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(BookGenres::BookId)
                            .col(BookGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_genres_book_id")
                            .from(BookGenres::Table, BookGenres::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_genres_genre_id")
                            .from(BookGenres::Table, BookGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookGenres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookAuthors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Authors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        Ok(())
    }
}
