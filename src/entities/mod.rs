//! sea-orm entities for the catalog schema.
//!
//! Books relate to authors and genres through the `book_authors` and
//! `book_genres` join tables; deleting either side cascades to the join rows.

pub mod author;
pub mod book;
pub mod book_author;
pub mod book_genre;
pub mod genre;
pub mod user;

pub mod prelude {
    pub use super::author::Entity as Author;
    pub use super::book::Entity as Book;
    pub use super::book_author::Entity as BookAuthor;
    pub use super::book_genre::Entity as BookGenre;
    pub use super::genre::Entity as Genre;
    pub use super::user::Entity as User;
}
