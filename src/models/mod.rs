//! Request and response schemas of the HTTP API.
//!
//! Responses are built from sea-orm models through `From`; create payloads
//! convert into active models and update payloads merge into them.

pub mod author;
pub mod book;
pub mod genre;
pub mod user;

pub use author::{Author, AuthorCreate, AuthorUpdate};
pub use book::{Book, BookCreate, BookUpdate};
pub use genre::{Genre, GenreCreate, GenreUpdate};
pub use user::{SignIn, SignUp, Token, User, UserUpdate};
