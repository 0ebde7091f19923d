use sea_orm::DatabaseConnection;

use crate::auth::JwtManager;

/// Shared handler state: the connection pool and the token signer.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: JwtManager,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt: JwtManager) -> Self {
        Self { db, jwt }
    }
}
