use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, Set, TransactionTrait,
};

use crate::auth::{hash_password_async, verify_password_async};
use crate::core::ensure_unique;
use crate::entities::user;
use crate::errors::{CatalogError, Result};
use crate::models::{SignIn, SignUp, UserUpdate};

pub const EMAIL_TAKEN: &str = "Email already in use";
pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_PASSWORD: &str = "Invalid password";

/// Accounts and credentials.
pub struct UsersCrud<'a, C> {
    db: &'a C,
}

impl<'a, C> UsersCrud<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    async fn find_by_email<T: ConnectionTrait>(db: &T, email: &str) -> Result<user::Model> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?
            .ok_or_else(|| CatalogError::not_found(USER_NOT_FOUND))
    }

    /// Register a reader account.
    #[tracing::instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn sign_up(&self, payload: SignUp) -> Result<user::Model> {
        let hashed_password = hash_password_async(payload.password.clone()).await?;

        let txn = self.db.begin().await?;
        ensure_unique::<user::Entity, _, _>(&txn, user::Column::Email, payload.email.clone(), EMAIL_TAKEN)
            .await?;

        let model = user::ActiveModel {
            id: NotSet,
            email: Set(payload.email),
            name: Set(payload.name),
            surname: Set(payload.surname),
            avatar_link: Set(payload.avatar_link),
            hashed_password: Set(hashed_password),
            access_level: Set(user::READER),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await
        .map_err(|e| CatalogError::from_write(e, EMAIL_TAKEN))?;
        txn.commit().await?;

        tracing::info!(user_id = model.id, "user signed up");
        Ok(model)
    }

    /// Check credentials and return the matching account.
    #[tracing::instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn sign_in(&self, payload: &SignIn) -> Result<user::Model> {
        let user = Self::find_by_email(self.db, &payload.email).await?;
        if !verify_password_async(payload.password.clone(), user.hashed_password.clone()).await? {
            tracing::debug!(user_id = user.id, "password mismatch");
            return Err(CatalogError::unauthorized(INVALID_PASSWORD));
        }
        Ok(user)
    }

    #[tracing::instrument(skip(self, user, payload), fields(user_id = user.id))]
    pub async fn update(&self, user: user::Model, payload: UserUpdate) -> Result<user::Model> {
        let hashed_password = match payload.password.clone() {
            Some(password) => Some(hash_password_async(password).await?),
            None => None,
        };

        let txn = self.db.begin().await?;
        if let Some(email) = payload.email.as_ref().filter(|email| **email != user.email) {
            ensure_unique::<user::Entity, _, _>(&txn, user::Column::Email, email.clone(), EMAIL_TAKEN)
                .await?;
        }

        let mut active = user.into_active_model();
        if let Some(name) = payload.name {
            active.name = Set(name);
        }
        if let Some(surname) = payload.surname {
            active.surname = Set(surname);
        }
        if let Some(email) = payload.email {
            active.email = Set(email);
        }
        if let Some(avatar_link) = payload.avatar_link {
            active.avatar_link = Set(avatar_link);
        }
        if let Some(hashed_password) = hashed_password {
            active.hashed_password = Set(hashed_password);
        }

        let model = active
            .update(&txn)
            .await
            .map_err(|e| CatalogError::from_write(e, EMAIL_TAKEN))?;
        txn.commit().await?;

        tracing::info!(user_id = model.id, "user updated");
        Ok(model)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn delete(&self, user: user::Model) -> Result<()> {
        let txn = self.db.begin().await?;
        user.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!("user deleted");
        Ok(())
    }

    /// Change the access level of the account registered under `email`.
    #[tracing::instrument(skip(self))]
    pub async fn grant(&self, email: &str, access_level: i32) -> Result<user::Model> {
        let txn = self.db.begin().await?;
        let mut active = Self::find_by_email(&txn, email).await?.into_active_model();
        active.access_level = Set(access_level);
        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = model.id, access_level, "access level changed");
        Ok(model)
    }
}
