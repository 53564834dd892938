//! User repository: lookups backing transfers and authentication.

use monedero_core::ledger::{DisplayInfo, ReceiverProfile};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::users;

/// Errors surfaced by [`UserRepository`].
#[derive(Debug, Error)]
pub enum UserError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Read-side access to user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new repository backed by the given connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds a user by email address (exact match).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }
}

impl From<users::Model> for ReceiverProfile {
    fn from(user: users::Model) -> Self {
        Self {
            user_id: user.id,
            status: user.status.into(),
            name: user.name,
            surname: user.surname,
            email: user.email,
        }
    }
}

/// Builds the display payload recorded on the counterparty's ledger entry.
#[must_use]
pub fn display_info(user: &users::Model) -> DisplayInfo {
    DisplayInfo {
        name: format!("{} {}", user.name, user.surname),
        email: user.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::sea_orm_active_enums::UserStatus;

    fn sample_user() -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            surname: "García".to_string(),
            status: UserStatus::Authorized,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn receiver_profile_carries_identity_and_status() {
        let user = sample_user();
        let id = user.id;
        let profile = ReceiverProfile::from(user);
        assert_eq!(profile.user_id, id);
        assert!(profile.status.can_receive_transfers());
        assert_eq!(profile.email, "ana@example.com");
    }

    #[test]
    fn display_info_joins_name_and_surname() {
        let info = display_info(&sample_user());
        assert_eq!(info.name, "Ana García");
        assert_eq!(info.email, "ana@example.com");
    }
}
