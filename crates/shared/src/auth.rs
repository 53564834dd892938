//! Authentication types: JWT claims and the explicit caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Onboarding status of the user at token issue time.
    pub status: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, status: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            status: status.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Authenticated caller identity, passed explicitly into every operation
/// that acts on behalf of a user. There is no ambient request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The authenticated user's ID.
    pub user_id: Uuid,
}

impl CallerIdentity {
    /// Creates a caller identity for a user.
    #[must_use]
    pub const fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

impl From<&Claims> for CallerIdentity {
    fn from(claims: &Claims) -> Self {
        Self::new(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_carry_user_and_status() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "authorized", Utc::now() + Duration::minutes(15));
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.status, "authorized");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_caller_identity_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "protected", Utc::now());
        let caller = CallerIdentity::from(&claims);
        assert_eq!(caller.user_id, user_id);
    }
}
