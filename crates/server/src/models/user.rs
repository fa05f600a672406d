//! User model.

use bigear_core::{Email, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An account holder.
///
/// The password hash is intentionally not part of this struct; the few code
/// paths that verify or replace it fetch the hash separately so it can never
/// leak through serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Internal identifier.
    pub id: UserId,
    /// Stable external identifier; normalized lowercase.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last modified.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_without_hash() {
        let user = User {
            id: UserId::new(1),
            email: Email::parse("jane@example.com").unwrap(),
            name: "Jane".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "jane@example.com");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
