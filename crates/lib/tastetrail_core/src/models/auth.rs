//! Authentication domain models.
//!
//! `User` is the public shape: it is what every endpoint returns and it has no
//! field for the password hash. The hash only travels inside
//! [`UserWithPassword`], which is never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Diet, normalize_set};

/// Diet, allergies and favourite cuisines of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietaryPreferences {
    pub diet: Diet,
    pub allergies: Vec<String>,
    pub cuisines: Vec<String>,
}

impl DietaryPreferences {
    /// Treat allergies and cuisines as sets: trimmed, no blanks, no duplicates.
    pub fn normalized(self) -> Self {
        Self {
            diet: self.diet,
            allergies: normalize_set(self.allergies),
            cuisines: normalize_set(self.cuisines),
        }
    }
}

/// Domain user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub dietary_preferences: DietaryPreferences,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User with password hash (for internal auth flows).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// Everything a store needs to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub dietary_preferences: Option<DietaryPreferences>,
}

/// JWT claims embedded in session tokens.
///
/// Identity only: authorization bits such as the admin flag are always read
/// fresh from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User email at issuance time.
    pub email: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: "0192a000-0000-7000-8000-000000000001".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            dietary_preferences: DietaryPreferences::default(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_json_uses_camel_case_keys() {
        let json = serde_json::to_value(sample_user()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "createdAt",
                "dietaryPreferences",
                "email",
                "id",
                "isAdmin",
                "name",
                "updatedAt"
            ]
        );
        assert_eq!(json["dietaryPreferences"]["diet"], "none");
    }

    #[test]
    fn preferences_deserialize_with_missing_fields() {
        let prefs: DietaryPreferences = serde_json::from_str(r#"{"diet":"keto"}"#).unwrap();
        assert_eq!(prefs.diet, Diet::Keto);
        assert!(prefs.allergies.is_empty());
        assert!(prefs.cuisines.is_empty());
    }

    #[test]
    fn preferences_normalize_as_sets() {
        let prefs = DietaryPreferences {
            diet: Diet::Vegan,
            allergies: vec!["nuts".into(), "nuts".into(), " ".into()],
            cuisines: vec![" thai".into(), "thai".into(), "italian".into()],
        }
        .normalized();
        assert_eq!(prefs.allergies, vec!["nuts"]);
        assert_eq!(prefs.cuisines, vec!["thai", "italian"]);
    }
}
