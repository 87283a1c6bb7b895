use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_core::models::User;

fn default_true() -> bool {
    true
}

/// Request payload for creating a user (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Request payload for open registration.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Request payload for an admin updating any user; all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Request payload for a user updating their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateMe {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request payload for a user changing their own password.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePassword {
    pub current_password: String,
    pub new_password: String,
}

/// User fields safe to return via the API; never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            full_name: user.full_name,
        }
    }
}

/// A page of users with its count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: usize,
}

impl UsersPublic {
    pub fn from_users(users: Vec<User>) -> Self {
        let data: Vec<UserPublic> = users.into_iter().map(UserPublic::from).collect();
        let count = data.len();
        Self { data, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_public_drops_the_hash() {
        let user = User::new("alice@example.com", "$argon2id$secret").with_full_name("Alice");
        let public = UserPublic::from(user.clone());
        let json = serde_json::to_string(&public).unwrap();

        assert!(!json.contains("argon2"));
        assert!(!json.contains("hashed_password"));
        assert_eq!(public.id, user.id);
        assert_eq!(public.email, "alice@example.com");
    }

    #[test]
    fn user_create_defaults_to_active_non_superuser() {
        let payload: UserCreate =
            serde_json::from_str(r#"{"email": "a@x.com", "password": "changethis"}"#).unwrap();
        assert!(payload.is_active);
        assert!(!payload.is_superuser);
        assert!(payload.full_name.is_none());
    }
}
