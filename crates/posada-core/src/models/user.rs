//! User model
//!
//! Represents guests and administrators for authentication and authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Guest who can browse rooms, book, and review
    #[default]
    Guest,
    /// Administrator managing the catalog, invoices, and site availability
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Guest => write!(f, "guest"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl UserRole {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(UserRole::Guest),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Check if role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User entity
///
/// Represents a registered user for authentication and authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i32,

    /// Display name
    pub name: String,

    /// Email address (unique, used for login)
    pub email: String,

    /// Password hash (never expose in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// User role
    pub role: UserRole,

    /// Whether the user is banned from the service
    pub banned: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user can perform admin actions
    pub fn can_admin(&self) -> bool {
        !self.banned && self.role.is_admin()
    }

    /// Check if user is allowed to log in
    pub fn can_login(&self) -> bool {
        !self.banned
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            role: UserRole::Guest,
            banned: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User info for API responses (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub banned: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            banned: user.banned,
        }
    }
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            banned: user.banned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(!UserRole::Guest.is_admin());
        assert!(UserRole::Admin.is_admin());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("guest"), Some(UserRole::Guest));
        assert_eq!(UserRole::from_str("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("manager"), None);
    }

    #[test]
    fn test_banned_user_cannot_login() {
        let user = User {
            banned: true,
            ..Default::default()
        };
        assert!(!user.can_login());

        let active = User::default();
        assert!(active.can_login());
    }

    #[test]
    fn test_banned_admin_loses_admin_rights() {
        let admin = User {
            role: UserRole::Admin,
            banned: true,
            ..Default::default()
        };
        assert!(!admin.can_admin());
    }

    #[test]
    fn test_user_info_hides_password_hash() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            ..Default::default()
        };
        let info = UserInfo::from(&user);
        assert_eq!(info.id, 7);
        assert_eq!(info.email, "ana@example.com");
        assert_eq!(info.role, "guest");
    }
}
