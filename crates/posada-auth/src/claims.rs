//! JWT Claims structure
//!
//! Defines the claims structure used in JWT tokens for authentication.

use posada_core::models::UserRole;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// JWT Claims
///
/// Standard claims used in JWT tokens for user authentication. The subject
/// is the user's email; `uid` carries the database id so booking handlers
/// don't need an extra lookup to attribute the reservation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// User database id
    pub uid: i32,

    /// User role
    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims with the specified email, user id, and role
    ///
    /// # Examples
    ///
    /// ```
    /// use posada_auth::Claims;
    /// use posada_core::models::UserRole;
    ///
    /// let claims = Claims::new("ana@example.com", 1, UserRole::Guest);
    /// assert_eq!(claims.sub, "ana@example.com");
    /// assert_eq!(claims.role, UserRole::Guest);
    /// ```
    pub fn new(email: &str, user_id: i32, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            sub: email.to_string(),
            uid: user_id,
            role,
            iat: now.timestamp(),
            exp: 0, // Will be set by JwtService
        }
    }

    /// Create new claims with custom expiration duration
    pub fn with_expiration(
        email: &str,
        user_id: i32,
        role: UserRole,
        expires_in_secs: i64,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_secs);

        Self {
            sub: email.to_string(),
            uid: user_id,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        self.exp <= now
    }

    /// Get the email from the claims
    pub fn email(&self) -> &str {
        &self.sub
    }

    /// Get the user database id
    pub fn user_id(&self) -> i32 {
        self.uid
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("guest@example.com", 3, UserRole::Guest);
        assert_eq!(claims.sub, "guest@example.com");
        assert_eq!(claims.uid, 3);
        assert_eq!(claims.role, UserRole::Guest);
        assert!(claims.iat > 0);
    }

    #[test]
    fn test_claims_with_expiration() {
        let claims = Claims::with_expiration("admin@example.com", 1, UserRole::Admin, 3600);
        assert!(!claims.is_expired());

        let now = Utc::now().timestamp();
        assert!(claims.exp > now);
        assert!(claims.exp <= now + 3600);
    }

    #[test]
    fn test_expired_claims() {
        let mut claims = Claims::new("guest@example.com", 3, UserRole::Guest);
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_role_checks() {
        let guest_claims = Claims::new("guest@example.com", 3, UserRole::Guest);
        assert!(!guest_claims.is_admin());

        let admin_claims = Claims::new("admin@example.com", 1, UserRole::Admin);
        assert!(admin_claims.is_admin());
    }
}
