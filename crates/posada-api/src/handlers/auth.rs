//! Authentication handlers
//!
//! HTTP handlers for registration, login, and the current-user endpoint.

use crate::dto::auth::{LoginRequest, LoginResponse, MeResponse, RegisterRequest};
use crate::dto::ApiResponse;
use actix_web::{cookie::Cookie, web, HttpResponse};
use posada_auth::{AuthenticatedUser, JwtService, PasswordService};
use posada_core::models::{User, UserInfo, UserRole};
use posada_core::traits::{Repository, UserRepository};
use posada_core::AppError;
use posada_db::PgUserRepository;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

/// Register a new guest account
///
/// POST /api/v1/auth/register
#[instrument(skip(pool, password_service, req))]
pub async fn register(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate request
    req.validate().map_err(|e| {
        warn!("Register validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(email = %req.email, "Processing registration request");

    // Hash password
    let password_hash = password_service.hash_password(&req.password)?;

    // Registration always produces a guest; admins are seeded at startup
    let new_user = User {
        id: 0, // Will be set by database
        name: req.name.clone(),
        email: req.email.trim().to_lowercase(),
        password_hash,
        role: UserRole::Guest,
        banned: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let created_user = user_repo.create(&new_user).await?;

    info!(
        email = %created_user.email,
        id = %created_user.id,
        "User registered successfully"
    );

    let user_info = UserInfo::from(&created_user);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        user_info,
        "User registered successfully",
    )))
}

/// Login endpoint
///
/// POST /api/v1/auth/login
#[instrument(skip(pool, jwt_service, password_service, req))]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_service: web::Data<Arc<JwtService>>,
    password_service: web::Data<Arc<PasswordService>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate request
    req.validate().map_err(|e| {
        warn!("Login validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let email = req.email.trim().to_lowercase();
    let password = &req.password;

    debug!(email = %email, "Processing login request");

    // Find user in database
    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let user = user_repo.find_by_email(&email).await?.ok_or_else(|| {
        info!(email = %email, "Login failed: user not found");
        AppError::InvalidCredentials
    })?;

    // Banned users get a distinct, stable signal
    if !user.can_login() {
        warn!(email = %email, "Login failed: user is banned");
        return Err(AppError::UserBanned(email));
    }

    // Verify password
    let password_valid = password_service
        .verify_password(password, &user.password_hash)
        .map_err(|e| {
            error!("Password verification error: {}", e);
            AppError::Internal("Password verification failed".to_string())
        })?;

    if !password_valid {
        info!(email = %email, "Login failed: invalid password");
        return Err(AppError::InvalidCredentials);
    }

    // Generate JWT token
    let token = jwt_service.create_token_for_user(&user.email, user.id, user.role)?;
    let expires_in = jwt_service.expiration_secs();

    info!(email = %email, role = ?user.role, "Login successful");

    // Create response
    let user_info = UserInfo::from(&user);
    let response = LoginResponse::new(token.clone(), expires_in, user_info);

    // Set cookie with token
    let cookie = Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(actix_web::cookie::time::Duration::seconds(expires_in))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response)))
}

/// Get current user info
///
/// GET /api/v1/auth/me
#[instrument(skip(pool, user))]
pub async fn me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!(email = %user.email, "Getting current user info");

    // Get fresh user data from database
    let user_repo = PgUserRepository::new(pool.get_ref().clone());
    let db_user = user_repo
        .find_by_email(&user.email)
        .await?
        .ok_or_else(|| AppError::UserNotFound(user.email.clone()))?;

    let user_info = UserInfo::from(&db_user);
    let token_expires_at = Utc
        .timestamp_opt(user.claims.exp, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let response = MeResponse {
        user: user_info,
        token_expires_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid_req = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
        };
        assert!(valid_req.validate().is_ok());

        let invalid_req = LoginRequest {
            email: "".to_string(),
            password: "".to_string(),
        };
        assert!(invalid_req.validate().is_err());
    }
}
