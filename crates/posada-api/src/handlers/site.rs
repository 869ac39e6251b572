//! Site availability handlers
//!
//! Admin toggles for maintenance mode. Each toggle persists the setting and
//! flips the in-memory handle the maintenance gate watches.

use crate::dto::ApiResponse;
use crate::middleware::SiteStatus;
use actix_web::{web, HttpResponse};
use posada_auth::AdminUser;
use posada_core::traits::SiteRepository;
use posada_core::AppError;
use posada_db::PgSiteRepository;
use sqlx::PgPool;
use tracing::{info, instrument};

/// Switch the site off
///
/// POST /api/v1/admin/site/shutdown
#[instrument(skip(pool, status, admin))]
pub async fn shutdown(
    pool: web::Data<PgPool>,
    status: web::Data<SiteStatus>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let site_repo = PgSiteRepository::new(pool.get_ref().clone());
    let setting = site_repo.set_active(false).await?;
    status.set_active(false);

    info!(admin = %admin.email, "Site switched off");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(setting, "Website shutdown")))
}

/// Switch the site back on
///
/// POST /api/v1/admin/site/start
#[instrument(skip(pool, status, admin))]
pub async fn start(
    pool: web::Data<PgPool>,
    status: web::Data<SiteStatus>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let site_repo = PgSiteRepository::new(pool.get_ref().clone());
    let setting = site_repo.set_active(true).await?;
    status.set_active(true);

    info!(admin = %admin.email, "Site switched on");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(setting, "Website started")))
}

/// Configure site routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/site")
            .route("/shutdown", web::post().to(shutdown))
            .route("/start", web::post().to(start)),
    );
}
