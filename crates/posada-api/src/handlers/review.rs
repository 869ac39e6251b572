//! Review handlers
//!
//! Guests leave reviews; admins list them.

use crate::dto::review::{CreateReviewRequest, ReviewResponse};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use posada_auth::{AdminUser, AuthenticatedUser};
use posada_core::models::Review;
use posada_core::traits::Repository;
use posada_core::AppError;
use posada_db::PgReviewRepository;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Leave a review
///
/// POST /api/v1/reviews
#[instrument(skip(pool, user, req))]
pub async fn create_review(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate request
    req.validate().map_err(|e| {
        warn!("Create review validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        user_id = user.user_id,
        room_id = req.room_id,
        "Creating review"
    );

    let review = Review {
        id: 0, // Will be set by database
        user_id: user.user_id,
        room_id: req.room_id,
        rating: req.rating,
        comment: req.comment.clone(),
        created_at: Utc::now(),
    };

    let review_repo = PgReviewRepository::new(pool.get_ref().clone());
    let created = review_repo.create(&review).await?;

    info!(review_id = created.id, user_id = user.user_id, "Review created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        ReviewResponse::from(created),
        "Review added",
    )))
}

/// List all reviews (admin only)
///
/// GET /api/v1/admin/reviews
#[instrument(skip(pool, _admin))]
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    debug!("Listing reviews page {}", query.page);

    let review_repo = PgReviewRepository::new(pool.get_ref().clone());
    let reviews = review_repo.find_all(query.limit(), query.offset()).await?;
    let total = review_repo.count().await?;

    let reviews: Vec<ReviewResponse> = reviews.into_iter().map(Into::into).collect();
    let response = query.paginate(reviews, total);

    Ok(HttpResponse::Ok().json(response))
}

/// Configure review routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reviews", web::post().to(create_review))
        .route("/admin/reviews", web::get().to(list_reviews));
}
