//! Booking handlers
//!
//! HTTP handlers for the booking lifecycle. The state transitions run in the
//! booking ledger; handlers only authenticate, validate the payload shape,
//! and translate results.

use crate::dto::booking::{BookingResponse, CreateBookingRequest};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use posada_auth::AuthenticatedUser;
use posada_core::traits::BookingRepository;
use posada_core::{AppConfig, AppError};
use posada_db::PgBookingRepository;
use posada_services::BookingLedger;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Create a booking for the authenticated user
///
/// POST /api/v1/bookings
#[instrument(skip(ledger, config, user, req))]
pub async fn create_booking(
    ledger: web::Data<Arc<BookingLedger>>,
    config: web::Data<AppConfig>,
    user: AuthenticatedUser,
    req: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate request shape
    req.validate().map_err(|e| {
        warn!("Create booking validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    // Boundary limit on stay length; date ordering is the ledger's check
    let nights = (req.check_out - req.check_in).num_days();
    if nights > config.booking.max_stay_nights {
        return Err(AppError::Validation(format!(
            "Stay of {} nights exceeds the maximum of {}",
            nights, config.booking.max_stay_nights
        )));
    }

    debug!(
        user_id = user.user_id,
        room_id = req.room_id,
        "Processing booking request"
    );

    let booking = ledger
        .create_booking(user.user_id, req.room_id, req.check_in, req.check_out)
        .await?;

    info!(
        booking_id = booking.id,
        user_id = user.user_id,
        room_id = booking.room_id,
        "Booking created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        BookingResponse::from(booking),
        "Room booked successfully",
    )))
}

/// List the authenticated user's bookings
///
/// GET /api/v1/bookings
#[instrument(skip(pool, user))]
pub async fn list_my_bookings(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!(user_id = user.user_id, "Listing bookings");

    let booking_repo = PgBookingRepository::new(pool.get_ref().clone());
    let bookings = booking_repo.find_by_user(user.user_id).await?;
    let bookings: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(bookings)))
}

/// Cancel a booking
///
/// POST /api/v1/bookings/{id}/cancel
///
/// Guests may cancel their own bookings; admins may cancel any.
#[instrument(skip(ledger, user))]
pub async fn cancel_booking(
    ledger: web::Data<Arc<BookingLedger>>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();

    debug!(
        booking_id,
        user_id = user.user_id,
        "Processing cancellation request"
    );

    let booking = ledger
        .cancel_booking(booking_id, user.user_id, user.is_admin())
        .await?;

    info!(booking_id, "Booking cancelled");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        BookingResponse::from(booking),
        "Booking cancelled",
    )))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_my_bookings))
            .route("/{id}/cancel", web::post().to(cancel_booking)),
    );
}
