//! Room catalog handlers
//!
//! Public browsing of available rooms and admin catalog management.

use crate::dto::room::{
    AddFeatureRequest, AddServiceRequest, CreateRoomRequest, RoomDetailResponse, RoomResponse,
};
use crate::dto::ApiResponse;
use crate::handlers::Catalog;
use actix_web::{web, HttpResponse};
use posada_auth::AdminUser;
use posada_core::AppError;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List rooms currently accepting bookings
///
/// GET /api/v1/rooms
#[instrument(skip(catalog))]
pub async fn list_rooms(catalog: web::Data<Arc<Catalog>>) -> Result<HttpResponse, AppError> {
    debug!("Listing available rooms");

    let rooms = catalog.list_available().await?;
    let rooms: Vec<RoomResponse> = rooms.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(rooms)))
}

/// Get a room with its features and services
///
/// GET /api/v1/rooms/{id}
#[instrument(skip(catalog))]
pub async fn get_room(
    catalog: web::Data<Arc<Catalog>>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    debug!("Getting room {}", room_id);

    let room = catalog
        .find_room(room_id)
        .await?
        .ok_or_else(|| AppError::RoomNotFound(room_id.to_string()))?;

    let features = catalog.features_of(room_id).await?;
    let services = catalog.services_of(room_id).await?;

    let response = RoomDetailResponse::new(room, features, services);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Create a room (admin only)
///
/// POST /api/v1/admin/rooms
#[instrument(skip(catalog, admin, req))]
pub async fn create_room(
    catalog: web::Data<Arc<Catalog>>,
    admin: AdminUser,
    req: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate request
    req.validate().map_err(|e| {
        warn!("Create room validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        room_number = %req.room_number,
        admin = %admin.email,
        "Creating room"
    );

    let room = catalog.add_room(&req.room_number, req.price).await?;

    info!(
        room_number = %room.room_number,
        id = %room.id,
        admin = %admin.email,
        "Room created successfully"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        RoomResponse::from(room),
        "Room created successfully",
    )))
}

/// Attach a feature to a room (admin only)
///
/// POST /api/v1/admin/rooms/{id}/features
#[instrument(skip(catalog, admin, req))]
pub async fn add_feature(
    catalog: web::Data<Arc<Catalog>>,
    admin: AdminUser,
    path: web::Path<i32>,
    req: web::Json<AddFeatureRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let room_id = path.into_inner();
    debug!(room_id, admin = %admin.email, "Adding feature");

    let feature = catalog.add_feature(room_id, &req.feature).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(feature, "Feature added")))
}

/// Attach a service to a room (admin only)
///
/// POST /api/v1/admin/rooms/{id}/services
#[instrument(skip(catalog, admin, req))]
pub async fn add_service(
    catalog: web::Data<Arc<Catalog>>,
    admin: AdminUser,
    path: web::Path<i32>,
    req: web::Json<AddServiceRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let room_id = path.into_inner();
    debug!(room_id, admin = %admin.email, "Adding service");

    let service = catalog.add_service(room_id, &req.service).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(service, "Service added")))
}

/// Configure room routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .route("", web::get().to(list_rooms))
            .route("/{id}", web::get().to(get_room)),
    )
    .service(
        web::scope("/admin/rooms")
            .route("", web::post().to(create_room))
            .route("/{id}/features", web::post().to(add_feature))
            .route("/{id}/services", web::post().to(add_service)),
    );
}
