//! Invoice handlers
//!
//! Admin-only endpoints for generating and fetching invoices.

use crate::dto::invoice::InvoiceResponse;
use crate::dto::ApiResponse;
use crate::handlers::Invoicer;
use actix_web::{web, HttpResponse};
use posada_auth::AdminUser;
use posada_core::AppError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Generate the invoice for a booking (admin only)
///
/// POST /api/v1/admin/invoices/{booking_id}
#[instrument(skip(invoicer, admin))]
pub async fn generate_invoice(
    invoicer: web::Data<Arc<Invoicer>>,
    admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();

    debug!(booking_id, admin = %admin.email, "Generating invoice");

    let invoice = invoicer.generate_invoice(booking_id).await?;

    info!(
        invoice_id = invoice.id,
        booking_id,
        admin = %admin.email,
        "Invoice generated"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        InvoiceResponse::from(invoice),
        "Invoice generated",
    )))
}

/// Fetch the invoice for a booking (admin only)
///
/// GET /api/v1/admin/invoices/{booking_id}
#[instrument(skip(invoicer, _admin))]
pub async fn get_invoice(
    invoicer: web::Data<Arc<Invoicer>>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();

    debug!(booking_id, "Fetching invoice");

    let invoice = invoicer.invoice_for_booking(booking_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(InvoiceResponse::from(invoice))))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/invoices")
            .route("/{booking_id}", web::post().to(generate_invoice))
            .route("/{booking_id}", web::get().to(get_invoice)),
    );
}
