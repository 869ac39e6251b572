//! Maintenance gate middleware
//!
//! Rejects requests with 503 while the site is switched off. The flag is an
//! explicit [`SiteStatus`] handle created at startup from the persisted site
//! setting and passed into the gate; admin endpoints flip both the database
//! row and this handle.
//!
//! Health, login, and the site toggles themselves stay reachable so an
//! administrator can bring the site back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::{ready, LocalBoxFuture, Ready};
use posada_core::AppError;
use tracing::warn;

/// Shared site availability flag
///
/// Cheap to clone; all clones observe the same flag.
#[derive(Debug, Clone)]
pub struct SiteStatus(Arc<AtomicBool>);

impl SiteStatus {
    /// Create a new handle with the given initial state
    pub fn new(is_active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(is_active)))
    }

    /// Whether the site currently accepts requests
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Flip the flag
    pub fn set_active(&self, is_active: bool) {
        self.0.store(is_active, Ordering::Relaxed);
    }
}

/// Paths that bypass the gate
fn is_exempt(path: &str) -> bool {
    path == "/api/v1/health"
        || path == "/api/v1/auth/login"
        || path.starts_with("/api/v1/admin/site")
}

/// Maintenance gate
///
/// Wrap the app with this transform to serve 503 on every non-exempt route
/// while the site is inactive.
#[derive(Clone)]
pub struct MaintenanceGate {
    status: SiteStatus,
}

impl MaintenanceGate {
    /// Create a gate watching the given status handle
    pub fn new(status: SiteStatus) -> Self {
        Self { status }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MaintenanceGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MaintenanceGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MaintenanceGateMiddleware {
            service,
            status: self.status.clone(),
        }))
    }
}

/// Service wrapper produced by [`MaintenanceGate`]
pub struct MaintenanceGateMiddleware<S> {
    service: S,
    status: SiteStatus,
}

impl<S, B> Service<ServiceRequest> for MaintenanceGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.status.is_active() && !is_exempt(req.path()) {
            warn!(path = %req.path(), "Request rejected: site under maintenance");
            return Box::pin(ready(Err(AppError::Maintenance.into())));
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_status_flips() {
        let status = SiteStatus::new(true);
        assert!(status.is_active());

        let clone = status.clone();
        clone.set_active(false);
        assert!(!status.is_active());

        status.set_active(true);
        assert!(clone.is_active());
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/api/v1/health"));
        assert!(is_exempt("/api/v1/auth/login"));
        assert!(is_exempt("/api/v1/admin/site/start"));
        assert!(!is_exempt("/api/v1/rooms"));
        assert!(!is_exempt("/api/v1/bookings"));
    }
}
