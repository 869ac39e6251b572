//! Posada Booking Server
//!
//! HTTP backend for hotel room inventory, reservations, and billing.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use posada_api::handlers::{
    configure_auth, configure_bookings, configure_invoices, configure_reviews, configure_rooms,
    configure_site,
};
use posada_api::{MaintenanceGate, SiteStatus};
use posada_auth::{JwtService, PasswordService};
use posada_cache::RedisCache;
use posada_core::models::{User, UserRole};
use posada_core::traits::{Repository, SiteRepository, UserRepository};
use posada_core::AppConfig;
use posada_db::{
    create_pool, PgBookingRepository, PgInvoiceRepository, PgRoomRepository, PgSiteRepository,
    PgUserRepository,
};
use posada_services::{BookingLedger, InvoiceGenerator, RoomCatalog};
use sqlx::PgPool;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "posada-booking",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Auth endpoints
            .configure(configure_auth)
            // Room catalog (public browse + admin management)
            .configure(configure_rooms)
            // Booking lifecycle
            .configure(configure_bookings)
            // Reviews
            .configure(configure_reviews)
            // Invoices (admin only)
            .configure(configure_invoices)
            // Maintenance toggle (admin only)
            .configure(configure_site),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "posada_booking={},posada_api={},posada_services={},posada_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Create the seed administrator when configured and absent
async fn seed_admin(
    pool: &PgPool,
    password_service: &PasswordService,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        config.auth.admin_email.clone(),
        config.auth.admin_password.clone(),
    ) else {
        return Ok(());
    };

    let user_repo = PgUserRepository::new(pool.clone());
    if user_repo.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let admin = User {
        name: "Administrator".to_string(),
        email: email.clone(),
        password_hash: password_service.hash_password(&password)?,
        role: UserRole::Admin,
        ..Default::default()
    };
    user_repo.create(&admin).await?;
    info!("Seeded administrator account {}", email);

    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Posada Booking v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file + POSADA__ env overrides), then honor the
    // conventional flat variables when set
    let mut config = AppConfig::load().expect("Failed to load configuration");
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    }
    if let Ok(url) = env::var("REDIS_URL") {
        config.redis.url = url;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }

    // Create auth services
    let jwt_expiration_secs = config.auth.jwt_expiration_minutes * 60;
    let jwt_service = Arc::new(JwtService::new(&config.auth.jwt_secret, jwt_expiration_secs));
    let password_service = Arc::new(PasswordService::new());

    info!(
        "JWT service configured with {} second token expiration",
        jwt_expiration_secs
    );

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .expect("Failed to create database pool");

    info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // Seed administrator when configured
    seed_admin(&pool, &password_service, &config)
        .await
        .expect("Failed to seed administrator");

    // Cache is optional: without Redis the service runs against the
    // database alone
    let cache = match RedisCache::new(&config.redis.url).await {
        Ok(cache) => {
            info!("Redis cache connected");
            Some(Arc::new(cache))
        }
        Err(e) => {
            warn!("Running without cache: {}", e);
            None
        }
    };

    // Load the persisted maintenance flag into the request-layer handle
    let site_repo = PgSiteRepository::new(pool.clone());
    let setting = site_repo
        .load_or_init()
        .await
        .expect("Failed to load site setting");
    let site_status = SiteStatus::new(setting.is_active);
    if !setting.is_active {
        warn!("Site starts in maintenance mode");
    }

    // Build services
    let ledger = Arc::new(BookingLedger::new(Arc::new(pool.clone()), cache.clone()));
    let catalog = Arc::new(RoomCatalog::new(
        Arc::new(PgRoomRepository::new(pool.clone())),
        cache.clone(),
        config.booking.rooms_cache_ttl_secs,
    ));
    let invoicer = Arc::new(InvoiceGenerator::new(
        Arc::new(PgBookingRepository::new(pool.clone())),
        Arc::new(PgInvoiceRepository::new(pool.clone())),
    ));

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    // Clone state for the closure
    let config_data = config.clone();
    let jwt_service_clone = jwt_service.clone();
    let password_service_clone = password_service.clone();
    let site_status_clone = site_status.clone();

    // Create and run server
    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::COOKIE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            // Add database pool to app data
            .app_data(web::Data::new(pool.clone()))
            // Add configuration
            .app_data(web::Data::new(config_data.clone()))
            // Add auth services
            .app_data(web::Data::new(jwt_service_clone.clone()))
            .app_data(web::Data::new(password_service_clone.clone()))
            // Add business services
            .app_data(web::Data::new(ledger.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(invoicer.clone()))
            // Add the site availability handle
            .app_data(web::Data::new(site_status_clone.clone()))
            // Middleware
            .wrap(MaintenanceGate::new(site_status_clone.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
