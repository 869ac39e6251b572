//! End-to-end booking flow against a live database.
//!
//! Run with a migrated database:
//!
//! ```sh
//! DATABASE_URL=postgresql://localhost/posada_booking cargo test -- --ignored
//! ```

use chrono::NaiveDate;
use posada_core::models::BookingStatus;
use posada_core::traits::{Repository, RoomRepository};
use posada_core::AppError;
use posada_db::{create_pool, PgBookingRepository, PgInvoiceRepository, PgRoomRepository};
use posada_services::{BookingLedger, InvoiceGenerator};
use rust_decimal_macros::dec;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

async fn test_pool() -> Arc<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/posada_booking".to_string());
    Arc::new(create_pool(&database_url, Some(5)).await.unwrap())
}

async fn insert_user(pool: &PgPool, email: &str) -> i32 {
    let row: (i32,) = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, role, banned) \
         VALUES ('Guest', $1, 'x', 'guest', FALSE) RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap();
    row.0
}

#[tokio::test]
#[ignore] // Requires database
async fn booking_lifecycle_scenario() {
    let pool = test_pool().await;
    let suffix = unique_suffix();

    let room_repo = Arc::new(PgRoomRepository::new((*pool).clone()));
    let booking_repo = Arc::new(PgBookingRepository::new((*pool).clone()));
    let invoice_repo = Arc::new(PgInvoiceRepository::new((*pool).clone()));
    let ledger = BookingLedger::new(pool.clone(), None);
    let invoicer = InvoiceGenerator::new(booking_repo.clone(), invoice_repo.clone());

    // Room 101 is created and starts available
    let room_number = format!("101-{}", suffix);
    let room = room_repo
        .create(&posada_core::models::Room {
            room_number: room_number.clone(),
            price: dec!(100.00),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(room.is_available);

    let listed = room_repo.list_available().await.unwrap();
    assert!(listed.iter().any(|r| r.id == room.id));

    let guest = insert_user(&pool, &format!("guest-{}@test.local", suffix)).await;
    let rival = insert_user(&pool, &format!("rival-{}@test.local", suffix)).await;

    // Degenerate stay is rejected up front
    let empty_stay = ledger
        .create_booking(guest, room.id, date(2024, 6, 1), date(2024, 6, 1))
        .await;
    assert!(matches!(empty_stay, Err(AppError::Validation(_))));

    // First booking wins the room
    let booking = ledger
        .create_booking(guest, room.id, date(2024, 6, 1), date(2024, 6, 3))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Booked);
    assert_eq!(booking.nightly_rate, dec!(100.00));

    let room_now = room_repo.find_by_id(room.id).await.unwrap().unwrap();
    assert!(!room_now.is_available);

    // The availability listing no longer shows the room
    let listed = room_repo.list_available().await.unwrap();
    assert!(!listed.iter().any(|r| r.id == room.id));

    // A second guest hits the conflict
    let denied = ledger
        .create_booking(rival, room.id, date(2024, 6, 5), date(2024, 6, 7))
        .await;
    assert!(matches!(denied, Err(AppError::RoomUnavailable(_))));

    // A missing room is a distinct failure
    let missing = ledger
        .create_booking(guest, -1, date(2024, 6, 1), date(2024, 6, 3))
        .await;
    assert!(matches!(missing, Err(AppError::RoomNotFound(_))));

    // Invoicing bills the rate snapshot and is guarded against repeats
    let invoice = invoicer.generate_invoice(booking.id).await.unwrap();
    assert_eq!(invoice.amount, dec!(100.00));
    assert_eq!(invoice.status.to_string(), "paid");

    let repeat = invoicer.generate_invoice(booking.id).await;
    assert!(matches!(repeat, Err(AppError::InvoiceExists(_))));

    let fetched = invoicer.invoice_for_booking(booking.id).await.unwrap();
    assert_eq!(fetched.id, invoice.id);

    // Cancelling restores availability
    let cancelled = ledger.cancel_booking(booking.id, guest, false).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let room_after = room_repo.find_by_id(room.id).await.unwrap().unwrap();
    assert!(room_after.is_available);

    // A second cancellation conflicts instead of silently succeeding
    let twice = ledger.cancel_booking(booking.id, guest, false).await;
    assert!(matches!(twice, Err(AppError::BookingAlreadyCancelled(_))));

    // An unknown booking is a distinct failure
    let unknown = ledger.cancel_booking(-1, guest, false).await;
    assert!(matches!(unknown, Err(AppError::BookingNotFound(_))));
}

#[tokio::test]
#[ignore] // Requires database
async fn concurrent_bookings_serialize_per_room() {
    let pool = test_pool().await;
    let suffix = unique_suffix();

    let room_repo = Arc::new(PgRoomRepository::new((*pool).clone()));
    let ledger = Arc::new(BookingLedger::new(pool.clone(), None));

    let room = room_repo
        .create(&posada_core::models::Room {
            room_number: format!("202-{}", suffix),
            price: dec!(80.00),
            ..Default::default()
        })
        .await
        .unwrap();
    let other_room = room_repo
        .create(&posada_core::models::Room {
            room_number: format!("203-{}", suffix),
            price: dec!(80.00),
            ..Default::default()
        })
        .await
        .unwrap();

    let guest = insert_user(&pool, &format!("racer-{}@test.local", suffix)).await;

    // N concurrent attempts on one room: exactly one winner, the rest
    // conflict. An attempt on a different room is unaffected.
    let mut handles = Vec::new();
    for _ in 0..10 {
        let ledger = ledger.clone();
        let room_id = room.id;
        handles.push(tokio::spawn(async move {
            ledger
                .create_booking(guest, room_id, date(2024, 6, 1), date(2024, 6, 2))
                .await
        }));
    }
    let other = ledger
        .create_booking(guest, other_room.id, date(2024, 6, 1), date(2024, 6, 2))
        .await;
    assert!(other.is_ok());

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(AppError::RoomUnavailable(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(conflicts, 9);

    let room_after = room_repo.find_by_id(room.id).await.unwrap().unwrap();
    assert!(!room_after.is_available);
}
