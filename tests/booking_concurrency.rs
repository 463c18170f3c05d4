//! Database-backed tests for the transactional booking paths.
//!
//! These drive `create_checked` and `reschedule_checked` through the
//! barber-row lock against a real PostgreSQL instance. They need a migrated
//! database: set `DATABASE_URL` and run `cargo test -- --ignored`.

use std::env;

use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use shearbook::config::DatabaseConfig;
use shearbook::db::establish_async_connection_pool;
use shearbook::error::AppError;
use shearbook::models::{
    BookingStatus, NewBarber, NewBooking, NewService, NewUser, UserRole,
};
use shearbook::repositories::{
    Actor, BarberRepository, BookingRepository, ServiceRepository, UserRepository,
};
use shearbook::services::generate_booking_number;

struct Fixture {
    bookings: BookingRepository,
    barber_id: i32,
    service_id: i32,
}

/// Creates a fresh user/barber/service triple so tests never contend on each
/// other's slots. Rows are left behind; point DATABASE_URL at a throwaway
/// database.
async fn fixture() -> Fixture {
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let config = DatabaseConfig {
        url,
        max_connections: 10,
        min_connections: 1,
        connection_timeout: 5,
    };
    let pool = establish_async_connection_pool(&config)
        .await
        .expect("connect to test database");

    let tag = Uuid::new_v4().simple().to_string();

    let users = UserRepository::new(pool.clone());
    let owner = users
        .create(NewUser {
            username: format!("conc_{tag}"),
            email: format!("conc_{tag}@example.com"),
            password: "$argon2id$placeholder".to_string(),
            role: UserRole::Customer,
            phone: None,
        })
        .await
        .expect("create fixture user");

    // Promote the account the way the admin role endpoint does.
    let owner = users
        .set_role(owner.id, UserRole::Barber)
        .await
        .expect("promote fixture user");
    assert_eq!(owner.role, UserRole::Barber);

    let barber = BarberRepository::new(pool.clone())
        .create(NewBarber {
            user_id: owner.id,
            display_name: format!("Concurrent {tag}"),
            bio: None,
            address: None,
            latitude: None,
            longitude: None,
            active: true,
        })
        .await
        .expect("create fixture barber");

    let service = ServiceRepository::new(pool.clone())
        .create(NewService {
            category_id: None,
            name: format!("Cut {tag}"),
            description: None,
            duration_minutes: 45,
            price: BigDecimal::from(30),
            active: true,
        })
        .await
        .expect("create fixture service");

    Fixture {
        bookings: BookingRepository::new(pool),
        barber_id: barber.id,
        service_id: service.id,
    }
}

fn slot_booking(f: &Fixture, start: NaiveDateTime, minutes: i64, name: &str) -> NewBooking {
    NewBooking {
        booking_number: generate_booking_number(Utc::now().naive_utc()),
        barber_id: f.barber_id,
        service_id: f.service_id,
        customer_id: None,
        customer_name: name.to_string(),
        customer_phone: "5550100".to_string(),
        customer_email: None,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        duration_minutes: minutes as i32,
        status: BookingStatus::Pending,
        price: BigDecimal::from(30),
        notes: None,
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a migrated database"]
async fn only_one_of_concurrent_conflicting_creates_succeeds() {
    let f = fixture().await;
    let start = (Utc::now() + Duration::days(7)).naive_utc();
    let actor = Actor {
        user_id: None,
        role: UserRole::Customer,
    };

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = f.bookings.clone();
        let booking = slot_booking(&f, start, 45, &format!("caller {i}"));
        handles.push(tokio::spawn(async move {
            repo.create_checked(booking, actor).await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("booking task panicked") {
            Ok(_) => created += 1,
            Err(AppError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1, "exactly one concurrent create may win the slot");
    assert_eq!(conflicts, 7);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a migrated database"]
async fn reschedule_honors_the_occupied_slot() {
    let f = fixture().await;
    let actor = Actor {
        user_id: None,
        role: UserRole::Admin,
    };

    let first_start = (Utc::now() + Duration::days(8)).naive_utc();
    let second_start = first_start + Duration::minutes(90);

    f.bookings
        .create_checked(slot_booking(&f, first_start, 45, "first"), actor)
        .await
        .expect("first create");
    let second = f
        .bookings
        .create_checked(slot_booking(&f, second_start, 45, "second"), actor)
        .await
        .expect("second create");

    // Into the middle of the first booking: rejected.
    let result = f
        .bookings
        .reschedule_checked(
            second.id,
            first_start + Duration::minutes(15),
            first_start + Duration::minutes(60),
            actor,
            None,
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));

    // Back-to-back with the first booking: the boundary instant is free.
    let moved = f
        .bookings
        .reschedule_checked(
            second.id,
            first_start + Duration::minutes(45),
            first_start + Duration::minutes(90),
            actor,
            None,
        )
        .await
        .expect("back-to-back reschedule");
    assert_eq!(moved.start_time, first_start + Duration::minutes(45));
}
