use crate::auth::SessionConfig;
use crate::config::AppConfig;
use crate::db::{establish_connection_pool, run_db_migrations, DbConnection, DbPool, RepositoryError};
use crate::mailer::MailConfig;
use crate::models::common::UserRole;
use crate::models::menu::NewMenu;
use crate::services::day_window::{local_today, utc_offset};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use std::sync::Once;

// Fixture strategy:
// - One user and one provider with plain-text passwords from `TEST_PASSWORD`.
// - The provider publishes a single menu for today (UTC).
pub const TEST_PASSWORD: &str = "secret-pass";
pub const TEST_SESSION_SECRET: &str = "test-session-secret";
static TEST_THREADS_GUARD: Once = Once::new();

fn ensure_single_threaded_tests() {
    TEST_THREADS_GUARD.call_once(|| {
        let threads = test_threads_from_args().or_else(|| std::env::var("RUST_TEST_THREADS").ok());
        if threads.as_deref() != Some("1") {
            panic!(
                "Tests must run with --test-threads=1 or RUST_TEST_THREADS=1 because every test truncates the shared database."
            );
        }
    });
}

fn test_threads_from_args() -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == "--test-threads" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--test-threads=") {
            return Some(value.to_string());
        }
    }
    None
}

pub fn init_test_env() {
    ensure_single_threaded_tests();
}

/// Configuration with fixed secrets, UTC days and no outgoing mail.
pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        session: SessionConfig {
            secret: TEST_SESSION_SECRET.to_string(),
            ttl_secs: 60 * 60,
            otp_ttl_secs: 5 * 60,
            secure_cookie: false,
        },
        mail: MailConfig {
            api_key: None,
            api_url: "http://127.0.0.1:9/emails".to_string(),
            otp_from: "otp@test.local".to_string(),
            contact_from: "contact@test.local".to_string(),
            contact_to: "dev@test.local".to_string(),
        },
        cancel_window_secs: 10 * 60,
        tz: utc_offset(),
    }
}

pub fn build_test_pool(database_url: &str) -> DbPool {
    let pool = establish_connection_pool(database_url);
    run_db_migrations(pool.clone()).expect("Unable to run migrations");
    pool
}

pub fn reset_db(pool: &DbPool) -> Result<(), RepositoryError> {
    let mut conn = DbConnection::new(pool)?;
    diesel::sql_query(
        "TRUNCATE TABLE order_items, orders, user_fav_providers, menus, users \
         RESTART IDENTITY CASCADE",
    )
    .execute(conn.connection())
    .map_err(RepositoryError::DatabaseError)?;
    Ok(())
}

pub struct TestFixtures {
    pub user_id: i32,
    pub user_email: String,
    pub provider_id: i32,
    pub provider_email: String,
    pub menu_id: i32,
    pub menu_date: NaiveDate,
}

pub fn seed_basic_fixtures(pool: &DbPool) -> Result<TestFixtures, RepositoryError> {
    let mut conn = DbConnection::new(pool)?;

    let user_email = "asha@example.com".to_string();
    let provider_email = "annapurna@example.com".to_string();
    let user_id = insert_user(
        conn.connection(),
        "Asha",
        &user_email,
        UserRole::User,
    )?;
    let provider_id = insert_user(
        conn.connection(),
        "Annapurna Tiffins",
        &provider_email,
        UserRole::Provider,
    )?;

    let menu_date = local_today(Utc::now(), utc_offset());
    let menu_id = insert_menu(
        conn.connection(),
        provider_id,
        menu_date,
        &["aloo gobi", "paneer"],
        (80, 60, 40),
    )?;

    Ok(TestFixtures {
        user_id,
        user_email,
        provider_id,
        provider_email,
        menu_id,
        menu_date,
    })
}

pub fn insert_user(
    conn: &mut PgConnection,
    name_val: &str,
    email_val: &str,
    role_val: UserRole,
) -> Result<i32, RepositoryError> {
    use crate::db::schema::users::dsl::*;

    diesel::insert_into(users)
        .values((
            name.eq(name_val),
            email.eq(email_val),
            password.eq(TEST_PASSWORD),
            role.eq(role_val),
        ))
        .returning(user_id)
        .get_result(conn)
        .map_err(RepositoryError::DatabaseError)
}

/// Prices are `(full, half, rice_only)`.
pub fn insert_menu(
    conn: &mut PgConnection,
    provider: i32,
    date: NaiveDate,
    sabji_names: &[&str],
    prices: (i32, i32, i32),
) -> Result<i32, RepositoryError> {
    use crate::db::schema::menus::dsl::*;

    let new_menu = NewMenu {
        provider_id: provider,
        menu_date: date,
        sabjis: sabji_names.iter().map(|s| s.to_string()).collect(),
        price_full: prices.0,
        price_half: prices.1,
        price_rice_only: prices.2,
    };

    diesel::insert_into(menus)
        .values(&new_menu)
        .returning(menu_id)
        .get_result(conn)
        .map_err(RepositoryError::DatabaseError)
}
