mod common;

use diesel::prelude::*;
use tiffin_xs::db::DbConnection;

#[test]
fn db_migrations_run_and_empty_state() {
    let pool = common::setup_pool();

    let mut conn = DbConnection::new(&pool).expect("db connection");

    let user_count: i64 = tiffin_xs::db::schema::users::table
        .count()
        .get_result(conn.connection())
        .expect("count users");
    let menu_count: i64 = tiffin_xs::db::schema::menus::table
        .count()
        .get_result(conn.connection())
        .expect("count menus");
    let order_count: i64 = tiffin_xs::db::schema::orders::table
        .count()
        .get_result(conn.connection())
        .expect("count orders");

    assert_eq!(user_count, 0);
    assert_eq!(menu_count, 0);
    assert_eq!(order_count, 0);
}

#[test]
fn only_one_active_menu_per_provider_and_day() {
    let pool = common::setup_pool();
    let mut conn = DbConnection::new(&pool).expect("db connection");

    let index_count: i64 = diesel::dsl::sql::<diesel::sql_types::BigInt>(
        "SELECT COUNT(*) FROM pg_indexes WHERE indexname = 'menus_provider_date_active_idx'",
    )
    .get_result(conn.connection())
    .expect("querying pg_indexes should succeed");

    assert_eq!(index_count, 1, "partial unique index on active menus should exist");
}
