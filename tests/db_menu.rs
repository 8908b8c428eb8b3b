mod common;

use chrono::Duration;
use tiffin_xs::db::{MenuOperations, RepositoryError};
use tiffin_xs::models::menu::{MenuChanges, NewMenu};

fn menu_for(provider_id: i32, date: chrono::NaiveDate) -> NewMenu {
    NewMenu {
        provider_id,
        menu_date: date,
        sabjis: vec!["bhindi".to_string(), "dal".to_string()],
        price_full: 90,
        price_half: 70,
        price_rice_only: 45,
    }
}

#[actix_rt::test]
async fn one_active_menu_per_day() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let menu_ops = MenuOperations::new(pool);

    let err = menu_ops
        .create_menu(menu_for(fixtures.provider_id, fixtures.menu_date))
        .expect_err("fixture already has a menu today");
    assert!(matches!(err, RepositoryError::AlreadyExists(_)));

    let tomorrow = fixtures.menu_date + Duration::days(1);
    let created = menu_ops
        .create_menu(menu_for(fixtures.provider_id, tomorrow))
        .expect("menu for tomorrow");
    assert!(created.is_active);
    assert_eq!(created.sabjis, vec!["bhindi", "dal"]);
}

#[actix_rt::test]
async fn deleted_menu_frees_its_day_and_disappears() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let menu_ops = MenuOperations::new(pool);

    let deleted = menu_ops
        .soft_delete_menu(fixtures.provider_id, fixtures.menu_id)
        .expect("delete");
    assert!(!deleted.is_active);
    assert!(deleted.deleted_at.is_some());

    let err = menu_ops
        .get_active_menu(fixtures.menu_id)
        .expect_err("deleted menu is hidden");
    assert!(matches!(err, RepositoryError::NotFound(_)));
    assert!(menu_ops
        .list_menus(Some(fixtures.provider_id), None)
        .expect("list")
        .is_empty());

    let err = menu_ops
        .soft_delete_menu(fixtures.provider_id, fixtures.menu_id)
        .expect_err("already deleted");
    assert!(matches!(err, RepositoryError::NotFound(_)));

    menu_ops
        .create_menu(menu_for(fixtures.provider_id, fixtures.menu_date))
        .expect("day is free again");
}

#[actix_rt::test]
async fn only_owner_changes_menu() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let menu_ops = MenuOperations::new(pool);

    let changes = MenuChanges {
        price_half: Some(65),
        ..Default::default()
    };
    let err = menu_ops
        .update_menu(fixtures.user_id, fixtures.menu_id, changes)
        .expect_err("not the owner");
    assert!(matches!(err, RepositoryError::Forbidden(_)));

    let changes = MenuChanges {
        sabjis: Some(vec!["chole".to_string()]),
        price_half: Some(65),
        ..Default::default()
    };
    let updated = menu_ops
        .update_menu(fixtures.provider_id, fixtures.menu_id, changes)
        .expect("owner update");
    assert_eq!(updated.sabjis, vec!["chole"]);
    assert_eq!(updated.price_half, 65);
    assert_eq!(updated.price_full, 80);
    assert!(updated.updated_at >= updated.created_at);
}

#[actix_rt::test]
async fn list_menus_filters_and_joins_provider() {
    let (pool, fixtures) = common::setup_pool_with_fixtures();
    let menu_ops = MenuOperations::new(pool);

    let tomorrow = fixtures.menu_date + Duration::days(1);
    menu_ops
        .create_menu(menu_for(fixtures.provider_id, tomorrow))
        .expect("menu for tomorrow");

    let all = menu_ops.list_menus(None, None).expect("list");
    assert_eq!(all.len(), 2);
    // latest date first
    assert_eq!(all[0].menu.menu_date, tomorrow);
    assert_eq!(all[0].provider_name, "Annapurna Tiffins");

    let today = menu_ops
        .list_menus(Some(fixtures.provider_id), Some(fixtures.menu_date))
        .expect("list today");
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].menu.menu_id, fixtures.menu_id);

    assert!(menu_ops
        .list_menus(Some(fixtures.user_id), None)
        .expect("list other")
        .is_empty());
}
