use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::menu::{Menu, MenuChanges, MenuWithProvider, NewMenu};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use log::{debug, error};

#[derive(Clone)]
pub struct MenuOperations {
    pool: DbPool,
}

impl MenuOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Publishes a menu; a provider can have only one live menu per day.
    pub fn create_menu(&self, new_menu: NewMenu) -> Result<Menu, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("create_menu: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::menus::dsl::*;

        conn.connection().transaction(|conn| {
            let existing = menus
                .filter(provider_id.eq(new_menu.provider_id))
                .filter(menu_date.eq(new_menu.menu_date))
                .filter(is_active.eq(true))
                .select(menu_id)
                .first::<i32>(conn)
                .optional()
                .map_err(RepositoryError::DatabaseError)?;

            if let Some(existing_id) = existing {
                debug!(
                    "create_menu: provider {} already has menu {} for {}",
                    new_menu.provider_id, existing_id, new_menu.menu_date
                );
                return Err(RepositoryError::AlreadyExists(
                    "Menu already exists for this date".to_string(),
                ));
            }

            diesel::insert_into(menus)
                .values(&new_menu)
                .returning(Menu::as_returning())
                .get_result(conn)
                .map_err(|e| match e {
                    // lost a race against a concurrent insert for the same day
                    Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::AlreadyExists(
                            "Menu already exists for this date".to_string(),
                        )
                    }
                    other => {
                        error!(
                            "create_menu: error inserting menu for provider {}: {}",
                            new_menu.provider_id, other
                        );
                        RepositoryError::DatabaseError(other)
                    }
                })
        })
    }

    pub fn list_menus(
        &self,
        filter_provider: Option<i32>,
        filter_date: Option<NaiveDate>,
    ) -> Result<Vec<MenuWithProvider>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_menus: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::{menus, users};

        let mut query = menus::table
            .inner_join(users::table.on(users::user_id.eq(menus::provider_id)))
            .filter(menus::is_active.eq(true))
            .into_boxed();
        if let Some(pid) = filter_provider {
            query = query.filter(menus::provider_id.eq(pid));
        }
        if let Some(day) = filter_date {
            query = query.filter(menus::menu_date.eq(day));
        }

        let rows = query
            .order_by((menus::menu_date.desc(), menus::menu_id.desc()))
            .select((Menu::as_select(), users::name, users::mobile))
            .load::<(Menu, String, Option<String>)>(conn.connection())
            .map_err(|e| {
                error!("list_menus: error fetching menus: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(menu, provider_name, provider_mobile)| MenuWithProvider {
                menu,
                provider_name,
                provider_mobile,
            })
            .collect())
    }

    pub fn get_active_menu(&self, id: i32) -> Result<Menu, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_active_menu: failed to acquire DB connection for id {}: {}",
                id, e
            );
            e
        })?;

        use crate::db::schema::menus::dsl::*;
        menus
            .filter(menu_id.eq(id))
            .filter(is_active.eq(true))
            .select(Menu::as_select())
            .first::<Menu>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound("Menu not found".to_string()),
                other => {
                    error!("get_active_menu: error fetching menu {}: {}", id, other);
                    RepositoryError::DatabaseError(other)
                }
            })
    }

    fn load_owned_for_update(
        conn: &mut PgConnection,
        owner: i32,
        id: i32,
    ) -> Result<Menu, RepositoryError> {
        use crate::db::schema::menus::dsl::*;

        let menu = menus
            .filter(menu_id.eq(id))
            .filter(is_active.eq(true))
            .select(Menu::as_select())
            .for_update()
            .first::<Menu>(conn)
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound("Menu not found".to_string()),
                other => RepositoryError::DatabaseError(other),
            })?;

        if menu.provider_id != owner {
            return Err(RepositoryError::Forbidden(
                "Menu belongs to another provider".to_string(),
            ));
        }
        Ok(menu)
    }

    pub fn update_menu(
        &self,
        owner: i32,
        id: i32,
        mut changes: MenuChanges,
    ) -> Result<Menu, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "update_menu: failed to acquire DB connection for id {}: {}",
                id, e
            );
            e
        })?;

        use crate::db::schema::menus::dsl::*;

        changes.updated_at = Some(Utc::now());
        conn.connection().transaction(|conn| {
            Self::load_owned_for_update(conn, owner, id)?;
            diesel::update(menus.filter(menu_id.eq(id)))
                .set(&changes)
                .returning(Menu::as_returning())
                .get_result(conn)
                .map_err(|e| {
                    error!("update_menu: error updating menu {}: {}", id, e);
                    RepositoryError::DatabaseError(e)
                })
        })
    }

    /// Hides the menu from listings and new orders; existing orders keep their reference.
    pub fn soft_delete_menu(&self, owner: i32, id: i32) -> Result<Menu, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "soft_delete_menu: failed to acquire DB connection for id {}: {}",
                id, e
            );
            e
        })?;

        use crate::db::schema::menus::dsl::*;

        conn.connection().transaction(|conn| {
            Self::load_owned_for_update(conn, owner, id)?;
            let now = Utc::now();
            diesel::update(menus.filter(menu_id.eq(id)))
                .set((
                    is_active.eq(false),
                    deleted_at.eq(Some(now)),
                    updated_at.eq(now),
                ))
                .returning(Menu::as_returning())
                .get_result(conn)
                .map_err(|e| {
                    error!("soft_delete_menu: error deleting menu {}: {}", id, e);
                    RepositoryError::DatabaseError(e)
                })
        })
    }
}
