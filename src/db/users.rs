use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::common::UserRole;
use crate::models::user::{NewUser, ProviderCard, User};
use diesel::prelude::*;
use diesel::result::Error;
use log::{debug, error};

#[derive(Clone)]
pub struct UserOperations {
    pool: DbPool,
}

impl UserOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Returns the account for `new_user.email`, creating it from `new_user` when absent.
    /// The flag is `true` when a new row was inserted.
    pub fn find_or_create_by_email(
        &self,
        new_user: NewUser,
    ) -> Result<(User, bool), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "find_or_create_by_email: failed to acquire DB connection: {}",
                e
            );
            e
        })?;

        use crate::db::schema::users::dsl::*;

        conn.connection().transaction(|conn| {
            let inserted = diesel::insert_into(users)
                .values(&new_user)
                .on_conflict(email)
                .do_nothing()
                .execute(conn)
                .map_err(RepositoryError::DatabaseError)?;

            let user = users
                .filter(email.eq(&new_user.email))
                .select(User::as_select())
                .first::<User>(conn)
                .map_err(|e| {
                    error!(
                        "find_or_create_by_email: error loading user '{}': {}",
                        new_user.email, e
                    );
                    RepositoryError::DatabaseError(e)
                })?;

            debug!(
                "find_or_create_by_email: user {} ({}), created: {}",
                user.user_id,
                user.email,
                inserted == 1
            );
            Ok((user, inserted == 1))
        })
    }

    pub fn get_user(&self, id: i32) -> Result<User, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_user: failed to acquire DB connection for user_id {}: {}",
                id, e
            );
            e
        })?;

        use crate::db::schema::users::dsl::*;
        users
            .find(id)
            .select(User::as_select())
            .first::<User>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound("User not found".to_string()),
                other => {
                    error!("get_user: error fetching user {}: {}", id, other);
                    RepositoryError::DatabaseError(other)
                }
            })
    }

    pub fn get_user_by_email(&self, email_addr: &str) -> Result<User, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool)?;

        use crate::db::schema::users::dsl::*;
        users
            .filter(email.eq(email_addr))
            .select(User::as_select())
            .first::<User>(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound("User not found".to_string()),
                other => {
                    error!(
                        "get_user_by_email: error fetching user with email '{}': {}",
                        email_addr, other
                    );
                    RepositoryError::DatabaseError(other)
                }
            })
    }

    /// `Ok(None)` for an unknown email or a wrong password; callers must not tell them apart.
    pub fn authenticate(
        &self,
        email_addr: &str,
        password_attempt: &str,
    ) -> Result<Option<User>, RepositoryError> {
        match self.get_user_by_email(email_addr) {
            Ok(user) if user.password == password_attempt => Ok(Some(user)),
            Ok(_) | Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn update_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("update_password: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::users::dsl::*;

        conn.connection().transaction(|conn| {
            let current = users
                .find(id)
                .select(password)
                .for_update()
                .first::<String>(conn)
                .map_err(|e| match e {
                    Error::NotFound => RepositoryError::NotFound("User not found".to_string()),
                    other => RepositoryError::DatabaseError(other),
                })?;

            if current != old_password {
                return Err(RepositoryError::ValidationError(
                    "Incorrect password".to_string(),
                ));
            }
            if old_password == new_password {
                return Err(RepositoryError::ValidationError(
                    "New password must be different from old password".to_string(),
                ));
            }

            diesel::update(users.find(id))
                .set(password.eq(new_password))
                .execute(conn)
                .map_err(|e| {
                    error!("update_password: error updating user {}: {}", id, e);
                    RepositoryError::DatabaseError(e)
                })?;
            Ok(())
        })
    }

    pub fn update_name(&self, id: i32, new_name: &str) -> Result<User, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("update_name: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::users::dsl::*;
        diesel::update(users.find(id))
            .set(name.eq(new_name))
            .returning(User::as_returning())
            .get_result(conn.connection())
            .map_err(|e| match e {
                Error::NotFound => RepositoryError::NotFound("User not found".to_string()),
                other => {
                    error!("update_name: error updating user {}: {}", id, other);
                    RepositoryError::DatabaseError(other)
                }
            })
    }

    pub fn list_providers(&self) -> Result<Vec<ProviderCard>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_providers: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::users::dsl::*;
        users
            .filter(role.eq(UserRole::Provider))
            .order_by(user_id.asc())
            .select(ProviderCard::as_select())
            .load::<ProviderCard>(conn.connection())
            .map_err(|e| {
                error!("list_providers: error fetching providers: {}", e);
                RepositoryError::DatabaseError(e)
            })
    }
}
