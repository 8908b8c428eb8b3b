use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::common::UserRole;
use crate::models::user::ProviderCard;
use diesel::prelude::*;
use log::{debug, error};

#[derive(Clone)]
pub struct FavoriteOperations {
    pool: DbPool,
}

impl FavoriteOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Provider cards for `ids`, in the order the ids were favorited.
    fn cards_in_order(
        conn: &mut PgConnection,
        ids: &[i32],
    ) -> Result<Vec<ProviderCard>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        use crate::db::schema::users::dsl::*;
        let mut cards = users
            .filter(user_id.eq_any(ids))
            .filter(role.eq(UserRole::Provider))
            .select(ProviderCard::as_select())
            .load::<ProviderCard>(conn)
            .map_err(|e| {
                error!("cards_in_order: error loading providers: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        cards.sort_by_key(|card| ids.iter().position(|id| *id == card.user_id));
        Ok(cards)
    }

    /// Adds `provider` to the user's favorites; adding it twice is a no-op.
    pub fn add_favorite(
        &self,
        owner: i32,
        provider: i32,
    ) -> Result<Vec<ProviderCard>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("add_favorite: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            {
                use crate::db::schema::users::dsl::*;
                let is_provider = diesel::select(diesel::dsl::exists(
                    users
                        .filter(user_id.eq(provider))
                        .filter(role.eq(UserRole::Provider)),
                ))
                .get_result::<bool>(conn)
                .map_err(RepositoryError::DatabaseError)?;

                if !is_provider {
                    return Err(RepositoryError::NotFound("Provider not found".to_string()));
                }
            }

            let current = Self::append_favorite(conn, owner, provider)?;
            Self::cards_in_order(conn, &current)
        })
    }

    fn append_favorite(
        conn: &mut PgConnection,
        owner: i32,
        provider: i32,
    ) -> Result<Vec<i32>, RepositoryError> {
        use crate::db::schema::user_fav_providers::dsl::*;

        diesel::insert_into(user_fav_providers)
            .values((user_id.eq(owner), favorite_providers.eq(Vec::<i32>::new())))
            .on_conflict(user_id)
            .do_nothing()
            .execute(conn)
            .map_err(RepositoryError::DatabaseError)?;

        let mut current = user_fav_providers
            .find(owner)
            .select(favorite_providers)
            .for_update()
            .first::<Vec<i32>>(conn)
            .map_err(RepositoryError::DatabaseError)?;

        if !current.contains(&provider) {
            current.push(provider);
            diesel::update(user_fav_providers.find(owner))
                .set(favorite_providers.eq(&current))
                .execute(conn)
                .map_err(|e| {
                    error!("add_favorite: error updating favorites of {}: {}", owner, e);
                    RepositoryError::DatabaseError(e)
                })?;
        } else {
            debug!("add_favorite: {} already favorited {}", owner, provider);
        }
        Ok(current)
    }

    pub fn list_favorites(&self, owner: i32) -> Result<Vec<ProviderCard>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_favorites: failed to acquire DB connection: {}", e);
            e
        })?;

        let ids = {
            use crate::db::schema::user_fav_providers::dsl::*;
            user_fav_providers
                .find(owner)
                .select(favorite_providers)
                .first::<Vec<i32>>(conn.connection())
                .optional()
                .map_err(|e| {
                    error!("list_favorites: error loading favorites of {}: {}", owner, e);
                    RepositoryError::DatabaseError(e)
                })?
                .unwrap_or_default()
        };

        Self::cards_in_order(conn.connection(), &ids)
    }

    /// Removing a provider that is not in the list succeeds; a user with no
    /// favorites record at all gets `NotFound`.
    pub fn remove_favorite(
        &self,
        owner: i32,
        provider: i32,
    ) -> Result<Vec<ProviderCard>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("remove_favorite: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            use crate::db::schema::user_fav_providers::dsl::*;

            let mut current = user_fav_providers
                .find(owner)
                .select(favorite_providers)
                .for_update()
                .first::<Vec<i32>>(conn)
                .optional()
                .map_err(RepositoryError::DatabaseError)?
                .ok_or_else(|| RepositoryError::NotFound("User favorites not found".to_string()))?;

            current.retain(|id| *id != provider);
            diesel::update(user_fav_providers.find(owner))
                .set(favorite_providers.eq(&current))
                .execute(conn)
                .map_err(|e| {
                    error!("remove_favorite: error updating favorites of {}: {}", owner, e);
                    RepositoryError::DatabaseError(e)
                })?;

            Self::cards_in_order(conn, &current)
        })
    }
}
