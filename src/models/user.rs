use crate::models::common::UserRole;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::db::schema::users)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Deserialize, ToSchema)]
#[diesel(table_name = crate::db::schema::users)]
pub struct NewUser {
    pub name: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Public view of a provider used by listings and favorites.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, ToSchema)]
#[diesel(table_name = crate::db::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct ProviderCard {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
