use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::models::common::{MealType, OrderStatus};
use crate::services::analytics::{ItemRecord, RevenueRecord};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::error;

/// Read-only access to a provider's approved orders for revenue reports.
#[derive(Clone)]
pub struct AnalyticsOperations {
    pool: DbPool,
}

impl AnalyticsOperations {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn revenue_records(&self, provider: i32) -> Result<Vec<RevenueRecord>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("revenue_records: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::orders::dsl::*;
        let rows = orders
            .filter(provider_id.eq(provider))
            .filter(status.eq(OrderStatus::Approved))
            .order_by(order_date.asc())
            .select((order_date, grand_total))
            .load::<(DateTime<Utc>, i32)>(conn.connection())
            .map_err(|e| {
                error!(
                    "revenue_records: error loading orders for provider {}: {}",
                    provider, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(date, total)| RevenueRecord {
                order_date: date,
                grand_total: total,
            })
            .collect())
    }

    pub fn item_records(&self, provider: i32) -> Result<Vec<ItemRecord>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("item_records: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::{order_items, orders};
        let rows = order_items::table
            .inner_join(orders::table)
            .filter(orders::provider_id.eq(provider))
            .filter(orders::status.eq(OrderStatus::Approved))
            .select((
                order_items::meal_type,
                order_items::sabji,
                order_items::quantity,
            ))
            .load::<(MealType, Option<String>, i32)>(conn.connection())
            .map_err(|e| {
                error!(
                    "item_records: error loading items for provider {}: {}",
                    provider, e
                );
                RepositoryError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(meal_type, sabji, quantity)| ItemRecord {
                meal_type,
                sabji,
                quantity,
            })
            .collect())
    }
}
