use chrono::{DateTime, NaiveDate, Utc};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::common::MealType;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::db::schema::menus)]
#[diesel(primary_key(menu_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub menu_id: i32,
    pub provider_id: i32,
    pub menu_date: NaiveDate,
    pub sabjis: Vec<String>,
    pub price_full: i32,
    pub price_half: i32,
    pub price_rice_only: i32,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    pub fn prices(&self) -> MenuPrices {
        MenuPrices {
            full: self.price_full,
            half: self.price_half,
            rice_only: self.price_rice_only,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::db::schema::menus)]
pub struct NewMenu {
    pub provider_id: i32,
    pub menu_date: NaiveDate,
    pub sabjis: Vec<String>,
    pub price_full: i32,
    pub price_half: i32,
    pub price_rice_only: i32,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = crate::db::schema::menus)]
pub struct MenuChanges {
    pub sabjis: Option<Vec<String>>,
    pub price_full: Option<i32>,
    pub price_half: Option<i32>,
    pub price_rice_only: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuPrices {
    pub full: i32,
    pub half: i32,
    pub rice_only: i32,
}

impl MenuPrices {
    pub fn for_meal(&self, meal: MealType) -> i32 {
        match meal {
            MealType::Full => self.full,
            MealType::Half => self.half,
            MealType::RiceOnly => self.rice_only,
        }
    }
}

/// A menu joined with the name and mobile of the provider who published it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuWithProvider {
    #[serde(flatten)]
    pub menu: Menu,
    pub provider_name: String,
    pub provider_mobile: Option<String>,
}
