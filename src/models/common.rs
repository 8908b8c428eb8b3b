use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Stores a string-backed enum in a `VARCHAR` column.
macro_rules! text_column_enum {
    ($ty:ty, $label:literal) => {
        impl ToSql<Text, Pg> for $ty {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                <str as ToSql<Text, Pg>>::to_sql(self.as_str(), out)
            }
        }

        impl FromSql<Text, Pg> for $ty {
            fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
                let raw = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
                raw.parse::<$ty>()
                    .map_err(|_| format!("unrecognized {}: {}", $label, raw).into())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize, ToSchema,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Provider,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Provider => "provider",
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "provider" => Ok(UserRole::Provider),
            _ => Err(()),
        }
    }
}

text_column_enum!(UserRole, "user role");

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize, ToSchema,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Orders leave `pending` exactly once; every other status is final.
    pub fn is_final(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "placed" was the initial status name in older clients
            "pending" | "placed" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "rejected" => Ok(OrderStatus::Rejected),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

text_column_enum!(OrderStatus, "order status");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsExpression,
    FromSqlRow,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[diesel(sql_type = Text)]
pub enum MealType {
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "half")]
    Half,
    #[serde(rename = "riceOnly")]
    RiceOnly,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Full, MealType::Half, MealType::RiceOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Full => "full",
            MealType::Half => "half",
            MealType::RiceOnly => "riceOnly",
        }
    }

    pub fn needs_sabji(&self) -> bool {
        !matches!(self, MealType::RiceOnly)
    }
}

impl FromStr for MealType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(MealType::Full),
            "half" => Ok(MealType::Half),
            "riceOnly" => Ok(MealType::RiceOnly),
            _ => Err(()),
        }
    }
}

text_column_enum!(MealType, "meal type");
