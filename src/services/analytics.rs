//! Revenue figures for a single provider, computed over its approved orders.

use crate::models::common::MealType;
use crate::services::day_window::{first_of_month, local_date_of, previous_month};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy)]
pub struct RevenueRecord {
    pub order_date: DateTime<Utc>,
    pub grand_total: i32,
}

#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub meal_type: MealType,
    pub sabji: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub total_revenue: i64,
    pub total_orders: i64,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: i64,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GrowthRate {
    pub current_month: String,
    pub previous_month: String,
    pub current_revenue: i64,
    pub previous_revenue: i64,
    /// Percentage change; absent when the previous month earned nothing.
    pub growth_percent: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RankedEntry {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestSellers {
    pub best_tiffin: Option<RankedEntry>,
    pub best_sabji: Option<RankedEntry>,
    pub tiffins: Vec<RankedEntry>,
    pub sabjis: Vec<RankedEntry>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvgOrderValue {
    pub total_revenue: i64,
    pub total_orders: i64,
    pub average_order_value: f64,
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn overall_summary(records: &[RevenueRecord]) -> OverallSummary {
    OverallSummary {
        total_revenue: records.iter().map(|r| i64::from(r.grand_total)).sum(),
        total_orders: records.len() as i64,
    }
}

/// One entry per month of `today`'s year, January through the current month.
pub fn monthly_revenue(
    records: &[RevenueRecord],
    tz: FixedOffset,
    today: NaiveDate,
) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<u32, (i64, i64)> = (1..=today.month()).map(|m| (m, (0, 0))).collect();

    for record in records {
        let date = local_date_of(record.order_date, tz);
        if date.year() != today.year() || date > today {
            continue;
        }
        if let Some((revenue, orders)) = months.get_mut(&date.month()) {
            *revenue += i64::from(record.grand_total);
            *orders += 1;
        }
    }

    months
        .into_iter()
        .map(|(month, (revenue, orders))| MonthlyRevenue {
            month: format!("{:04}-{:02}", today.year(), month),
            revenue,
            orders,
        })
        .collect()
}

pub fn growth_rate(records: &[RevenueRecord], tz: FixedOffset, today: NaiveDate) -> GrowthRate {
    let current = first_of_month(today);
    let previous = previous_month(today);

    let mut current_revenue = 0i64;
    let mut previous_revenue = 0i64;
    for record in records {
        let month = first_of_month(local_date_of(record.order_date, tz));
        if month == current {
            current_revenue += i64::from(record.grand_total);
        } else if month == previous {
            previous_revenue += i64::from(record.grand_total);
        }
    }

    let growth_percent = (previous_revenue != 0).then(|| {
        round2((current_revenue - previous_revenue) as f64 / previous_revenue as f64 * 100.0)
    });

    GrowthRate {
        current_month: month_key(current),
        previous_month: month_key(previous),
        current_revenue,
        previous_revenue,
        growth_percent,
    }
}

fn ranked(totals: HashMap<String, i64>) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = totals
        .into_iter()
        .map(|(name, quantity)| RankedEntry { name, quantity })
        .collect();
    entries.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    entries
}

pub fn best_sellers(items: &[ItemRecord]) -> BestSellers {
    let mut tiffins: HashMap<String, i64> = HashMap::new();
    let mut sabjis: HashMap<String, i64> = HashMap::new();

    for item in items {
        let qty = i64::from(item.quantity);
        *tiffins.entry(item.meal_type.as_str().to_string()).or_insert(0) += qty;
        if let Some(sabji) = &item.sabji {
            *sabjis.entry(sabji.clone()).or_insert(0) += qty;
        }
    }

    let tiffins = ranked(tiffins);
    let sabjis = ranked(sabjis);

    BestSellers {
        best_tiffin: tiffins.first().map(|e| RankedEntry {
            name: e.name.clone(),
            quantity: e.quantity,
        }),
        best_sabji: sabjis.first().map(|e| RankedEntry {
            name: e.name.clone(),
            quantity: e.quantity,
        }),
        tiffins,
        sabjis,
    }
}

/// Revenue for every day of `today`'s month up to and including `today`.
pub fn daily_revenue_trend(
    records: &[RevenueRecord],
    tz: FixedOffset,
    today: NaiveDate,
) -> Vec<DailyRevenue> {
    let start = first_of_month(today);
    let mut days: BTreeMap<NaiveDate, i64> = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|d| (d, 0))
        .collect();

    for record in records {
        let date = local_date_of(record.order_date, tz);
        if let Some(revenue) = days.get_mut(&date) {
            *revenue += i64::from(record.grand_total);
        }
    }

    days.into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}

pub fn avg_order_value(records: &[RevenueRecord]) -> AvgOrderValue {
    let OverallSummary {
        total_revenue,
        total_orders,
    } = overall_summary(records);
    let average_order_value = if total_orders == 0 {
        0.0
    } else {
        round2(total_revenue as f64 / total_orders as f64)
    };
    AvgOrderValue {
        total_revenue,
        total_orders,
        average_order_value,
    }
}
