//! Revenue reports for the provider in session. Only approved orders count.

use crate::api::errors::repository_error;
use crate::auth::ProviderPrincipal;
use crate::config::AppConfig;
use crate::db::AnalyticsOperations;
use crate::enums::analytics::{
    AvgOrderValueResponse, BestSellersResponse, DailyRevenueResponse, GrowthRateResponse,
    MonthlyRevenueResponse, OverallSummaryResponse,
};
use crate::enums::common::GeneralResponse;
use crate::services::analytics::{
    avg_order_value, best_sellers, daily_revenue_trend, growth_rate, monthly_revenue,
    overall_summary, RevenueRecord,
};
use crate::services::day_window::local_today;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

async fn load_revenue(
    analytics_ops: &web::Data<AnalyticsOperations>,
    provider_id: i32,
) -> actix_web::Result<Result<Vec<RevenueRecord>, HttpResponse>> {
    let ops = analytics_ops.clone();
    let result = web::block(move || ops.revenue_records(provider_id)).await?;
    Ok(result.map_err(|e| {
        error!("analytics: provider {}: {}", provider_id, e);
        repository_error(&e)
    }))
}

#[utoipa::path(
    tag = "Analytics",
    responses(
        (status = 200, description = "Revenue per month of the current year", body = MonthlyRevenueResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Monthly revenue"
)]
#[get("/monthly-revenue")]
pub(super) async fn monthly_revenue_handler(
    analytics_ops: web::Data<AnalyticsOperations>,
    config: web::Data<AppConfig>,
    provider: ProviderPrincipal,
) -> actix_web::Result<impl Responder> {
    let records = match load_revenue(&analytics_ops, provider.provider_id).await? {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    let today = local_today(Utc::now(), config.tz);
    Ok(HttpResponse::Ok().json(MonthlyRevenueResponse::ok(monthly_revenue(
        &records, config.tz, today,
    ))))
}

#[utoipa::path(
    tag = "Analytics",
    responses(
        (status = 200, description = "Revenue and order count till date", body = OverallSummaryResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Overall summary"
)]
#[get("/overall-summary")]
pub(super) async fn overall_summary_handler(
    analytics_ops: web::Data<AnalyticsOperations>,
    provider: ProviderPrincipal,
) -> actix_web::Result<impl Responder> {
    let records = match load_revenue(&analytics_ops, provider.provider_id).await? {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    Ok(HttpResponse::Ok().json(OverallSummaryResponse::ok(overall_summary(&records))))
}

#[utoipa::path(
    tag = "Analytics",
    responses(
        (status = 200, description = "Current vs previous month revenue", body = GrowthRateResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Month-on-month growth"
)]
#[get("/growth-rate")]
pub(super) async fn growth_rate_handler(
    analytics_ops: web::Data<AnalyticsOperations>,
    config: web::Data<AppConfig>,
    provider: ProviderPrincipal,
) -> actix_web::Result<impl Responder> {
    let records = match load_revenue(&analytics_ops, provider.provider_id).await? {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    let today = local_today(Utc::now(), config.tz);
    Ok(HttpResponse::Ok().json(GrowthRateResponse::ok(growth_rate(
        &records, config.tz, today,
    ))))
}

#[utoipa::path(
    tag = "Analytics",
    responses(
        (status = 200, description = "Best selling tiffin type and sabji", body = BestSellersResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Best sellers"
)]
#[get("/best-sellers")]
pub(super) async fn best_sellers_handler(
    analytics_ops: web::Data<AnalyticsOperations>,
    provider: ProviderPrincipal,
) -> actix_web::Result<impl Responder> {
    let provider_id = provider.provider_id;
    let ops = analytics_ops.clone();
    let result = web::block(move || ops.item_records(provider_id)).await?;

    Ok(match result {
        Ok(items) => HttpResponse::Ok().json(BestSellersResponse::ok(best_sellers(&items))),
        Err(e) => {
            error!("best_sellers: provider {}: {}", provider_id, e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Analytics",
    responses(
        (status = 200, description = "Revenue per day of the current month", body = DailyRevenueResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Daily revenue trend"
)]
#[get("/daily-revenue-trend")]
pub(super) async fn daily_revenue_trend_handler(
    analytics_ops: web::Data<AnalyticsOperations>,
    config: web::Data<AppConfig>,
    provider: ProviderPrincipal,
) -> actix_web::Result<impl Responder> {
    let records = match load_revenue(&analytics_ops, provider.provider_id).await? {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    let today = local_today(Utc::now(), config.tz);
    Ok(HttpResponse::Ok().json(DailyRevenueResponse::ok(daily_revenue_trend(
        &records, config.tz, today,
    ))))
}

#[utoipa::path(
    tag = "Analytics",
    responses(
        (status = 200, description = "Average approved order value", body = AvgOrderValueResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Average order value"
)]
#[get("/avg-order-value")]
pub(super) async fn avg_order_value_handler(
    analytics_ops: web::Data<AnalyticsOperations>,
    provider: ProviderPrincipal,
) -> actix_web::Result<impl Responder> {
    let records = match load_revenue(&analytics_ops, provider.provider_id).await? {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };
    Ok(HttpResponse::Ok().json(AvgOrderValueResponse::ok(avg_order_value(&records))))
}
