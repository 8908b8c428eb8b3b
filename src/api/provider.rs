use crate::api::errors::{repository_error, validation_error};
use crate::auth::{PrincipalExtractor, ProviderPrincipal};
use crate::config::AppConfig;
use crate::db::{MenuOperations, OrderFilter, OrderOperations};
use crate::enums::common::GeneralResponse;
use crate::enums::orders::OrderDetailsListResponse;
use crate::enums::provider::{
    normalize_sabjis, CreateMenuRequest, MenuListQuery, MenuListResponse, MenuPricesInput,
    MenuResponse, ProviderOrdersQuery, UpdateMenuRequest,
};
use crate::models::common::{OrderStatus, UserRole};
use crate::models::menu::{MenuChanges, MenuPrices, NewMenu};
use crate::services::day_window::{resolve_date, resolve_day};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;

fn check_price(value: Option<i32>) -> Result<Option<i32>, String> {
    match value {
        Some(p) if p < 0 => Err("Prices must not be negative".to_string()),
        other => Ok(other),
    }
}

/// All three tiers are required when publishing a menu.
fn full_prices(input: MenuPricesInput) -> Result<MenuPrices, String> {
    let (Some(full), Some(half), Some(rice_only)) = (
        check_price(input.full)?,
        check_price(input.half)?,
        check_price(input.rice_only)?,
    ) else {
        return Err("Prices for full, half and riceOnly are required".to_string());
    };
    Ok(MenuPrices {
        full,
        half,
        rice_only,
    })
}

/// Menu updates may change any subset of the tiers.
fn partial_prices(
    input: MenuPricesInput,
) -> Result<(Option<i32>, Option<i32>, Option<i32>), String> {
    Ok((
        check_price(input.full)?,
        check_price(input.half)?,
        check_price(input.rice_only)?,
    ))
}

#[utoipa::path(
    tag = "Provider",
    request_body = CreateMenuRequest,
    responses(
        (status = 201, description = "Menu published", body = MenuResponse),
        (status = 400, description = "Missing fields or a menu already exists for the date", body = GeneralResponse),
        (status = 403, description = "Session is not a provider", body = GeneralResponse)
    ),
    summary = "Publish the menu for a day"
)]
#[post("/create-menu")]
pub(super) async fn create_menu(
    menu_ops: web::Data<MenuOperations>,
    config: web::Data<AppConfig>,
    principal: PrincipalExtractor,
    req_data: web::Json<CreateMenuRequest>,
) -> actix_web::Result<impl Responder> {
    let CreateMenuRequest {
        date,
        sabjis,
        prices,
    } = req_data.into_inner();

    let sabjis = sabjis.map(normalize_sabjis).unwrap_or_default();
    let (Some(date), Some(prices)) = (date.filter(|d| !d.trim().is_empty()), prices) else {
        return Ok(validation_error("date, sabjis and prices are required"));
    };
    if sabjis.is_empty() {
        return Ok(validation_error("date, sabjis and prices are required"));
    }
    let prices = match full_prices(prices) {
        Ok(p) => p,
        Err(message) => return Ok(validation_error(message)),
    };
    let menu_date = match resolve_date(Some(&date), Utc::now(), config.tz) {
        Ok(d) => d,
        Err(message) => return Ok(validation_error(message)),
    };

    if principal.0.role() != UserRole::Provider {
        return Ok(HttpResponse::Forbidden().json(GeneralResponse::error(
            "Access denied. Only providers can create menu.",
        )));
    }

    let provider_id = principal.0.id();
    let new_menu = NewMenu {
        provider_id,
        menu_date,
        sabjis,
        price_full: prices.full,
        price_half: prices.half,
        price_rice_only: prices.rice_only,
    };
    let ops = menu_ops.clone();
    let result = web::block(move || ops.create_menu(new_menu)).await?;

    match result {
        Ok(menu) => {
            info!(
                "create_menu: provider {} published menu {} for {}",
                provider_id, menu.menu_id, menu.menu_date
            );
            Ok(HttpResponse::Created().json(MenuResponse::ok(menu)))
        }
        Err(e) => {
            debug!("create_menu: provider {}: {}", provider_id, e);
            Ok(repository_error(&e))
        }
    }
}

#[utoipa::path(
    tag = "Provider",
    params(MenuListQuery),
    responses(
        (status = 200, description = "Active menus, latest first", body = MenuListResponse),
        (status = 400, description = "Invalid date", body = GeneralResponse)
    ),
    summary = "List active menus"
)]
#[get("/menus")]
pub(super) async fn list_menus(
    menu_ops: web::Data<MenuOperations>,
    config: web::Data<AppConfig>,
    query: web::Query<MenuListQuery>,
) -> actix_web::Result<impl Responder> {
    let MenuListQuery { provider_id, date } = query.into_inner();
    let day = match date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => match resolve_date(Some(raw), Utc::now(), config.tz) {
            Ok(d) => Some(d),
            Err(message) => return Ok(validation_error(message)),
        },
        None => None,
    };

    let ops = menu_ops.clone();
    let result = web::block(move || ops.list_menus(provider_id, day)).await?;

    Ok(match result {
        Ok(menus) => HttpResponse::Ok().json(MenuListResponse {
            status: "ok".to_string(),
            count: menus.len(),
            data: menus,
            error: None,
        }),
        Err(e) => {
            error!("list_menus: {}", e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Provider",
    params(("id" = i32, Path, description = "Menu id")),
    responses(
        (status = 200, description = "The menu", body = MenuResponse),
        (status = 404, description = "Missing or deleted", body = GeneralResponse)
    ),
    summary = "Get an active menu"
)]
#[get("/menus/{id}")]
pub(super) async fn get_menu(
    menu_ops: web::Data<MenuOperations>,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner().0;
    let ops = menu_ops.clone();
    let result = web::block(move || ops.get_active_menu(id)).await?;

    Ok(match result {
        Ok(menu) => HttpResponse::Ok().json(MenuResponse::ok(menu)),
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "Provider",
    params(("id" = i32, Path, description = "Menu id")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Updated menu", body = MenuResponse),
        (status = 400, description = "Nothing to update or invalid values", body = GeneralResponse),
        (status = 403, description = "Menu belongs to another provider", body = GeneralResponse),
        (status = 404, description = "Missing or deleted", body = GeneralResponse)
    ),
    summary = "Change sabjis or prices of a menu"
)]
#[put("/menus/{id}")]
pub(super) async fn update_menu(
    menu_ops: web::Data<MenuOperations>,
    provider: ProviderPrincipal,
    path: web::Path<(i32,)>,
    req_data: web::Json<UpdateMenuRequest>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner().0;
    let UpdateMenuRequest { sabjis, prices } = req_data.into_inner();

    let sabjis = sabjis.map(normalize_sabjis);
    if sabjis.as_ref().is_some_and(|s| s.is_empty()) {
        return Ok(validation_error("Sabjis cannot be empty"));
    }
    let (price_full, price_half, price_rice_only) = match partial_prices(prices.unwrap_or_default()) {
        Ok(p) => p,
        Err(message) => return Ok(validation_error(message)),
    };

    let changes = MenuChanges {
        sabjis,
        price_full,
        price_half,
        price_rice_only,
        updated_at: None,
    };
    if changes.sabjis.is_none()
        && changes.price_full.is_none()
        && changes.price_half.is_none()
        && changes.price_rice_only.is_none()
    {
        return Ok(validation_error("Nothing to update"));
    }

    let owner = provider.provider_id;
    let ops = menu_ops.clone();
    let result = web::block(move || ops.update_menu(owner, id, changes)).await?;

    Ok(match result {
        Ok(menu) => {
            debug!("update_menu: provider {} updated menu {}", owner, id);
            HttpResponse::Ok().json(MenuResponse::ok(menu))
        }
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "Provider",
    params(("id" = i32, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu deleted", body = MenuResponse),
        (status = 403, description = "Menu belongs to another provider", body = GeneralResponse),
        (status = 404, description = "Missing or already deleted", body = GeneralResponse)
    ),
    summary = "Soft-delete a menu"
)]
#[delete("/menus/{id}")]
pub(super) async fn delete_menu(
    menu_ops: web::Data<MenuOperations>,
    provider: ProviderPrincipal,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner().0;
    let owner = provider.provider_id;
    let ops = menu_ops.clone();
    let result = web::block(move || ops.soft_delete_menu(owner, id)).await?;

    Ok(match result {
        Ok(menu) => {
            info!("delete_menu: provider {} deleted menu {}", owner, id);
            HttpResponse::Ok().json(MenuResponse::ok(menu))
        }
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "Provider",
    params(ProviderOrdersQuery),
    responses(
        (status = 200, description = "The provider's orders for the day, newest first", body = OrderDetailsListResponse),
        (status = 400, description = "Invalid date or status", body = GeneralResponse)
    ),
    summary = "Orders received by the session's provider"
)]
#[get("/orders")]
pub(super) async fn provider_orders(
    order_ops: web::Data<OrderOperations>,
    config: web::Data<AppConfig>,
    provider: ProviderPrincipal,
    query: web::Query<ProviderOrdersQuery>,
) -> actix_web::Result<impl Responder> {
    let ProviderOrdersQuery { date, status } = query.into_inner();
    let (_, from, until) = match resolve_day(date.as_deref(), Utc::now(), config.tz) {
        Ok(bounds) => bounds,
        Err(message) => return Ok(validation_error(message)),
    };
    let status = match status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<OrderStatus>() {
            Ok(s) => Some(s),
            Err(_) => return Ok(validation_error(format!("Invalid status: {}", raw))),
        },
        None => None,
    };

    let filter = OrderFilter {
        provider_id: Some(provider.provider_id),
        status,
        from,
        until,
        only_active_menus: false,
    };
    let ops = order_ops.clone();
    let result = web::block(move || ops.list_order_details(&filter)).await?;

    Ok(match result {
        Ok(orders) => HttpResponse::Ok().json(OrderDetailsListResponse::ok(orders)),
        Err(e) => {
            error!("provider_orders: {}", e);
            repository_error(&e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_prices_require_every_tier() {
        let missing = MenuPricesInput {
            full: Some(80),
            half: None,
            rice_only: Some(40),
        };
        assert_eq!(
            full_prices(missing),
            Err("Prices for full, half and riceOnly are required".to_string())
        );

        let negative = MenuPricesInput {
            full: Some(80),
            half: Some(-1),
            rice_only: Some(40),
        };
        assert_eq!(
            full_prices(negative),
            Err("Prices must not be negative".to_string())
        );

        let ok = MenuPricesInput {
            full: Some(80),
            half: Some(60),
            rice_only: Some(0),
        };
        assert_eq!(
            full_prices(ok),
            Ok(MenuPrices {
                full: 80,
                half: 60,
                rice_only: 0
            })
        );
    }
}
