use crate::api::errors::{repository_error, validation_error};
use crate::auth::{PrincipalExtractor, ProviderPrincipal, UserPrincipal};
use crate::config::AppConfig;
use crate::db::{OrderFilter, OrderOperations};
use crate::enums::common::GeneralResponse;
use crate::enums::orders::{
    OrderListResponse, OrderResponse, OrdersSummaryResponse, PlaceOrderRequest,
    ProviderSummaryQuery, SummaryQuery,
};
use crate::models::common::{OrderStatus, UserRole};
use crate::services::day_window::resolve_day;
use crate::services::lifecycle::OrderAction;
use crate::services::summary::summarize_orders;
use actix_web::{get, post, put, web, HttpResponse, Responder};
use chrono::Utc;

#[utoipa::path(
    tag = "Orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed as pending", body = OrderResponse),
        (status = 400, description = "Missing fields, bad meal type, sabji or quantity", body = GeneralResponse),
        (status = 403, description = "Only users can place orders", body = GeneralResponse),
        (status = 404, description = "Menu missing or deleted", body = GeneralResponse)
    ),
    summary = "Place an order against a menu"
)]
#[post("")]
pub(super) async fn place_order(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    req_data: web::Json<PlaceOrderRequest>,
) -> actix_web::Result<impl Responder> {
    let PlaceOrderRequest { menu_id, items } = req_data.into_inner();
    let (Some(menu_id), Some(items)) = (menu_id, items.filter(|i| !i.is_empty())) else {
        return Ok(validation_error("menuId and items are required"));
    };

    if principal.0.role() != UserRole::User {
        return Ok(HttpResponse::Forbidden()
            .json(GeneralResponse::error("Only users can place orders")));
    }

    let uid = principal.0.id();
    let ops = order_ops.clone();
    let result = web::block(move || ops.place_order(uid, menu_id, &items)).await?;

    match result {
        Ok(order) => {
            info!(
                "place_order: order {} placed by user {} on menu {} for {}",
                order.order.order_id, uid, menu_id, order.order.grand_total
            );
            Ok(HttpResponse::Created().json(OrderResponse::ok(order)))
        }
        Err(e) => {
            debug!("place_order: user {} on menu {}: {}", uid, menu_id, e);
            Ok(repository_error(&e))
        }
    }
}

#[utoipa::path(
    tag = "Orders",
    responses(
        (status = 200, description = "The session user's orders, newest first", body = OrderListResponse),
        (status = 401, description = "No session", body = GeneralResponse)
    ),
    summary = "Orders placed by the session's user"
)]
#[get("")]
pub(super) async fn list_my_orders(
    order_ops: web::Data<OrderOperations>,
    user: UserPrincipal,
) -> actix_web::Result<impl Responder> {
    let uid = user.user_id();
    let ops = order_ops.clone();
    let result = web::block(move || ops.list_user_orders(uid)).await?;

    Ok(match result {
        Ok(orders) => HttpResponse::Ok().json(OrderListResponse::ok(orders)),
        Err(e) => {
            error!("list_my_orders: user {}: {}", uid, e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Orders",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Tiffin counts and approved revenue for the day", body = OrdersSummaryResponse),
        (status = 400, description = "Invalid date", body = GeneralResponse)
    ),
    summary = "Daily order summary across providers"
)]
#[get("/summary")]
pub(super) async fn orders_summary(
    order_ops: web::Data<OrderOperations>,
    config: web::Data<AppConfig>,
    _principal: PrincipalExtractor,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let (day, from, until) = match resolve_day(query.date.as_deref(), Utc::now(), config.tz) {
        Ok(bounds) => bounds,
        Err(message) => return Ok(validation_error(message)),
    };

    let filter = OrderFilter {
        provider_id: None,
        status: None,
        from,
        until,
        only_active_menus: true,
    };
    let ops = order_ops.clone();
    let result = web::block(move || ops.list_order_details(&filter)).await?;

    Ok(match result {
        Ok(orders) => {
            HttpResponse::Ok().json(OrdersSummaryResponse::ok(summarize_orders(day, None, orders)))
        }
        Err(e) => {
            error!("orders_summary: {}", e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Orders",
    params(ProviderSummaryQuery),
    responses(
        (status = 200, description = "Approved orders of one provider for the day", body = OrdersSummaryResponse),
        (status = 400, description = "provider_id missing or invalid date", body = GeneralResponse)
    ),
    summary = "Daily summary of one provider's approved orders"
)]
#[get("/summary/provider")]
pub(super) async fn provider_summary(
    order_ops: web::Data<OrderOperations>,
    config: web::Data<AppConfig>,
    _principal: PrincipalExtractor,
    query: web::Query<ProviderSummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let ProviderSummaryQuery { provider_id, date } = query.into_inner();
    let Some(provider_id) = provider_id else {
        return Ok(validation_error("provider_id is required"));
    };
    let (day, from, until) = match resolve_day(date.as_deref(), Utc::now(), config.tz) {
        Ok(bounds) => bounds,
        Err(message) => return Ok(validation_error(message)),
    };

    let filter = OrderFilter {
        provider_id: Some(provider_id),
        status: Some(OrderStatus::Approved),
        from,
        until,
        only_active_menus: true,
    };
    let ops = order_ops.clone();
    let result = web::block(move || ops.list_order_details(&filter)).await?;

    Ok(match result {
        Ok(orders) => HttpResponse::Ok().json(OrdersSummaryResponse::ok(summarize_orders(
            day,
            Some(provider_id),
            orders,
        ))),
        Err(e) => {
            error!("provider_summary: provider {}: {}", provider_id, e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 404, description = "Missing or not visible to the session", body = GeneralResponse)
    ),
    summary = "Get an order of the session's user or provider"
)]
#[get("/{id}")]
pub(super) async fn get_order(
    order_ops: web::Data<OrderOperations>,
    principal: PrincipalExtractor,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner().0;
    let viewer = principal.0.id();
    let ops = order_ops.clone();
    let result = web::block(move || ops.get_order_for(viewer, id)).await?;

    Ok(match result {
        Ok(order) => HttpResponse::Ok().json(OrderResponse::ok(order)),
        Err(e) => repository_error(&e),
    })
}

async fn apply_action(
    order_ops: web::Data<OrderOperations>,
    actor: i32,
    id: i32,
    action: OrderAction,
) -> actix_web::Result<HttpResponse> {
    let ops = order_ops.clone();
    let result = web::block(move || ops.transition(actor, id, action, Utc::now())).await?;

    Ok(match result {
        Ok(order) => {
            info!(
                "{:?}: order {} is now {} (by {})",
                action, id, order.order.status, actor
            );
            HttpResponse::Ok().json(OrderResponse::ok(order))
        }
        Err(e) => {
            debug!("{:?}: order {} by {}: {}", action, id, actor, e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order approved", body = OrderResponse),
        (status = 400, description = "Order is not pending", body = GeneralResponse),
        (status = 403, description = "Order belongs to another provider", body = GeneralResponse),
        (status = 404, description = "Order not found", body = GeneralResponse)
    ),
    summary = "Approve a pending order"
)]
#[put("/{id}/approve")]
pub(super) async fn approve_order(
    order_ops: web::Data<OrderOperations>,
    provider: ProviderPrincipal,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    apply_action(
        order_ops,
        provider.provider_id,
        path.into_inner().0,
        OrderAction::Approve,
    )
    .await
}

#[utoipa::path(
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order rejected", body = OrderResponse),
        (status = 400, description = "Order is not pending", body = GeneralResponse),
        (status = 403, description = "Order belongs to another provider", body = GeneralResponse),
        (status = 404, description = "Order not found", body = GeneralResponse)
    ),
    summary = "Reject a pending order"
)]
#[put("/{id}/reject")]
pub(super) async fn reject_order(
    order_ops: web::Data<OrderOperations>,
    provider: ProviderPrincipal,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    apply_action(
        order_ops,
        provider.provider_id,
        path.into_inner().0,
        OrderAction::Reject,
    )
    .await
}

#[utoipa::path(
    tag = "Orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 400, description = "Order is not pending or the cancellation window has passed", body = GeneralResponse),
        (status = 403, description = "Order belongs to another user", body = GeneralResponse),
        (status = 404, description = "Order not found", body = GeneralResponse)
    ),
    summary = "Cancel a pending order shortly after placing it"
)]
#[put("/{id}/cancel")]
pub(super) async fn cancel_order(
    order_ops: web::Data<OrderOperations>,
    user: UserPrincipal,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    apply_action(order_ops, user.user_id(), path.into_inner().0, OrderAction::Cancel).await
}
