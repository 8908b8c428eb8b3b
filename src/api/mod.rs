mod analytic;
mod auth;
mod errors;
mod orders;
mod profile;
mod provider;
mod users;

use crate::AppState;
use actix_web::middleware::NormalizePath;
use actix_web::{get, web, HttpResponse, Responder};
use utoipa::OpenApi;
use utoipa_actix_web::{scope, service_config::ServiceConfig};

use errors::{default_error_handler, path_error_handler, query_error_handler};

#[derive(OpenApi)]
#[openapi(
    info(title = "Tiffin marketplace API"),
    tags(
        (name = "Auth", description = "OTP signup, login and sessions"),
        (name = "Provider", description = "Menus and incoming orders"),
        (name = "Orders", description = "Order placement, lifecycle and daily summaries"),
        (name = "Analytics", description = "Provider revenue reports"),
        (name = "Profile", description = "Account maintenance"),
        (name = "User", description = "Favorites and provider listing")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    tag = "Health",
    responses((status = 200, description = "Server is up", body = String))
)]
#[get("/")]
async fn root_endpoint() -> impl Responder {
    HttpResponse::Ok().body("Server up!")
}

pub async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> impl Responder {
    HttpResponse::Ok().json(doc.get_ref())
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(default_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

pub fn configure(cfg: &mut ServiceConfig, state: &AppState) {
    let config = web::Data::new(state.config.clone());
    let sessions = web::Data::new(state.sessions.clone());
    let mailer = web::Data::new(state.mailer.clone());
    let user_ops = web::Data::new(state.user_ops.clone());
    let menu_ops = web::Data::new(state.menu_ops.clone());
    let order_ops = web::Data::new(state.order_ops.clone());
    let favorite_ops = web::Data::new(state.favorite_ops.clone());
    let analytics_ops = web::Data::new(state.analytics_ops.clone());

    cfg.service(root_endpoint)
        .service(
            scope::scope("/auth")
                .wrap(NormalizePath::trim())
                .app_data(config.clone())
                .app_data(sessions.clone())
                .app_data(mailer.clone())
                .app_data(user_ops.clone())
                .service(auth::auth_test)
                .service(auth::generate_otp)
                .service(auth::verify_otp_handler)
                .service(auth::login)
                .service(auth::me)
                .service(auth::logout),
        )
        .service(
            scope::scope("/provider")
                .wrap(NormalizePath::trim())
                .app_data(config.clone())
                .app_data(menu_ops.clone())
                .app_data(order_ops.clone())
                .service(provider::create_menu)
                .service(provider::list_menus)
                .service(provider::get_menu)
                .service(provider::update_menu)
                .service(provider::delete_menu)
                .service(provider::provider_orders),
        )
        .service(
            scope::scope("/orders")
                .wrap(NormalizePath::trim())
                .app_data(config.clone())
                .app_data(order_ops.clone())
                .service(orders::place_order)
                .service(orders::list_my_orders)
                // literal paths first so they are not taken for an order id
                .service(orders::orders_summary)
                .service(orders::provider_summary)
                .service(orders::get_order)
                .service(orders::approve_order)
                .service(orders::reject_order)
                .service(orders::cancel_order),
        )
        .service(
            scope::scope("/analytic")
                .wrap(NormalizePath::trim())
                .app_data(config.clone())
                .app_data(analytics_ops)
                .service(analytic::monthly_revenue_handler)
                .service(analytic::overall_summary_handler)
                .service(analytic::growth_rate_handler)
                .service(analytic::best_sellers_handler)
                .service(analytic::daily_revenue_trend_handler)
                .service(analytic::avg_order_value_handler),
        )
        .service(
            scope::scope("/profile")
                .wrap(NormalizePath::trim())
                .app_data(config)
                .app_data(mailer)
                .app_data(user_ops.clone())
                .service(profile::update_password)
                .service(profile::update_name)
                .service(profile::contact_through_email),
        )
        .service(
            scope::scope("/user")
                .wrap(NormalizePath::trim())
                .app_data(favorite_ops)
                .app_data(user_ops)
                .service(users::add_favorite)
                .service(users::list_favorites)
                .service(users::remove_favorite)
                .service(users::list_providers),
        );
}
