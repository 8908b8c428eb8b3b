use crate::api::errors::repository_error;
use crate::auth::UserPrincipal;
use crate::db::{FavoriteOperations, UserOperations};
use crate::enums::common::GeneralResponse;
use crate::enums::users::{FavoritesResponse, ProvidersResponse};
use actix_web::{delete, get, post, web, HttpResponse, Responder};

#[utoipa::path(
    tag = "User",
    params(("provider_id" = i32, Path, description = "Provider to favorite")),
    responses(
        (status = 201, description = "Provider is in the favorites", body = FavoritesResponse),
        (status = 404, description = "No such provider", body = GeneralResponse)
    ),
    summary = "Add a provider to the session user's favorites"
)]
#[post("/favorites/{provider_id}")]
pub(super) async fn add_favorite(
    favorite_ops: web::Data<FavoriteOperations>,
    user: UserPrincipal,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    let provider_id = path.into_inner().0;
    let uid = user.user_id();
    let ops = favorite_ops.clone();
    let result = web::block(move || ops.add_favorite(uid, provider_id)).await?;

    Ok(match result {
        Ok(favorites) => {
            debug!("add_favorite: user {} favorited {}", uid, provider_id);
            HttpResponse::Created().json(FavoritesResponse::ok(favorites))
        }
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "User",
    responses(
        (status = 200, description = "Favorite providers", body = FavoritesResponse),
        (status = 404, description = "No favorites yet", body = GeneralResponse)
    ),
    summary = "The session user's favorite providers"
)]
#[get("/favorites")]
pub(super) async fn list_favorites(
    favorite_ops: web::Data<FavoriteOperations>,
    user: UserPrincipal,
) -> actix_web::Result<impl Responder> {
    let uid = user.user_id();
    let ops = favorite_ops.clone();
    let result = web::block(move || ops.list_favorites(uid)).await?;

    Ok(match result {
        Ok(favorites) if favorites.is_empty() => HttpResponse::NotFound()
            .json(GeneralResponse::error("No favorite providers found")),
        Ok(favorites) => HttpResponse::Ok().json(FavoritesResponse::ok(favorites)),
        Err(e) => {
            error!("list_favorites: user {}: {}", uid, e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "User",
    params(("provider_id" = i32, Path, description = "Provider to remove")),
    responses(
        (status = 200, description = "Remaining favorites", body = FavoritesResponse),
        (status = 404, description = "User has no favorites record", body = GeneralResponse)
    ),
    summary = "Remove a provider from the session user's favorites"
)]
#[delete("/favorites/{provider_id}")]
pub(super) async fn remove_favorite(
    favorite_ops: web::Data<FavoriteOperations>,
    user: UserPrincipal,
    path: web::Path<(i32,)>,
) -> actix_web::Result<impl Responder> {
    let provider_id = path.into_inner().0;
    let uid = user.user_id();
    let ops = favorite_ops.clone();
    let result = web::block(move || ops.remove_favorite(uid, provider_id)).await?;

    Ok(match result {
        Ok(favorites) => HttpResponse::Ok().json(FavoritesResponse::ok(favorites)),
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "User",
    responses((status = 200, description = "Every provider", body = ProvidersResponse)),
    summary = "List providers"
)]
#[get("/providers")]
pub(super) async fn list_providers(
    user_ops: web::Data<UserOperations>,
) -> actix_web::Result<impl Responder> {
    let ops = user_ops.clone();
    let result = web::block(move || ops.list_providers()).await?;

    Ok(match result {
        Ok(providers) => HttpResponse::Ok().json(ProvidersResponse {
            status: "ok".to_string(),
            count: providers.len(),
            data: providers,
            error: None,
        }),
        Err(e) => {
            error!("list_providers: {}", e);
            repository_error(&e)
        }
    })
}
