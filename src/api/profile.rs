use crate::api::errors::{repository_error, validation_error};
use crate::auth::PrincipalExtractor;
use crate::config::AppConfig;
use crate::db::UserOperations;
use crate::enums::common::GeneralResponse;
use crate::enums::users::{ContactRequest, ProfileResponse, UpdateNameRequest, UpdatePasswordRequest};
use crate::mailer::templates::contact_email;
use crate::mailer::DynMailClient;
use actix_web::{post, web, HttpResponse, Responder};

#[utoipa::path(
    tag = "Profile",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = GeneralResponse),
        (status = 400, description = "Wrong old password or unchanged password", body = GeneralResponse),
        (status = 404, description = "User not found", body = GeneralResponse)
    ),
    summary = "Change the session account's password"
)]
#[post("/update-pass")]
pub(super) async fn update_password(
    user_ops: web::Data<UserOperations>,
    principal: PrincipalExtractor,
    req_data: web::Json<UpdatePasswordRequest>,
) -> actix_web::Result<impl Responder> {
    let UpdatePasswordRequest {
        old_password,
        new_password,
    } = req_data.into_inner();
    let (Some(old_password), Some(new_password)) =
        (old_password, new_password.filter(|p| !p.is_empty()))
    else {
        return Ok(validation_error("oldPassword and newPassword are required"));
    };

    let uid = principal.0.id();
    let ops = user_ops.clone();
    let result = web::block(move || ops.update_password(uid, &old_password, &new_password)).await?;

    Ok(match result {
        Ok(()) => {
            info!("update_password: user {} changed password", uid);
            HttpResponse::Ok().json(GeneralResponse::ok("Password updated successfully"))
        }
        Err(e) => {
            debug!("update_password: user {}: {}", uid, e);
            repository_error(&e)
        }
    })
}

#[utoipa::path(
    tag = "Profile",
    request_body = UpdateNameRequest,
    responses(
        (status = 200, description = "Name changed", body = ProfileResponse),
        (status = 400, description = "Empty name", body = GeneralResponse),
        (status = 404, description = "User not found", body = GeneralResponse)
    ),
    summary = "Change the session account's display name"
)]
#[post("/update-name")]
pub(super) async fn update_name(
    user_ops: web::Data<UserOperations>,
    principal: PrincipalExtractor,
    req_data: web::Json<UpdateNameRequest>,
) -> actix_web::Result<impl Responder> {
    let Some(new_name) = req_data
        .into_inner()
        .new_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
    else {
        return Ok(validation_error("newName is required"));
    };

    let uid = principal.0.id();
    let ops = user_ops.clone();
    let result = web::block(move || ops.update_name(uid, &new_name)).await?;

    Ok(match result {
        Ok(user) => HttpResponse::Ok().json(ProfileResponse::ok(user)),
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "Profile",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message forwarded to the support inbox", body = GeneralResponse),
        (status = 400, description = "Subject or message missing", body = GeneralResponse),
        (status = 404, description = "User not found", body = GeneralResponse),
        (status = 500, description = "Mail could not be sent", body = GeneralResponse)
    ),
    summary = "Mail the support inbox on behalf of the session account"
)]
#[post("/contact-through-email")]
pub(super) async fn contact_through_email(
    user_ops: web::Data<UserOperations>,
    mailer: web::Data<DynMailClient>,
    config: web::Data<AppConfig>,
    principal: PrincipalExtractor,
    req_data: web::Json<ContactRequest>,
) -> actix_web::Result<impl Responder> {
    let ContactRequest { subject, message } = req_data.into_inner();
    let (Some(subject), Some(message)) = (
        subject.filter(|s| !s.trim().is_empty()),
        message.filter(|m| !m.trim().is_empty()),
    ) else {
        return Ok(validation_error("All fields are required"));
    };

    let uid = principal.0.id();
    let ops = user_ops.clone();
    let user = match web::block(move || ops.get_user(uid)).await? {
        Ok(user) => user,
        Err(e) => return Ok(repository_error(&e)),
    };

    let mail = contact_email(
        &config.mail.contact_from,
        &config.mail.contact_to,
        user.user_id,
        &user.email,
        &subject,
        &message,
    );
    if let Err(e) = mailer.send(mail).await {
        error!("contact_through_email: user {}: {}", uid, e);
        return Ok(HttpResponse::InternalServerError()
            .json(GeneralResponse::error("Error sending contact email")));
    }

    Ok(HttpResponse::Ok().json(GeneralResponse::ok(
        "Your message has been sent to the developer",
    )))
}
