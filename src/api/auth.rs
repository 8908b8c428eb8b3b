use crate::api::errors::{repository_error, validation_error};
use crate::auth::otp::{after_rejection, issue_otp, normalize_email, verify_otp};
use crate::auth::{MaybeSession, Principal, PrincipalExtractor, SessionStore};
use crate::config::AppConfig;
use crate::db::{RepositoryError, UserOperations};
use crate::enums::auth::{
    mobile_from_json, otp_from_json, GenerateOtpRequest, LoginRequest, UserResponse,
    VerifyOtpRequest,
};
use crate::enums::common::GeneralResponse;
use crate::mailer::templates::otp_email;
use crate::mailer::DynMailClient;
use crate::models::common::UserRole;
use crate::models::user::NewUser;
use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[utoipa::path(
    tag = "Auth",
    responses((status = 200, description = "Auth routes are reachable", body = String)),
    summary = "Health check for the auth routes"
)]
#[get("/test")]
pub(super) async fn auth_test() -> impl Responder {
    HttpResponse::Ok().body("working")
}

#[utoipa::path(
    tag = "Auth",
    request_body = GenerateOtpRequest,
    responses(
        (status = 200, description = "OTP mailed and stored in the session", body = GeneralResponse),
        (status = 400, description = "Email missing", body = GeneralResponse),
        (status = 500, description = "Mail could not be sent", body = GeneralResponse)
    ),
    summary = "Send a one-time password to an email address"
)]
#[post("/generate-otp")]
pub(super) async fn generate_otp(
    sessions: web::Data<SessionStore>,
    mailer: web::Data<DynMailClient>,
    config: web::Data<AppConfig>,
    session: MaybeSession,
    req_data: web::Json<GenerateOtpRequest>,
) -> actix_web::Result<impl Responder> {
    let Some(email) = non_blank(req_data.into_inner().email) else {
        return Ok(validation_error("Email required"));
    };

    let pending = issue_otp(&email, Utc::now(), config.session.otp_ttl_secs);
    let message = otp_email(
        &config.mail.otp_from,
        &email,
        pending.code,
        config.session.otp_ttl_secs / 60,
    );
    if let Err(e) = mailer.send(message).await {
        error!("generate_otp: failed to send OTP to {}: {}", email, e);
        return Ok(HttpResponse::InternalServerError()
            .json(GeneralResponse::error("Failed to send OTP")));
    }

    let (current_id, mut data) = match session.0 {
        Some(s) => (Some(s.id), s.data),
        None => (None, Default::default()),
    };
    data.otp = Some(pending);
    let id = sessions.save(current_id.as_deref(), data).await;

    debug!("generate_otp: OTP issued for {}", email);
    Ok(HttpResponse::Ok()
        .cookie(sessions.cookie(&id))
        .json(GeneralResponse::ok("OTP sent successfully")))
}

#[utoipa::path(
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP accepted, account logged in", body = UserResponse),
        (status = 400, description = "OTP missing, expired or wrong", body = GeneralResponse)
    ),
    summary = "Verify an OTP and sign up or log in"
)]
#[post("/verify-otp")]
pub(super) async fn verify_otp_handler(
    sessions: web::Data<SessionStore>,
    user_ops: web::Data<UserOperations>,
    session: MaybeSession,
    req_data: web::Json<VerifyOtpRequest>,
) -> actix_web::Result<impl Responder> {
    let body = req_data.into_inner();
    let Some(current) = session.0 else {
        return Ok(validation_error("OTP session expired"));
    };

    let email = body.email.as_deref().map(normalize_email).unwrap_or_default();
    // an unparseable code can never match
    let code = otp_from_json(body.otp.as_ref()).unwrap_or(0);
    if let Err(e) = verify_otp(current.data.otp.as_ref(), &email, code, Utc::now()) {
        debug!("verify_otp: rejected for '{}': {}", email, e);
        let mut data = current.data;
        data.otp = after_rejection(data.otp.take(), &e);
        sessions.save(Some(&current.id), data).await;
        return Ok(validation_error(e.to_string()));
    }

    let role = match body.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => UserRole::User,
        Some(raw) => match raw.parse::<UserRole>() {
            Ok(role) => role,
            Err(_) => return Ok(validation_error("Invalid role")),
        },
    };
    let name = non_blank(body.name);
    let password = body.password.filter(|p| !p.is_empty());
    let mobile = mobile_from_json(body.mobile.as_ref());
    let address = non_blank(body.address);

    let ops = user_ops.clone();
    let lookup_email = email.clone();
    let result = web::block(move || match ops.get_user_by_email(&lookup_email) {
        Err(RepositoryError::NotFound(_)) => {
            let (Some(name), Some(password)) = (name, password) else {
                return Err(RepositoryError::ValidationError(
                    "Name and password are required to create an account".to_string(),
                ));
            };
            ops.find_or_create_by_email(NewUser {
                name,
                mobile,
                address,
                email: lookup_email,
                password,
                role,
            })
            .map(|(user, _)| user)
        }
        other => other,
    })
    .await?;

    match result {
        Ok(user) => {
            let mut data = current.data;
            data.otp = None;
            data.principal = Some(Principal::from_role(user.user_id, user.role));
            let id = sessions.rotate(Some(&current.id), data).await;
            info!("verify_otp: user {} ({}) verified", user.user_id, user.email);
            Ok(HttpResponse::Ok()
                .cookie(sessions.cookie(&id))
                .json(UserResponse::ok(user)))
        }
        Err(e) => {
            error!("verify_otp: could not load or create '{}': {}", email, e);
            Ok(repository_error(&e))
        }
    }
}

#[utoipa::path(
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 400, description = "Email or password missing", body = GeneralResponse),
        (status = 401, description = "Wrong credentials", body = GeneralResponse)
    ),
    summary = "Log in with email and password"
)]
#[post("/login")]
pub(super) async fn login(
    sessions: web::Data<SessionStore>,
    user_ops: web::Data<UserOperations>,
    session: MaybeSession,
    req_data: web::Json<LoginRequest>,
) -> actix_web::Result<impl Responder> {
    let LoginRequest { email, password } = req_data.into_inner();
    let (Some(email), Some(password)) = (non_blank(email), password.filter(|p| !p.is_empty()))
    else {
        return Ok(validation_error("Email and password are required"));
    };

    let email = normalize_email(&email);
    let ops = user_ops.clone();
    let result = web::block(move || ops.authenticate(&email, &password)).await?;

    match result {
        Ok(Some(user)) => {
            let (current_id, mut data) = match session.0 {
                Some(s) => (Some(s.id), s.data),
                None => (None, Default::default()),
            };
            data.principal = Some(Principal::from_role(user.user_id, user.role));
            let id = sessions.rotate(current_id.as_deref(), data).await;
            debug!("login: user {} logged in", user.user_id);
            Ok(HttpResponse::Ok()
                .cookie(sessions.cookie(&id))
                .json(UserResponse::ok(user)))
        }
        Ok(None) => Ok(HttpResponse::Unauthorized()
            .json(GeneralResponse::error("Invalid email or password"))),
        Err(e) => {
            error!("login: {}", e);
            Ok(repository_error(&e))
        }
    }
}

#[utoipa::path(
    tag = "Auth",
    responses(
        (status = 200, description = "The logged-in account", body = UserResponse),
        (status = 401, description = "No session", body = GeneralResponse)
    ),
    summary = "Current session's account"
)]
#[get("/me")]
pub(super) async fn me(
    user_ops: web::Data<UserOperations>,
    principal: PrincipalExtractor,
) -> actix_web::Result<impl Responder> {
    let id = principal.0.id();
    let ops = user_ops.clone();
    let result = web::block(move || ops.get_user(id)).await?;

    Ok(match result {
        Ok(user) => HttpResponse::Ok().json(UserResponse::ok(user)),
        Err(e) => repository_error(&e),
    })
}

#[utoipa::path(
    tag = "Auth",
    responses((status = 200, description = "Session destroyed", body = GeneralResponse)),
    summary = "Log out"
)]
#[post("/logout")]
pub(super) async fn logout(
    sessions: web::Data<SessionStore>,
    session: MaybeSession,
) -> impl Responder {
    if let Some(current) = session.0 {
        sessions.destroy(&current.id).await;
    }
    HttpResponse::Ok()
        .cookie(sessions.removal_cookie())
        .json(GeneralResponse::ok("Logged out"))
}
