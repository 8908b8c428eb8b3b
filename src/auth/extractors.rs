use crate::auth::middleware::CurrentSession;
use crate::auth::principal::Principal;
use crate::enums::common::GeneralResponse;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};

fn rejection(status: StatusCode, message: &'static str) -> Error {
    InternalError::from_response(
        message,
        HttpResponse::build(status).json(GeneralResponse::error(message)),
    )
    .into()
}

fn unauthorized() -> Error {
    rejection(StatusCode::UNAUTHORIZED, "Unauthorized")
}

/// Any logged-in account.
pub struct PrincipalExtractor(pub Principal);

impl FromRequest for PrincipalExtractor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(p) = req.extensions().get::<Principal>() {
            return ready(Ok(PrincipalExtractor(*p)));
        }
        ready(Err(unauthorized()))
    }
}

pub struct UserPrincipal {
    user_id: i32,
}

impl UserPrincipal {
    pub fn user_id(&self) -> i32 {
        self.user_id
    }
}

impl FromRequest for UserPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Principal>() {
            Some(Principal::User { user_id }) => ready(Ok(UserPrincipal { user_id: *user_id })),
            Some(Principal::Provider { .. }) => ready(Err(rejection(
                StatusCode::FORBIDDEN,
                "Only users can perform this action",
            ))),
            None => ready(Err(unauthorized())),
        }
    }
}

pub struct ProviderPrincipal {
    pub provider_id: i32,
}

impl FromRequest for ProviderPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Principal>() {
            Some(Principal::Provider { provider_id }) => ready(Ok(ProviderPrincipal {
                provider_id: *provider_id,
            })),
            Some(Principal::User { .. }) => ready(Err(rejection(
                StatusCode::FORBIDDEN,
                "Only providers can perform this action",
            ))),
            None => ready(Err(unauthorized())),
        }
    }
}

/// The request's session, if any. Never fails; handlers that start a session use it
/// to keep writing to the same one.
pub struct MaybeSession(pub Option<CurrentSession>);

impl FromRequest for MaybeSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeSession(
            req.extensions().get::<CurrentSession>().cloned(),
        )))
    }
}
