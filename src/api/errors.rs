use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::db::RepositoryError;
use crate::enums::common::GeneralResponse;

fn bad_request(message: String) -> Error {
    actix_web::error::InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(GeneralResponse::error(message)),
    )
    .into()
}

pub(crate) fn default_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    error!("Error in request: {} \n Error: {}", req.full_url(), err);
    let message = match err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        other => format!("Invalid request body: {}", other),
    };
    bad_request(message)
}

pub(crate) fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid query in {}: {}", req.full_url(), err);
    bad_request(format!("Invalid query parameters: {}", err))
}

pub(crate) fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    debug!("Invalid path {}: {}", req.path(), err);
    bad_request(format!("Invalid path parameter: {}", err))
}

pub(crate) fn status_for(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::ValidationError(_)
        | RepositoryError::InvalidState(_)
        | RepositoryError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Forbidden(_) => StatusCode::FORBIDDEN,
        RepositoryError::DatabaseError(_) | RepositoryError::ConnectionPoolError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// The message shown to clients; storage failures stay in the logs.
pub(crate) fn client_message(err: &RepositoryError) -> String {
    match err {
        RepositoryError::NotFound(m)
        | RepositoryError::ValidationError(m)
        | RepositoryError::Forbidden(m)
        | RepositoryError::InvalidState(m)
        | RepositoryError::AlreadyExists(m) => m.clone(),
        RepositoryError::DatabaseError(_) | RepositoryError::ConnectionPoolError(_) => {
            "Server error".to_string()
        }
    }
}

pub(crate) fn repository_error(err: &RepositoryError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(GeneralResponse::error(client_message(err)))
}

pub(crate) fn validation_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(GeneralResponse::error(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_statuses() {
        assert_eq!(
            status_for(&RepositoryError::NotFound("Menu not found".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&RepositoryError::InvalidState("Order is already approved".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RepositoryError::AlreadyExists("dup".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RepositoryError::Forbidden("no".into())),
            StatusCode::FORBIDDEN
        );
        let db = RepositoryError::DatabaseError(diesel::result::Error::RollbackTransaction);
        assert_eq!(status_for(&db), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(client_message(&db), "Server error");
    }
}
