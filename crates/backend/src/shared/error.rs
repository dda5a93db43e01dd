use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::system::auth::ErrorBody;
use sea_orm::DbErr;
use thiserror::Error;

/// Error of a request handler, rendered as `{ "error": message }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// A single row was expected but zero or several matched
    #[error("{0}")]
    NotAcceptable(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        let message = err.to_string();
        if message.contains("UNIQUE constraint failed") {
            Self::Conflict(message)
        } else if message.contains("NOT NULL constraint failed")
            || message.contains("FOREIGN KEY constraint failed")
        {
            Self::BadRequest(message)
        } else {
            Self::Internal(err.into())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_errors_are_client_errors() {
        let unique = ApiError::from(DbErr::Custom("UNIQUE constraint failed: deals.code".into()));
        assert_eq!(unique.status(), StatusCode::CONFLICT);

        let not_null = ApiError::from(DbErr::Custom("NOT NULL constraint failed: deals.amount".into()));
        assert_eq!(not_null.status(), StatusCode::BAD_REQUEST);

        let other = ApiError::from(DbErr::Custom("disk I/O error".into()));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
