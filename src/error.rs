use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr, sqlx};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid {param}: {message}")]
    InvalidArgument { param: &'static str, message: String },

    #[error("not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument { param, message: message.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "invalid_argument",
            AppError::NotFound => "not_found",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        let unavailable = match &err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => true,
            DbErr::Query(RuntimeErr::SqlxError(e)) | DbErr::Exec(RuntimeErr::SqlxError(e)) => {
                is_connection_error(e)
            },
            _ => false,
        };

        if unavailable {
            Self::StoreUnavailable(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound => return status.into_response(),
            AppError::InvalidArgument { .. } => self.to_string(),
            AppError::StoreUnavailable(cause) => {
                tracing::warn!(error = %cause, "store unavailable");
                "the catalog store is temporarily unavailable".to_string()
            },
            AppError::Internal(cause) => {
                tracing::error!(error = %cause, "internal error");
                "an internal error occurred".to_string()
            },
        };

        (status, Json(ErrorBody { error: self.kind(), message })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
