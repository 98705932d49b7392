use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use fusion_payment_engine::traits::PaymentGatewayError;
use log::error;
use thiserror::Error;

use crate::data_objects::ApiResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    InvalidRequestBody(String),
    #[error("Checksum is required in the query string")]
    MissingChecksum,
    #[error("Invalid checksum")]
    InvalidChecksum,
    #[error("Valid order_id is required.")]
    InvalidOrderId,
    #[error("{0}")]
    NoRecordFound(String),
    #[error("Unknown endpoint.")]
    UnknownAction,
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingChecksum => StatusCode::BAD_REQUEST,
            Self::InvalidChecksum => StatusCode::BAD_REQUEST,
            Self::InvalidOrderId => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::UnknownAction => StatusCode::NOT_FOUND,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal failures are logged in full but reported generically. Everything else carries its message
        // verbatim in the standard envelope.
        let message = if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            error!("💻️ Internal server error: {self}");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::to_string(&ApiResponse::error(message)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Api Key token is required in header.")]
    MissingApiKey,
    #[error("Unauthorized. Invalid or expired token.")]
    InvalidApiKey,
}

impl From<PaymentGatewayError> for ServerError {
    fn from(e: PaymentGatewayError) -> Self {
        match e {
            PaymentGatewayError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            PaymentGatewayError::InvalidChecksum => Self::InvalidChecksum,
            PaymentGatewayError::InvalidPaymentStatus(s) => {
                Self::InvalidRequestBody(format!("Invalid payment status '{s}'."))
            },
            PaymentGatewayError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
