use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// A single violated field constraint.
///
/// `code` distinguishes the rule class: `required`, `format`, `length`,
/// `enum`, or `domain` (a negative salary is a domain error, not a format
/// error, and must be reported as such).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    /// One or more field constraints violated; lists every failing field.
    Validation(Vec<FieldError>),
    /// Uniqueness violation against existing data (duplicate email).
    Conflict(String),
    NotFound(String),
    /// The store cannot be reached; the only variant a caller may retry.
    StoreUnavailable(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(fields) => {
                let names: Vec<&str> = fields.iter().map(|e| e.field).collect();
                write!(f, "Validation failed: {}", names.join(", "))
            }
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Store Unavailable: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(fields) => HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                fields: Some(fields.clone()),
            }),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(ErrorResponse {
                error: msg.clone(),
                fields: None,
            }),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse {
                error: msg.clone(),
                fields: None,
            }),
            AppError::StoreUnavailable(msg) => {
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    error: msg.clone(),
                    fields: None,
                })
            }
        }
    }
}
