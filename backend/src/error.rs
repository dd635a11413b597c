use actix_web::HttpResponse;
use thiserror::Error;

/// Failures surfaced by the form engine.
///
/// Malformed numbers, dates and booleans inside an archive are not errors: the
/// decoder substitutes a default. A duplicate form title on import is not an
/// error either; it is resolved by overwriting or renaming.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid feed document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cipher error: {0}")]
    Cipher(String),
}

pub type Result<T> = std::result::Result<T, FormError>;

impl From<fs_extra::error::Error> for FormError {
    fn from(e: fs_extra::error::Error) -> Self {
        FormError::Io(std::io::Error::other(e.to_string()))
    }
}

impl FormError {
    /// Maps the failure onto the response the admin endpoints return.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            FormError::NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
            FormError::Validation(_) => HttpResponse::BadRequest().body(self.to_string()),
            _ => HttpResponse::ServiceUnavailable().body(format!("Error: {}", self)),
        }
    }
}
