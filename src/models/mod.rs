use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub mod client;
pub mod common;
pub mod dates;
pub mod generation;
pub mod program;
pub mod progress;
pub mod session;
pub mod user;

/// A rejected request body; the message is shown to the caller as-is.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub(crate) fn required_text(
    value: Option<String>,
    message: &str,
) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError(message.to_string()))
}

pub(crate) fn check_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: Option<T>,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < min || v > max => Err(ValidationError(format!(
            "{} doit être compris entre {} et {}",
            field, min, max
        ))),
        _ => Ok(()),
    }
}

/// Client fields embedded in program, session and progress responses.
#[derive(Debug, Clone, Serialize)]
pub struct ClientRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramRef {
    pub id: Uuid,
    pub name: String,
}
