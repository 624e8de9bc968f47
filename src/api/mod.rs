//! JSON request/response boundary.
//!
//! Requests are tagged by an `action` field and carry the same field names
//! as the scanner and admin pages (`qrCode`, `fullName`, `userId`, ...).
//! Every error is turned into a status code plus `{ "error": ... }`;
//! internal details never leave this module.

mod request;
mod service;

pub use request::{ApiRequest, IdValue};
pub use service::Service;

use serde::Serialize;
use serde_json::{Value, json};

/// Status code and JSON body of one handled request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
