//! API boundary helpers shared by REST modules: a plain-text error type
//! and a JSON body extractor that does not insist on a `Content-Type`.

pub mod error;
pub mod json;

pub use error::{ApiError, ApiResult};
pub use json::{JsonPayload, JsonPayloadRejection};
