//! Extractor error mapping for inbound HTTP adapters.
//!
//! Malformed JSON bodies and unparseable path segments are rejected before a
//! handler runs. These helpers turn the Actix extractor failures into
//! `invalid_request` domain errors so clients see one error schema.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError};
use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Validation error codes for extractor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MalformedBody,
    UnsupportedMediaType,
    InvalidPathParameter,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::UnsupportedMediaType => "unsupported_media_type",
            ErrorCode::InvalidPathParameter => "invalid_path_parameter",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Path parameter naming the user in `/api/users/{id}`.
pub(crate) const USER_ID_PARAM: FieldName = FieldName::new("id");

pub(crate) fn malformed_body_error(err: &JsonPayloadError) -> Error {
    debug!(error = %err, "rejected request body");
    match err {
        JsonPayloadError::ContentType => {
            Error::invalid_request("Content-Type must be application/json")
                .with_details(json!({ "code": ErrorCode::UnsupportedMediaType.as_str() }))
        }
        _ => Error::invalid_request("Request body is not a valid user document")
            .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() })),
    }
}

pub(crate) fn invalid_path_error(field: FieldName, value: Option<&str>) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be an integer")).with_details(json!({
        "field": field,
        "value": value.unwrap_or_default(),
        "code": ErrorCode::InvalidPathParameter.as_str(),
    }))
}

/// JSON extractor configuration answering malformed bodies with 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed_body_error(&err).into())
}

/// Path extractor configuration answering bad ids with 400.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req: &HttpRequest| {
        debug!(error = %err, "rejected path parameter");
        invalid_path_error(USER_ID_PARAM, req.match_info().get(USER_ID_PARAM.as_str())).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    fn content_type_errors_name_the_media_type() {
        let error = malformed_body_error(&JsonPayloadError::ContentType);

        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "code": "unsupported_media_type" }))
        );
    }

    #[rstest]
    fn payload_errors_are_malformed_body() {
        let error = malformed_body_error(&JsonPayloadError::Overflow { limit: 1 });

        assert_eq!(error.details(), Some(&json!({ "code": "malformed_body" })));
    }

    #[rstest]
    fn path_errors_echo_the_value() {
        let error = invalid_path_error(USER_ID_PARAM, Some("abc"));

        assert_eq!(error.message(), "id must be an integer");
        assert_eq!(
            error.details(),
            Some(&json!({
                "field": "id",
                "value": "abc",
                "code": "invalid_path_parameter",
            }))
        );
    }
}
