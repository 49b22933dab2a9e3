//! Validated JSON extractor for automatic request validation.
//!
//! Deserializes the body and runs `validator` rules on it. Both malformed
//! JSON and rule violations answer 400 in the standard envelope; rule
//! violations also list the offending fields.

use crate::responses::ApiResponse;
use bistro_core::{field_errors, validation_errors_to_bistro_error, ErrorResponse};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that automatically validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let error_response = match self {
            Self::JsonError(rejection) => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: format!("Invalid JSON: {}", rejection.body_text()),
                details: None,
            },
            Self::ValidationError(errors) => {
                let details = field_errors(&errors);
                ErrorResponse::from_error(&validation_errors_to_bistro_error(errors))
                    .with_details(details)
            }
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(error_response)),
        )
            .into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
        title: String,
        #[validate(range(min = 0, message = "Quantity cannot be negative"))]
        quantity: i32,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let request = json_request(r#"{"title":"Soup","quantity":2}"#);
        let ValidatedJson(body) = ValidatedJson::<TestRequest>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.title, "Soup");
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        let request = json_request(r#"{"title":"ab","quantity":-1}"#);
        let rejection = ValidatedJson::<TestRequest>::from_request(request, &())
            .await
            .unwrap_err();

        match &rejection {
            ValidatedJsonRejection::ValidationError(errors) => {
                let fields = field_errors(errors);
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "quantity");
                assert_eq!(fields[1].message, "Title must be at least 3 characters");
            }
            ValidatedJsonRejection::JsonError(e) => panic!("Expected validation error, got {}", e),
        }

        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request(r#"{"title":"#);
        let rejection = ValidatedJson::<TestRequest>::from_request(request, &())
            .await
            .unwrap_err();

        assert!(matches!(rejection, ValidatedJsonRejection::JsonError(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
