//! Request extractors that report malformed input as [Error::Validation].
//!
//! The stock axum extractors reject bad input with plain text bodies. These
//! wrappers keep the `{"message": ...}` shape used by every other error.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::Error;

/// A JSON request body.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected JSON body: {rejection}");
                Err(Error::Validation(rejection.body_text()))
            }
        }
    }
}

/// A path parameter, e.g. the ID in `/categories/update/{category_id}`.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(Error::Validation(rejection.body_text())),
        }
    }
}

/// A query string.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(Error::Validation(rejection.body_text())),
        }
    }
}

/// Unwrap an optional request field, or explain that `field` is required.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::Validation(format!("{field} is required")))
}

#[cfg(test)]
mod extract_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    use crate::Error;

    use super::{ApiJson, ApiPath, require};

    #[derive(Deserialize)]
    struct Body {
        name: String,
    }

    async fn echo(ApiPath(id): ApiPath<i64>, ApiJson(body): ApiJson<Body>) -> String {
        format!("{id} {}", body.name)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route("/echo/{id}", post(echo));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn accepts_valid_input() {
        let server = get_test_server();

        let response = server.post("/echo/7").json(&json!({"name": "ana"})).await;

        response.assert_status_ok();
        assert_eq!(response.text(), "7 ana");
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_error() {
        let server = get_test_server();

        let response = server
            .post("/echo/7")
            .text("{not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<serde_json::Value>()["message"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_error() {
        let server = get_test_server();

        let response = server.post("/echo/abc").json(&json!({"name": "ana"})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<serde_json::Value>()["message"].is_string());
    }

    #[test]
    fn require_names_the_missing_field() {
        assert_eq!(
            require::<i32>(None, "amount"),
            Err(Error::Validation("amount is required".to_owned()))
        );
        assert_eq!(require(Some(1), "amount"), Ok(1));
    }
}
