//! JSON response helpers.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::handler::HttpResponse;

/// `Content-Type` value for JSON responses.
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Serializes `payload` as the JSON body of a response with `status`.
///
/// If serialization fails the failure is logged and a `500` with an
/// error body is returned instead.
pub fn respond_with_json<T>(status: StatusCode, payload: &T) -> HttpResponse
where
    T: Serialize + ?Sized,
{
    match serde_json::to_vec(payload) {
        Ok(body) => json_response(status, Bytes::from(body)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response payload");
            respond_with_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to serialize response",
            )
        }
    }
}

/// Responds with `{"error": message}` and the given status.
pub fn respond_with_error(status: StatusCode, message: &str) -> HttpResponse {
    let body = serde_json::to_vec(&ErrorBody { error: message })
        .map_or_else(|_| Bytes::from_static(b"{}"), Bytes::from);
    json_response(status, body)
}

fn json_response(status: StatusCode, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::ser::Error as _;
    use std::collections::BTreeMap;

    async fn body_string(response: HttpResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_respond_with_json() {
        let mut payload = BTreeMap::new();
        payload.insert("id", 42);

        let response = respond_with_json(StatusCode::CREATED, &payload);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(body_string(response).await, r#"{"id":42}"#);
    }

    #[tokio::test]
    async fn test_respond_with_json_string() {
        let response = respond_with_json(StatusCode::OK, "Hello, World!");
        assert_eq!(body_string(response).await, r#""Hello, World!""#);
    }

    #[tokio::test]
    async fn test_respond_with_error() {
        let response = respond_with_error(StatusCode::BAD_REQUEST, "missing \"id\"");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(body_string(response).await, r#"{"error":"missing \"id\""}"#);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not today"))
        }
    }

    #[tokio::test]
    async fn test_serialization_failure_is_500() {
        let response = respond_with_json(StatusCode::OK, &Unserializable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"failed to serialize response"}"#
        );
    }
}
