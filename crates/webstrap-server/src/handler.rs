//! Type-erased request handlers.
//!
//! A [`Handler`] takes the fully-buffered request, with its matched
//! [`PathVars`](webstrap_router::PathVars) stored in the request
//! extensions, and produces a response.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use webstrap_server::{handler, respond_with_json, Handler};
//!
//! let hello: Handler = handler(|_req: Request<Bytes>| async {
//!     respond_with_json(StatusCode::OK, "Hello, World!")
//! });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Type alias for a boxed handler future.
pub type BoxedResponse = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;

/// A type-erased handler function.
pub type Handler = Arc<dyn Fn(Request<Bytes>) -> BoxedResponse + Send + Sync>;

/// Wraps an async function or closure as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use http_body_util::BodyExt;

    async fn echo(req: Request<Bytes>) -> HttpResponse {
        Response::new(Full::new(req.into_body()))
    }

    #[tokio::test]
    async fn test_handler_from_fn() {
        let h = handler(echo);
        let response = h(Request::new(Bytes::from_static(b"ping"))).await;

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ping");
    }

    #[tokio::test]
    async fn test_handler_from_closure_with_state() {
        let greeting = Arc::new(String::from("hi"));
        let h = handler(move |_req| {
            let greeting = Arc::clone(&greeting);
            async move {
                Response::builder()
                    .status(StatusCode::ACCEPTED)
                    .body(Full::new(Bytes::from(greeting.as_bytes().to_vec())))
                    .unwrap()
            }
        });

        let response = h(Request::new(Bytes::new())).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_handler_is_shareable() {
        let h = handler(echo);
        let clone = Arc::clone(&h);

        let task = tokio::spawn(async move { clone(Request::new(Bytes::from_static(b"a"))).await });
        let response = task.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
