//! Request-ID propagation middleware.
//!
//! Every request gets a UUID v4 request ID, available to handlers and
//! error rendering through a task-local, and echoed back to the client as
//! the `x-request-id` response header.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Request ID stored in request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

tokio::task_local! {
    static REQUEST_ID: String;
}

/// The request ID of the request currently being handled, if any.
///
/// `None` outside of a request scope (e.g. in startup code).
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(std::clone::Clone::clone).ok()
}

/// Middleware assigning a fresh request ID and echoing it in the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}
