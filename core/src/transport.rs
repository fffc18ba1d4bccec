//! The seam between the I/O-free core and whoever performs the HTTP call.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes an `HttpRequest` and hands back the raw response.
///
/// Non-2xx statuses are responses, not errors: implementations return them as
/// `Ok` and leave status interpretation to `StudentClient`. `Err` is reserved
/// for requests that never produced a response (refused connection, timeout,
/// unreadable body).
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }
}
