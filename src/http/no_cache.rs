//! Anti-cache response decorator
//!
//! [`NoCache`] wraps any `hyper` service and appends the three headers that
//! stop browsers and intermediaries from storing a response. The wrapped
//! service decides status and headers first; the decorator runs after it and
//! before `hyper` serializes the header block, so error responses are covered
//! as well.

use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::service::Service;
use hyper::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";
pub const PRAGMA_VALUE: &str = "no-cache";
pub const EXPIRES_VALUE: &str = "0";

/// Append the anti-cache headers, keeping whatever is already present
pub fn apply_no_cache_headers(headers: &mut HeaderMap) {
    headers.append(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.append(PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
    headers.append(EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}

/// Service decorator adding anti-cache headers to every response
#[derive(Debug, Clone)]
pub struct NoCache<S> {
    inner: S,
}

impl<S> NoCache<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for NoCache<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = NoCacheFuture<S::Future>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        NoCacheFuture {
            inner: Box::pin(self.inner.call(req)),
        }
    }
}

/// Response future of [`NoCache`]
pub struct NoCacheFuture<F> {
    inner: Pin<Box<F>>,
}

impl<F, B, E> Future for NoCacheFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<B>, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx).map_ok(|mut response| {
            apply_no_cache_headers(response.headers_mut());
            response
        })
    }
}
