//! Per-client request throttling.
//!
//! Each client IP gets a bucket of `limit` requests that refills evenly over
//! `window`. A request arriving with an empty bucket is answered with
//! `429 Too Many Requests` and never reaches the handler.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::warn;

use crate::domain::Error as DomainError;

pub const DEFAULT_THROTTLE_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(60_000);
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests, please try again later";

/// Buckets are pruned once this many clients are tracked.
const SWEEP_ABOVE_CLIENTS: usize = 4096;
const UNKNOWN_CLIENT: &str = "unknown";

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// How many requests a client may make per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    limit: NonZeroU32,
    window: Duration,
}

impl ThrottlePolicy {
    pub const fn new(limit: NonZeroU32, window: Duration) -> Self {
        Self { limit, window }
    }

    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn quota(&self) -> Quota {
        let replenish = (self.window / self.limit.get()).max(Duration::from_nanos(1));
        match Quota::with_period(replenish) {
            Some(quota) => quota.allow_burst(self.limit),
            None => Quota::per_second(self.limit),
        }
    }
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_LIMIT, DEFAULT_THROTTLE_WINDOW)
    }
}

/// Middleware factory sharing one limiter across every worker.
///
/// Build it once outside the `HttpServer` factory closure and clone it in;
/// constructing it per worker would give each worker its own buckets.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use weather_gateway::middleware::{Throttle, ThrottlePolicy};
///
/// let throttle = Throttle::new(ThrottlePolicy::default());
/// let _app = App::new().wrap(throttle.clone());
/// ```
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<KeyedLimiter>,
}

impl Throttle {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::keyed(policy.quota())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Throttle
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ThrottleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ThrottleMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

/// Service wrapper produced by [`Throttle`].
pub struct ThrottleMiddleware<S> {
    service: S,
    limiter: Arc<KeyedLimiter>,
}

/// Socket peer IP. Forwarding headers are ignored since any client can set
/// them.
fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map_or_else(|| UNKNOWN_CLIENT.to_owned(), |addr| addr.ip().to_string())
}

impl<S> ThrottleMiddleware<S> {
    fn sweep_if_crowded(&self) {
        if self.limiter.len() > SWEEP_ABOVE_CLIENTS {
            self.limiter.retain_recent();
            self.limiter.shrink_to_fit();
        }
    }
}

impl<S, B> Service<ServiceRequest> for ThrottleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(&req);
        if self.limiter.check_key(&client).is_err() {
            warn!(%client, path = %req.path(), "request throttled");
            let rejected = req
                .error_response(DomainError::too_many_requests(TOO_MANY_REQUESTS_MESSAGE))
                .map_into_right_body();
            return Box::pin(ready(Ok(rejected)));
        }
        self.sweep_if_crowded();

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
