//! Admission middleware - puts the gate in front of every route.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use futures::TryFutureExt;
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::marker::PhantomData;
use std::sync::Arc;

use gamenight_core::ClientKey;
use gamenight_core::ports::{Annotate, RETRY_AFTER_HEADER, Rejectable, Rejection};
use gamenight_infra::AdmissionGate;
use gamenight_shared::ErrorResponse;

/// Admission middleware factory.
pub struct AdmissionMiddleware {
    gate: Arc<AdmissionGate>,
    trust_proxy: bool,
}

impl AdmissionMiddleware {
    /// With `trust_proxy`, clients are keyed on `Forwarded`/`X-Forwarded-For`
    /// instead of the socket peer.
    pub fn new(gate: Arc<AdmissionGate>, trust_proxy: bool) -> Self {
        Self { gate, trust_proxy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdmissionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdmissionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdmissionMiddlewareService {
            service,
            gate: self.gate.clone(),
            trust_proxy: self.trust_proxy,
        }))
    }
}

pub struct AdmissionMiddlewareService<S> {
    service: S,
    gate: Arc<AdmissionGate>,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for AdmissionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = client_key(&req, self.trust_proxy);

        let gated = self.gate.handle(Inbound(req, PhantomData), &key, |Inbound(req, _)| {
            self.service
                .call(req)
                .map_ok(|res| Outbound(res.map_into_left_body()))
        });

        Box::pin(gated.map_ok(|Outbound(res)| res))
    }
}

/// Resolve the bucket a request is counted against.
fn client_key(req: &ServiceRequest, trust_proxy: bool) -> ClientKey {
    let info = req.connection_info();
    let addr = if trust_proxy {
        info.realip_remote_addr()
    } else {
        info.peer_addr()
    };

    addr.map(ClientKey::from).unwrap_or_else(ClientKey::unknown)
}

/// An inbound request as seen by the gate, tagged with the body type the
/// inner service produces.
struct Inbound<B>(ServiceRequest, PhantomData<fn() -> B>);

impl<B> Rejectable for Inbound<B> {
    type Response = Outbound<B>;

    fn reject(self, rejection: &Rejection) -> Self::Response {
        let error = ErrorResponse::too_many_requests(rejection.message());
        let response = HttpResponse::TooManyRequests()
            .insert_header((RETRY_AFTER_HEADER, rejection.retry_after_secs.to_string()))
            .json(error);

        Outbound(self.0.into_response(response).map_into_right_body())
    }
}

/// An outbound response as seen by the gate.
struct Outbound<B>(ServiceResponse<EitherBody<B>>);

impl<B> Annotate for Outbound<B> {
    fn set_numeric_header(&mut self, name: &'static str, value: u64) {
        self.0
            .headers_mut()
            .insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
}
