use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures::future::LocalBoxFuture;

use crate::auth::config::SESSION_COOKIE;
use crate::auth::session::{SessionData, SessionStore};

/// The live session attached to a request, if its cookie resolved.
#[derive(Clone, Debug)]
pub struct CurrentSession {
    pub id: String,
    pub data: SessionData,
}

/// Resolves the session cookie and exposes the session (and its principal) to handlers.
///
/// Requests without a valid session pass through untouched; the extractors decide
/// whether a route needs one.
#[derive(Clone)]
pub struct SessionLayer {
    store: SessionStore,
}

impl SessionLayer {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddleware {
            service: Rc::new(service),
            store: self.store.clone(),
        }))
    }
}

pub struct SessionMiddleware<S> {
    service: Rc<S>,
    store: SessionStore,
}

impl<S, B> Service<ServiceRequest> for SessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cookie_value = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
        let Some(cookie_value) = cookie_value else {
            let fut = self.service.call(req);
            #[allow(clippy::redundant_async_block)]
            return Box::pin(async move { fut.await });
        };

        let store = self.store.clone();
        let srv = self.service.clone();
        Box::pin(async move {
            match store.resolve(&cookie_value).await {
                Ok((id, data)) => {
                    if let Some(principal) = data.principal {
                        req.extensions_mut().insert(principal);
                    }
                    req.extensions_mut().insert(CurrentSession { id, data });
                }
                Err(e) => debug!("session: ignoring cookie on {}: {}", req.path(), e),
            }
            srv.call(req).await
        })
    }
}
