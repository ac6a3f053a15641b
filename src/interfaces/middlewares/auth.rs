use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::errors::AuthError;
use crate::infrastructure::auth::jwt::JwtService;

/// Requires a valid project token on every route except the public
/// surface (project creation and access, the published viewer, templates,
/// image bytes and diagnostics).
pub struct AuthMiddleware {
    jwt_service: Arc<JwtService>,
}

impl AuthMiddleware {
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        AuthMiddleware { jwt_service }
    }
}

fn is_public(method: &Method, path: &str) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }

    match (method, path) {
        (&Method::GET, "/") | (&Method::GET, "/api/health") | (&Method::GET, "/api/templates") => {
            true
        }
        (&Method::POST, "/api/projects") | (&Method::POST, "/api/projects/access") => true,
        (&Method::GET, p) if p.starts_with("/api/gazettes/") => true,
        (&Method::GET, p) if p.starts_with("/api/images/") && p.ends_with("/file") => true,
        _ => false,
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: Arc<JwtService>,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<(), AuthError> {
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredentials)?;

        let data = self.jwt_service.decode_jwt(token)?;
        req.extensions_mut().insert(data.claims);

        Ok(())
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !is_public(req.method(), req.path()) {
            if let Err(e) = self.authenticate(&req) {
                return Box::pin(ready(Err(e.into())));
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_surface_is_reachable_without_a_token() {
        assert!(is_public(&Method::GET, "/"));
        assert!(is_public(&Method::GET, "/api/health"));
        assert!(is_public(&Method::GET, "/api/templates"));
        assert!(is_public(&Method::POST, "/api/projects"));
        assert!(is_public(&Method::POST, "/api/projects/access"));
        assert!(is_public(&Method::GET, "/api/gazettes/la-gazette"));
        assert!(is_public(
            &Method::GET,
            "/api/images/5e86f0a2-0c59-4b36-9d3e-000000000000/file"
        ));
    }

    #[test]
    fn editing_surface_requires_a_token() {
        assert!(!is_public(&Method::GET, "/api/projects/me"));
        assert!(!is_public(&Method::DELETE, "/api/projects/me"));
        assert!(!is_public(&Method::POST, "/api/projects/me/pages"));
        assert!(!is_public(&Method::PUT, "/api/pages/123"));
        assert!(!is_public(&Method::POST, "/api/images"));
        assert!(!is_public(&Method::GET, "/api/images/123"));
    }
}
