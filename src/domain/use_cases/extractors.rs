use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::entities::token::Claims;
use crate::errors::AuthError;

/// The authenticated project, pulled from the claims the auth middleware
/// stored in request extensions.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_id: Uuid,
    pub slug: String,
}

impl FromRequest for ProjectContext {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<Claims>()
            .ok_or(AuthError::MissingCredentials)
            .and_then(|claims| {
                Ok(ProjectContext {
                    project_id: claims.project_id()?,
                    slug: claims.slug.clone(),
                })
            });

        ready(context)
    }
}
