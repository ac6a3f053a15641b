use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AuthError;

/// Access-token claims. A token grants edit rights over exactly one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Project id.
    pub sub: String,
    pub slug: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn project_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidProjectId)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
}
