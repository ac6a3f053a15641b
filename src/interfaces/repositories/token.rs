use jsonwebtoken::TokenData;

use crate::entities::project::Project;
use crate::entities::token::Claims;
use crate::errors::AuthError;

/// Issues and validates project access tokens.
pub trait TokenService: Send + Sync {
    fn create_jwt(&self, project: &Project) -> Result<String, AuthError>;
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
