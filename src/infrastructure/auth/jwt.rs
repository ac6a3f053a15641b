use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};

use crate::entities::token::Claims;
use crate::entities::project::Project;
use crate::repositories::token::TokenService;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    pub fn create_jwt(&self, project: &Project) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.expiration).timestamp() as usize;

        let claims = Claims {
            sub: project.id.to_string(),
            slug: project.slug.clone(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(AuthError::from)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

impl TokenService for JwtService {
    fn create_jwt(&self, project: &Project) -> Result<String, AuthError> {
        self.create_jwt(project)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_jwt(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppEnvironment;
    use uuid::Uuid;

    fn test_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Gazette Test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/test".into(),
            database_max_connections: 1,
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
            jwt_expiration_minutes: 5,
            image_storage_dir: "./data/images".into(),
        }
    }

    fn test_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "La Gazette de la Vie".into(),
            slug: "la-gazette-de-la-vie".into(),
            password_hash: "unused".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_project_claims() {
        let service = JwtService::new(&test_config());
        let project = test_project();

        let token = service.create_jwt(&project).unwrap();
        let decoded = service.decode_jwt(&token).unwrap();

        assert_eq!(decoded.claims.sub, project.id.to_string());
        assert_eq!(decoded.claims.slug, project.slug);
        assert_eq!(decoded.claims.project_id().unwrap(), project.id);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtService::new(&test_config());
        assert!(matches!(
            service.decode_jwt("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
