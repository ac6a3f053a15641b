use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::password::validate_password_strength;

const MIN_NAME_LENGTH: u64 = 1;
const MAX_NAME_LENGTH: u64 = 120;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ProjectInsert {
    pub name: String,
    pub slug: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH),
        custom(function = "validate_name")
    )]
    pub name: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

impl NewProjectRequest {
    pub fn prepare_for_insert(&self, slug: String, password_hash: String) -> ProjectInsert {
        ProjectInsert {
            name: self.name.clone(),
            slug,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AccessProjectRequest {
    #[validate(length(min = 1, message = "Slug cannot be empty"))]
    pub slug: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        ProjectResponse {
            id: project.id,
            name: project.name,
            slug: project.slug,
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreatedResponse {
    pub project: ProjectResponse,
    pub access_token: String,
    pub token_type: String,
}

/// Published gazette as served to the public viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GazetteResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub pages: Vec<crate::domain::entities::page::PageWithElements>,
}

fn validate_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        let mut err = validator::ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let request = NewProjectRequest {
            name: "   ".to_string(),
            password: "plume-d0ree-gazette!91".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn weak_password_is_rejected() {
        let request = NewProjectRequest {
            name: "La Gazette de la Vie".to_string(),
            password: "12345678".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
