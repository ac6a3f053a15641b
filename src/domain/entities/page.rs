use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::option_fields::OptionField;
use crate::domain::entities::element::ElementResponse;

const MAX_TITLE_LENGTH: u64 = 200;
const MAX_SUBTITLE_LENGTH: u64 = 300;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Page {
    pub id: Uuid,
    pub project_id: Uuid,
    pub order_index: i32,
    pub template_id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct PageInsert {
    pub project_id: Uuid,
    pub order_index: i32,
    pub template_id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPageRequest {
    #[validate(length(min = 1, message = "Template id cannot be empty"))]
    pub template_id: String,

    #[validate(length(max = MAX_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_SUBTITLE_LENGTH))]
    pub subtitle: Option<String>,
}

impl NewPageRequest {
    pub fn prepare_for_insert(&self, project_id: Uuid, order_index: i32) -> PageInsert {
        PageInsert {
            project_id,
            order_index,
            template_id: self.template_id.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePageRequest {
    pub template_id: OptionField<String>,
    pub title: OptionField<String>,
    pub subtitle: OptionField<String>,
}

impl UpdatePageRequest {
    pub fn is_noop(&self) -> bool {
        self.template_id.is_unchanged()
            && self.title.is_unchanged()
            && self.subtitle.is_unchanged()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPagesRequest {
    pub page_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub order: i32,
    pub template_id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        PageResponse {
            id: page.id,
            project_id: page.project_id,
            order: page.order_index,
            template_id: page.template_id,
            title: page.title,
            subtitle: page.subtitle,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// A page with its elements, as served to the read-only public viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWithElements {
    #[serde(flatten)]
    pub page: PageResponse,
    pub elements: Vec<ElementResponse>,
}
