use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entities::image::image_file_url;
use crate::domain::entities::option_fields::OptionField;
use crate::errors::{AppError, FieldError};

const MAX_CONTENT_LENGTH: usize = 2_000;
const MAX_PROMPT_LENGTH: usize = 1_000;
const MAX_URL_LENGTH: usize = 2_048;

// ───── Wire enums ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Image,
    Headline,
    Subheading,
    Caption,
}

impl ElementType {
    pub fn is_image(&self) -> bool {
        matches!(self, ElementType::Image)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Image => "image",
            ElementType::Headline => "headline",
            ElementType::Subheading => "subheading",
            ElementType::Caption => "caption",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(ElementType::Image),
            "headline" => Ok(ElementType::Headline),
            "subheading" => Ok(ElementType::Subheading),
            "caption" => Ok(ElementType::Caption),
            other => Err(format!("unknown element type: {other}")),
        }
    }
}

/// The three text flavors of an element. `ElementType` is the wire
/// discriminant; `TextKind` is what the domain union actually stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Headline,
    Subheading,
    Caption,
}

impl From<TextKind> for ElementType {
    fn from(kind: TextKind) -> Self {
        match kind {
            TextKind::Headline => ElementType::Headline,
            TextKind::Subheading => ElementType::Subheading,
            TextKind::Caption => ElementType::Caption,
        }
    }
}

impl TryFrom<ElementType> for TextKind {
    type Error = ();

    fn try_from(ty: ElementType) -> Result<Self, Self::Error> {
        match ty {
            ElementType::Headline => Ok(TextKind::Headline),
            ElementType::Subheading => Ok(TextKind::Subheading),
            ElementType::Caption => Ok(TextKind::Caption),
            ElementType::Image => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    #[default]
    None,
    Pending,
    Processing,
    Complete,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::None => "none",
            VideoStatus::Pending => "pending",
            VideoStatus::Processing => "processing",
            VideoStatus::Complete => "complete",
            VideoStatus::Failed => "failed",
        }
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(VideoStatus::None),
            "pending" => Ok(VideoStatus::Pending),
            "processing" => Ok(VideoStatus::Processing),
            "complete" => Ok(VideoStatus::Complete),
            "failed" => Ok(VideoStatus::Failed),
            other => Err(format!("unknown video status: {other}")),
        }
    }
}

// ───── Shared value types ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    fn validate(&self) -> Result<(), FieldError> {
        let all_finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(FieldError {
                field: "position".into(),
                message: "Position values must be finite numbers".into(),
            });
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(FieldError {
                field: "position".into(),
                message: "Width and height must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Pan (x, y) and zoom factor describing how a source image is framed
/// within an image element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropData {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for CropData {
    fn default() -> Self {
        CropData { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

// ───── Database model ────────────────────────────────────────────────

/// Flat row shape; the tagged union is reconstructed via `TryFrom`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ElementRow {
    pub id: Uuid,
    pub page_id: Uuid,
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: Option<String>,
    pub image_id: Option<Uuid>,
    pub crop_x: Option<f64>,
    pub crop_y: Option<f64>,
    pub crop_zoom: Option<f64>,
    pub animation_prompt: Option<String>,
    pub video_url: Option<String>,
    pub video_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ElementRow {
    /// Crop is null unless at least one component is set; defaults
    /// backfill the missing ones.
    pub fn crop(&self) -> Option<CropData> {
        if self.crop_x.is_none() && self.crop_y.is_none() && self.crop_zoom.is_none() {
            return None;
        }
        Some(CropData {
            x: self.crop_x.unwrap_or(0.0),
            y: self.crop_y.unwrap_or(0.0),
            zoom: self.crop_zoom.unwrap_or(1.0),
        })
    }
}

/// Flat insert shape, flattened back out of the domain union so the
/// repository can bind columns directly.
#[derive(Debug)]
pub struct ElementInsert {
    pub page_id: Uuid,
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: Option<String>,
    pub image_id: Option<Uuid>,
    pub crop_x: Option<f64>,
    pub crop_y: Option<f64>,
    pub crop_zoom: Option<f64>,
    pub animation_prompt: Option<String>,
    pub video_url: Option<String>,
    pub video_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ElementInsert {
    pub fn from_parts(page_id: Uuid, position: Position, body: ElementBody) -> Self {
        let element_type = body.element_type().as_str().to_string();
        let now = Utc::now();
        let mut insert = ElementInsert {
            page_id,
            element_type,
            x: position.x,
            y: position.y,
            width: position.width,
            height: position.height,
            content: None,
            image_id: None,
            crop_x: None,
            crop_y: None,
            crop_zoom: None,
            animation_prompt: None,
            video_url: None,
            video_status: None,
            created_at: now,
            updated_at: now,
        };
        match body {
            ElementBody::Image {
                image_id,
                crop,
                animation_prompt,
                video_url,
                video_status,
            } => {
                insert.image_id = image_id;
                if let Some(crop) = crop {
                    insert.crop_x = Some(crop.x);
                    insert.crop_y = Some(crop.y);
                    insert.crop_zoom = Some(crop.zoom);
                }
                insert.animation_prompt = animation_prompt;
                insert.video_url = video_url;
                insert.video_status = Some(video_status.as_str().to_string());
            }
            ElementBody::Text { content, .. } => {
                insert.content = Some(content);
            }
        }
        insert
    }
}

// ───── Domain union ──────────────────────────────────────────────────

/// Variant-specific payload. Invalid field combinations (text content on
/// an image, image fields on text) are unrepresentable here; requests are
/// checked once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Image {
        image_id: Option<Uuid>,
        crop: Option<CropData>,
        animation_prompt: Option<String>,
        video_url: Option<String>,
        video_status: VideoStatus,
    },
    Text {
        kind: TextKind,
        content: String,
    },
}

impl ElementBody {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementBody::Image { .. } => ElementType::Image,
            ElementBody::Text { kind, .. } => (*kind).into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: Uuid,
    pub page_id: Uuid,
    pub position: Position,
    pub body: ElementBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ElementRow> for Element {
    type Error = AppError;

    fn try_from(row: ElementRow) -> Result<Self, Self::Error> {
        let element_type = ElementType::from_str(&row.element_type)
            .map_err(AppError::InternalError)?;

        let body = if element_type.is_image() {
            let video_status = match &row.video_status {
                Some(raw) => VideoStatus::from_str(raw).map_err(AppError::InternalError)?,
                None => VideoStatus::None,
            };
            ElementBody::Image {
                image_id: row.image_id,
                crop: row.crop(),
                animation_prompt: row.animation_prompt.clone(),
                video_url: row.video_url.clone(),
                video_status,
            }
        } else {
            let kind = TextKind::try_from(element_type)
                .expect("non-image element type is a text kind");
            ElementBody::Text {
                kind,
                content: row.content.clone().unwrap_or_default(),
            }
        };

        Ok(Element {
            id: row.id,
            page_id: row.page_id,
            position: Position {
                x: row.x,
                y: row.y,
                width: row.width,
                height: row.height,
            },
            body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ───── API Request & Response models ─────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElementRequest {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_data: Option<CropData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_status: Option<VideoStatus>,
}

impl NewElementRequest {
    /// Validates the type-specific shape and constructs the domain union.
    /// Cross-type field leakage is rejected here, before anything touches
    /// the database.
    pub fn into_parts(self) -> Result<(Position, ElementBody), AppError> {
        let mut errors = Vec::new();

        if let Err(e) = self.position.validate() {
            errors.push(e);
        }

        let body = match self.element_type {
            ElementType::Image => {
                if self.content.is_some() {
                    errors.push(leak("content", "not allowed on image elements"));
                }
                if let Some(prompt) = &self.animation_prompt {
                    if prompt.len() > MAX_PROMPT_LENGTH {
                        errors.push(leak("animationPrompt", "too long"));
                    }
                }
                if let Some(url) = &self.video_url {
                    if url.len() > MAX_URL_LENGTH {
                        errors.push(leak("videoUrl", "too long"));
                    }
                }
                if let Some(crop) = &self.crop_data {
                    if !crop.zoom.is_finite() || crop.zoom <= 0.0 {
                        errors.push(leak("cropData", "zoom must be a positive number"));
                    }
                }
                ElementBody::Image {
                    image_id: self.image_id,
                    crop: self.crop_data,
                    animation_prompt: self.animation_prompt,
                    video_url: self.video_url,
                    video_status: self.video_status.unwrap_or_default(),
                }
            }
            text_type => {
                if self.image_id.is_some() {
                    errors.push(leak("imageId", "not allowed on text elements"));
                }
                if self.crop_data.is_some() {
                    errors.push(leak("cropData", "not allowed on text elements"));
                }
                if self.animation_prompt.is_some() {
                    errors.push(leak("animationPrompt", "not allowed on text elements"));
                }
                if self.video_url.is_some() {
                    errors.push(leak("videoUrl", "not allowed on text elements"));
                }
                if self.video_status.is_some() {
                    errors.push(leak("videoStatus", "not allowed on text elements"));
                }

                let content = self.content.unwrap_or_default();
                if content.is_empty() {
                    errors.push(leak("content", "required for text elements"));
                } else if content.len() > MAX_CONTENT_LENGTH {
                    errors.push(leak("content", "too long"));
                }

                let kind = TextKind::try_from(text_type)
                    .expect("non-image element type is a text kind");
                ElementBody::Text { kind, content }
            }
        };

        if errors.is_empty() {
            Ok((self.position, body))
        } else {
            Err(AppError::ValidationError(errors))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateElementRequest {
    pub position: OptionField<Position>,
    pub content: OptionField<String>,
    pub image_id: OptionField<Uuid>,
    pub crop_data: OptionField<CropData>,
    pub animation_prompt: OptionField<String>,
    pub video_url: OptionField<String>,
    pub video_status: OptionField<VideoStatus>,
}

impl UpdateElementRequest {
    /// True when the payload carried no recognized field at all. Such an
    /// update would only bump `updated_at`, so it is rejected upstream.
    pub fn is_noop(&self) -> bool {
        self.position.is_unchanged()
            && self.content.is_unchanged()
            && self.image_id.is_unchanged()
            && self.crop_data.is_unchanged()
            && self.animation_prompt.is_unchanged()
            && self.video_url.is_unchanged()
            && self.video_status.is_unchanged()
    }

    /// Rejects cross-type field mutation against the element's immutable
    /// type, plus basic shape checks on the touched fields.
    pub fn validate_for(&self, element_type: ElementType) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if let Some(position) = self.position.value_ref() {
            if let Err(e) = position.validate() {
                errors.push(e);
            }
        }

        if element_type.is_image() {
            if !self.content.is_unchanged() {
                errors.push(leak("content", "not allowed on image elements"));
            }
            if let Some(crop) = self.crop_data.value_ref() {
                if !crop.zoom.is_finite() || crop.zoom <= 0.0 {
                    errors.push(leak("cropData", "zoom must be a positive number"));
                }
            }
            if let Some(prompt) = self.animation_prompt.value_ref() {
                if prompt.len() > MAX_PROMPT_LENGTH {
                    errors.push(leak("animationPrompt", "too long"));
                }
            }
            if let Some(url) = self.video_url.value_ref() {
                if url.len() > MAX_URL_LENGTH {
                    errors.push(leak("videoUrl", "too long"));
                }
            }
            if self.video_status.is_set_to_null() {
                errors.push(leak("videoStatus", "cannot be null; use \"none\""));
            }
        } else {
            if !self.image_id.is_unchanged() {
                errors.push(leak("imageId", "not allowed on text elements"));
            }
            if !self.crop_data.is_unchanged() {
                errors.push(leak("cropData", "not allowed on text elements"));
            }
            if !self.animation_prompt.is_unchanged() {
                errors.push(leak("animationPrompt", "not allowed on text elements"));
            }
            if !self.video_url.is_unchanged() {
                errors.push(leak("videoUrl", "not allowed on text elements"));
            }
            if !self.video_status.is_unchanged() {
                errors.push(leak("videoStatus", "not allowed on text elements"));
            }
            match &self.content {
                OptionField::SetToNull => {
                    errors.push(leak("content", "required for text elements"));
                }
                OptionField::SetToValue(content) if content.is_empty() => {
                    errors.push(leak("content", "required for text elements"));
                }
                OptionField::SetToValue(content) if content.len() > MAX_CONTENT_LENGTH => {
                    errors.push(leak("content", "too long"));
                }
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(errors))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementResponse {
    pub id: Uuid,
    pub page_id: Uuid,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_data: Option<CropData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_status: Option<VideoStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Element> for ElementResponse {
    fn from(element: Element) -> Self {
        let element_type = element.body.element_type();
        let (content, image_id, image_url, crop_data, animation_prompt, video_url, video_status) =
            match element.body {
                ElementBody::Image {
                    image_id,
                    crop,
                    animation_prompt,
                    video_url,
                    video_status,
                } => (
                    None,
                    image_id,
                    image_id.as_ref().map(image_file_url),
                    crop,
                    animation_prompt,
                    video_url,
                    Some(video_status),
                ),
                ElementBody::Text { content, .. } => {
                    (Some(content), None, None, None, None, None, None)
                }
            };

        ElementResponse {
            id: element.id,
            page_id: element.page_id,
            element_type,
            position: element.position,
            content,
            image_id,
            image_url,
            crop_data,
            animation_prompt,
            video_url,
            video_status,
            created_at: element.created_at,
            updated_at: element.updated_at,
        }
    }
}

fn leak(field: &str, message: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: message.to_string(),
    }
}
