use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Hard cap on image elements per page.
pub const MAX_IMAGE_ELEMENTS_PER_PAGE: i64 = 5;

/// Upload size ceiling for image files (bytes).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Fixed canvas dimensions of a gazette page (px).
pub const CANVAS_WIDTH: f64 = 850.0;
pub const CANVAS_HEIGHT: f64 = 1100.0;
