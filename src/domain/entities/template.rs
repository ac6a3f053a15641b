use once_cell::sync::Lazy;
use serde::Serialize;

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::domain::entities::element::{ElementType, Position};

/// A named preset layout applied when creating a page. Slots describe the
/// element arrangement a client materializes onto the canvas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub slots: Vec<TemplateSlot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub position: Position,
}

fn slot(element_type: ElementType, x: f64, y: f64, width: f64, height: f64) -> TemplateSlot {
    TemplateSlot {
        element_type,
        position: Position { x, y, width, height },
    }
}

pub static TEMPLATES: Lazy<Vec<Template>> = Lazy::new(|| {
    vec![
        Template {
            id: "front-page",
            name: "Front page",
            description: "Banner headline over a large photograph with a caption",
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            slots: vec![
                slot(ElementType::Headline, 50.0, 40.0, 750.0, 120.0),
                slot(ElementType::Subheading, 50.0, 170.0, 750.0, 60.0),
                slot(ElementType::Image, 50.0, 250.0, 750.0, 620.0),
                slot(ElementType::Caption, 50.0, 890.0, 750.0, 50.0),
            ],
        },
        Template {
            id: "photo-spread",
            name: "Photo spread",
            description: "Four photographs in a grid with captions",
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            slots: vec![
                slot(ElementType::Image, 50.0, 50.0, 360.0, 440.0),
                slot(ElementType::Image, 440.0, 50.0, 360.0, 440.0),
                slot(ElementType::Image, 50.0, 560.0, 360.0, 440.0),
                slot(ElementType::Image, 440.0, 560.0, 360.0, 440.0),
                slot(ElementType::Caption, 50.0, 1010.0, 750.0, 50.0),
            ],
        },
        Template {
            id: "classic-column",
            name: "Classic column",
            description: "Headline, a tall photograph and a column of text",
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            slots: vec![
                slot(ElementType::Headline, 50.0, 40.0, 750.0, 100.0),
                slot(ElementType::Image, 50.0, 170.0, 360.0, 700.0),
                slot(ElementType::Subheading, 440.0, 170.0, 360.0, 80.0),
                slot(ElementType::Caption, 440.0, 270.0, 360.0, 600.0),
            ],
        },
        Template {
            id: "blank",
            name: "Blank",
            description: "An empty canvas",
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            slots: vec![],
        },
    ]
});

pub fn template_exists(id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_templates_resolve() {
        assert!(template_exists("front-page"));
        assert!(template_exists("blank"));
        assert!(!template_exists("nonexistent"));
    }

    #[test]
    fn no_template_exceeds_the_photo_cap() {
        use crate::constants::MAX_IMAGE_ELEMENTS_PER_PAGE;

        for template in TEMPLATES.iter() {
            let images = template
                .slots
                .iter()
                .filter(|s| s.element_type.is_image())
                .count();
            assert!(images as i64 <= MAX_IMAGE_ELEMENTS_PER_PAGE, "{}", template.id);
        }
    }
}
