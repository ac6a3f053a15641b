use actix_web::web;

use crate::interfaces::handlers::{elements, home, images, pages, projects, system, templates};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home).service(
        web::scope("/api")
            .service(system::health_check)
            .service(templates::list_templates)
            // Projects
            .service(projects::create_project)
            .service(projects::access_project)
            .service(projects::get_current_project)
            .service(projects::delete_current_project)
            .service(projects::get_gazette)
            // Pages
            .service(pages::list_pages)
            .service(pages::create_page)
            .service(pages::reorder_pages)
            .service(pages::update_page)
            .service(pages::delete_page)
            // Elements
            .service(elements::list_elements)
            .service(elements::create_element)
            .service(elements::update_element)
            .service(elements::delete_element)
            // Images
            .service(images::upload_image)
            .service(images::serve_image),
    );
}
