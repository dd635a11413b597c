use super::cache::TemplateCache;
use super::manager::TemplateManager;
use crate::config::Settings;
use actix_web::{web, HttpResponse, Responder};

/// Handler for `DELETE /api/form/templates/{name}`.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    cache: web::Data<TemplateCache>,
    name: web::Path<String>,
) -> impl Responder {
    let manager = TemplateManager::new(settings.get_ref(), &cache, &settings.system_publisher);
    match manager.delete(&name) {
        Ok(()) => HttpResponse::Ok().body("Template deleted"),
        Err(e) => e.to_response(),
    }
}
