use super::cache::TemplateCache;
use super::manager::TemplateManager;
use crate::config::Settings;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::TemplateInfo;
use common::requests::{CloneTemplateRequest, EditTemplateRequest};

/// Handler for `POST /api/form/templates/clone`.
pub(crate) async fn clone(
    settings: web::Data<Settings>,
    cache: web::Data<TemplateCache>,
    payload: web::Json<CloneTemplateRequest>,
) -> impl Responder {
    let manager = TemplateManager::new(settings.get_ref(), &cache, &settings.system_publisher);
    let info = TemplateInfo {
        name: payload.name.clone(),
        template_type: payload.template_type.clone(),
        description: payload.description.clone(),
        ..Default::default()
    };

    match manager.clone_template(
        &payload.original_name,
        info,
        payload.template_html.as_deref(),
    ) {
        Ok(info) => HttpResponse::Ok().json(info),
        Err(e) => e.to_response(),
    }
}

/// Handler for `POST /api/form/templates/edit`.
pub(crate) async fn edit(
    settings: web::Data<Settings>,
    cache: web::Data<TemplateCache>,
    payload: web::Json<EditTemplateRequest>,
) -> impl Responder {
    let manager = TemplateManager::new(settings.get_ref(), &cache, &settings.system_publisher);
    match manager.edit(
        &payload.original_name,
        &payload.name,
        &payload.template_type,
        &payload.description,
    ) {
        Ok(info) => HttpResponse::Ok().json(info),
        Err(e) => e.to_response(),
    }
}
