use super::cache::TemplateCache;
use super::manager::TemplateManager;
use crate::config::Settings;
use crate::error::Result;
use crate::repository::sqlite::SqliteRepository;
use crate::repository::FormRepository;
use crate::services::forms::record_json;
use actix_web::{web, HttpResponse, Responder};
use common::requests::ListTemplatesRequest;

/// Handler for `GET /api/form/templates?type=...&siteId=...`.
pub(crate) async fn process(
    settings: web::Data<Settings>,
    cache: web::Data<TemplateCache>,
    query: web::Query<ListTemplatesRequest>,
) -> impl Responder {
    match list_templates(&settings, &cache, &query) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => e.to_response(),
    }
}

fn list_templates(
    settings: &Settings,
    cache: &TemplateCache,
    req: &ListTemplatesRequest,
) -> Result<serde_json::Value> {
    let manager = TemplateManager::new(settings, cache, &settings.system_publisher);
    let templates = manager.list(&req.template_type)?;

    let repository = SqliteRepository::open(&settings.database_path)?;
    let forms: Vec<serde_json::Value> = repository
        .get_form_info_list(req.site_id)?
        .iter()
        .map(record_json)
        .collect();

    Ok(serde_json::json!({
        "formInfoList": forms,
        "templateInfoList": templates,
    }))
}
