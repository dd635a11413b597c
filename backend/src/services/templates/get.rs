//! # Template Retrieval Service
//!
//! Backs `GET /api/form/templates/{name}`, the data the template editor opens
//! with.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives the bundle name from the path.
//! 2.  **Lookup**: `TemplateManager::get_for_edit` reads the bundle's
//!     `config.json` and its main HTML file (through the `TemplateCache`).
//! 3.  **Protection**: when the bundle's publisher is the platform itself, the
//!     metadata is replaced by an empty descriptor and `isSystem` is set; the
//!     HTML is returned either way.
//! 4.  **HTTP Response**: `200 OK` with the `TemplateView`, `404` for an
//!     unknown bundle, `400` for an illegal name.

use super::cache::TemplateCache;
use super::manager::TemplateManager;
use crate::config::Settings;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(
    settings: web::Data<Settings>,
    cache: web::Data<TemplateCache>,
    name: web::Path<String>,
) -> impl Responder {
    let manager = TemplateManager::new(settings.get_ref(), &cache, &settings.system_publisher);
    match manager.get_for_edit(&name) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => e.to_response(),
    }
}
