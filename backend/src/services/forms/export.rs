//! # Form Export Service
//!
//! `POST /api/form/forms/export` writes one form (definition, styles and
//! records) into a directory on the server as a current-format archive.
//! Exports are bounded by the record count of a single form and run inline.

use super::with_manager;
use crate::config::Settings;
use crate::error::Result;
use actix_web::{web, HttpResponse, Responder};
use common::requests::ExportFormRequest;
use std::path::Path;

pub(crate) async fn process(
    settings: web::Data<Settings>,
    payload: web::Json<ExportFormRequest>,
) -> impl Responder {
    match export_form(&settings, &payload) {
        Ok(path) => HttpResponse::Ok().json(serde_json::json!({ "path": path })),
        Err(e) => e.to_response(),
    }
}

fn export_form(settings: &Settings, req: &ExportFormRequest) -> Result<String> {
    with_manager(settings, |manager| {
        let path = manager.export_form(req.site_id, req.form_id, Path::new(&req.directory))?;
        Ok(path.display().to_string())
    })
}
