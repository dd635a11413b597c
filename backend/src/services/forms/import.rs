//! # Form Import Job Service
//!
//! `POST /api/form/forms/import` imports an extracted archive directory into a
//! site. Archives may hold many forms and every record of each form, so the
//! import runs as a background job.
//!
//! ## Workflow:
//!
//! 1.  **HTTP Request**: `process` receives an `ImportFormRequest` naming the
//!     site, the directory and the title collision policy.
//! 2.  **Job Scheduling**: `schedule_import_job` registers a `Pending` job in
//!     the shared `JobsState` and returns its `job_id` right away.
//! 3.  **Background Processing**: the import runs inside
//!     `tokio::task::spawn_blocking`, since SQLite and file access block.
//! 4.  **Status Reporting**: the outcome reaches the `job_controller` as a
//!     `JobUpdate`; clients poll `GET /api/form/forms/import/status/{job_id}`.

use super::with_manager;
use crate::config::Settings;
use crate::job_controller::state::{JobUpdate, JobsState};
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::requests::ImportFormRequest;
use log::{error, info};
use std::path::Path;
use uuid::Uuid;

pub(crate) async fn process(
    settings: web::Data<Settings>,
    state: web::Data<JobsState>,
    payload: web::Json<ImportFormRequest>,
) -> impl Responder {
    let job_id = schedule_import_job(settings, state, payload.into_inner()).await;
    HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id }))
}

async fn schedule_import_job(
    settings: web::Data<Settings>,
    state: web::Data<JobsState>,
    req: ImportFormRequest,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();
    let settings = settings.into_inner();

    tokio::spawn(async move {
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone.clone(),
                status: JobStatus::InProgress(0),
            })
            .await;

        let handle = tokio::task::spawn_blocking(move || {
            with_manager(&settings, |manager| {
                manager.import_form(req.site_id, Path::new(&req.directory), req.overwrite)
            })
        });

        let status = match handle.await {
            Ok(Ok(form_ids)) => {
                info!("Import job {} finished: {:?}", job_id_clone, form_ids);
                JobStatus::Completed(format!("Imported {} forms", form_ids.len()))
            }
            Ok(Err(e)) => {
                error!("Import job {} failed: {}", job_id_clone, e);
                JobStatus::Failed(e.to_string())
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };

        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone,
                status,
            })
            .await;
    });

    job_id
}
