//! # Form Service Module
//!
//! The form engine and the admin endpoints over it.
//!
//! ## Sub-modules:
//! - `manager`: `FormManager`, the entry point for form, style and record work.
//! - `columns`: projection of styles onto the record grid columns.
//! - `defaults`: the pre-populated record a new submission starts from.
//! - `archive`: export and import of whole forms as portable archives.
//! - `export`, `import`, `get_status`: HTTP handlers for archive transfer. Imports
//!   run as background jobs tracked by the `job_controller`.

pub mod archive;
pub mod columns;
pub mod defaults;
mod export;
mod get_status;
mod import;
pub mod manager;

use crate::config::Settings;
use crate::error::Result;
use crate::repository::sqlite::SqliteRepository;
use crate::services::styles::DirectoryStyleArchive;
use actix_web::web::{get, post, scope};
use actix_web::Scope;
use archive::cipher::ArchiveCipher;
use common::model::column::Record;
use manager::FormManager;

/// The base path for all form-related API endpoints.
const API_PATH: &str = "/api/form/forms";

/// Configures and returns the Actix `Scope` for the form routes.
///
/// # Registered Routes:
///
/// *   **`GET /columns`**: record grid columns of a form (`columns::process`).
/// *   **`GET /record`**: the pre-populated record a new submission starts
///     from (`defaults::process`).
/// *   **`POST /export`**: writes a form archive into a server directory
///     (`export::process`).
/// *   **`POST /import`**: starts a background import of an archive directory
///     and returns its `job_id` (`import::process`).
/// *   **`GET /import/status/{job_id}`**: status of an import job
///     (`get_status::process`).
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/columns", get().to(columns::process))
        .route("/record", get().to(defaults::process))
        .route("/export", post().to(export::process))
        .route("/import", post().to(import::process))
        .route("/import/status/{job_id}", get().to(get_status::process))
}

/// Opens the store named in `settings` and runs `f` against a manager over it.
pub fn with_manager<T>(
    settings: &Settings,
    f: impl FnOnce(&FormManager<'_>) -> Result<T>,
) -> Result<T> {
    let repository = SqliteRepository::open(&settings.database_path)?;
    let style_archive = DirectoryStyleArchive::new(&repository);
    let cipher = ArchiveCipher::new(&settings.secret_key)?;
    let manager = FormManager::new(
        &repository,
        &repository,
        &repository,
        &style_archive,
        settings,
        &cipher,
    );
    f(&manager)
}

/// JSON object of a record's attributes, as the admin pages consume it.
pub fn record_json<R: Record>(record: &R) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = record
        .entity()
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
        .collect();
    serde_json::Value::Object(map)
}
