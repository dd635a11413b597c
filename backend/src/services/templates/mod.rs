//! # Template Service Module
//!
//! This module aggregates all API endpoints related to the management of
//! template bundles. It routes requests under `/api/form/templates` to the
//! handler logic defined in its sub-modules.
//!
//! ## Sub-modules:
//! - `manager`: `TemplateManager`, CRUD over the bundle directories.
//! - `cache`: the modification-time checked file cache templates are read through.
//! - `list`: lists the bundles of a type together with the site's forms.
//! - `get`: returns one bundle for the editor.
//! - `save`: clones and edits bundles.
//! - `delete`: removes a bundle.

pub mod cache;
mod delete;
mod get;
mod list;
pub mod manager;
mod save;

use actix_web::web::{delete as delete_route, get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/form/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**: `list::process`. Bundles of the requested `type` and the
///     forms of the site.
/// *   **`GET /{name}`**: `get::process`. The bundle's config and main HTML.
///     Protected bundles come back with blank metadata and `isSystem` set.
/// *   **`POST /clone`**: `save::clone`. Copies a bundle under a new name,
///     optionally replacing its main HTML.
/// *   **`POST /edit`**: `save::edit`. Rewrites a bundle's config.
/// *   **`DELETE /{name}`**: `delete::process`. Removes a bundle directory.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/clone", post().to(save::clone))
        .route("/edit", post().to(save::edit))
        .route("/{name}", get().to(get::process))
        .route("/{name}", delete_route().to(delete::process))
}
