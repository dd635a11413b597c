//! Types shared between the form engine, its storage layer and the HTTP surface.

pub mod jobs;
pub mod model;
pub mod requests;
