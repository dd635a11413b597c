//! Form engine: dynamic-schema forms, their records, portable archives and
//! template bundles, with a thin actix-web surface on top.

pub mod config;
pub mod error;
pub mod job_controller;
pub mod repository;
pub mod services;
