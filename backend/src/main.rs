use actix_web::{web, App, HttpServer};
use backend::config::Settings;
use backend::job_controller::state::{start_job_updater, JobsState};
use backend::services;
use backend::services::templates::cache::TemplateCache;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let url = format!("http://{}:{}", settings.host, settings.port);

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::new(100);

    // Start job updater task
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    let bind = (settings.host.clone(), settings.port);
    let settings = web::Data::new(settings);
    let cache = web::Data::new(TemplateCache::new());

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(settings.clone())
            .app_data(cache.clone())
            .app_data(web::Data::new(jobs_state.clone()))
            .service(services::templates::configure_routes())
            .service(services::forms::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
