use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use label_verifier::api::{self, AppState};
use shared::config::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let settings = Settings::new()?;
    info!(
        policy = %settings.warning_policy,
        brand_threshold = settings.brand_threshold,
        abv_tolerance = settings.abv_tolerance,
        "starting label-verifier"
    );

    let state = web::Data::new(AppState::from_settings(&settings));
    info!("starting http server on {}:{}", settings.bind_addr, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind((settings.bind_addr.as_str(), settings.port))?
    .run()
    .await?;
    Ok(())
}
