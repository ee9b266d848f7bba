use std::{path::Path, sync::Arc};

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::dispatch_service::DispatchService;
use crate::services::email_service::SmtpMailer;
use crate::services::record_store_service::RecordStoreService;

mod app;
mod config;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

/// Crea la carpeta del archivo SQLite si la URL apunta a disco.
fn ensure_database_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("No se pudo crear directorio {:?}", parent))?;
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    // Config inválida o sin credenciales SMTP => no arrancamos
    let config = AppConfig::from_env().context("Configuración inválida")?;

    ensure_database_dir(&config.database_url)?;
    log::info!("Conectando a SQLite en {}", config.database_url);
    let store = RecordStoreService::connect(&config.database_url).await?;
    store.run_migrations().await?;

    let mailer = SmtpMailer::new(&config.mail).context("No se pudo inicializar SmtpMailer")?;
    if config.mail.verify_on_startup {
        mailer.verify().await?;
        log::info!("Conexión SMTP verificada con {}", config.mail.smtp_host);
    }

    let dispatch_service = DispatchService::new(Arc::new(mailer), config.dispatch_concurrency);

    let bind = (config.host.clone(), config.port);
    let config_data = web::Data::new(config);
    let store_data = web::Data::new(store);
    let dispatch_data = web::Data::new(dispatch_service);

    log::info!("Levantando servidor en {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(config_data.clone())
            .app_data(store_data.clone())
            .app_data(dispatch_data.clone())
            .configure(app::init_app)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
