//! app.rs
use crate::errors::AppError;
use crate::handlers::{email_handler, user_handler};
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Límite del body JSON de /api/email/send
const JSON_LIMIT_BYTES: usize = 1024 * 1024;

/// JSON inválido responde con el mismo formato que el resto de errores.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| AppError::ParseFailure(err.to_string()).into())
}

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_endpoint))
            .route("/headers", web::get().to(user_handler::list_headers_endpoint))
            .service(
                web::scope("/users")
                    .route("", web::get().to(user_handler::list_users_endpoint))
                    .route("/upload", web::post().to(user_handler::upload_users_endpoint))
                    .route(
                        "/delete-all",
                        web::delete().to(user_handler::delete_all_endpoint),
                    ),
            )
            .service(
                web::scope("/email")
                    .route("/send", web::post().to(email_handler::send_email_endpoint)),
            ),
    );
}

/// GET /api/health
async fn health_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
