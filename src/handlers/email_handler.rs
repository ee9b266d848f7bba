//! handlers/email_handler.rs
//! Endpoint del envío masivo.

use actix_web::{http::StatusCode, web, HttpResponse};
use serde_json::json;

use crate::{
    errors::AppError,
    models::dispatch_model::{DispatchRequest, DispatchStatus},
    services::{dispatch_service::DispatchService, record_store_service::RecordStoreService},
};

/// POST /api/email/send
///
/// Lee todos los registros una sola vez y envía a cada uno. Una subida o
/// borrado concurrente no afecta a un envío ya iniciado: se trabaja con
/// el snapshot leído al principio.
pub async fn send_email_endpoint(
    store: web::Data<RecordStoreService>,
    dispatch_service: web::Data<DispatchService>,
    body: web::Json<DispatchRequest>,
) -> Result<HttpResponse, AppError> {
    let req_data = body.into_inner();
    let records = store.list_all().await?;

    let outcome = dispatch_service.dispatch(&req_data, &records).await?;

    let (status_code, message) = match outcome.status {
        DispatchStatus::Sent => (StatusCode::OK, "Emails sent successfully"),
        DispatchStatus::Partial => (StatusCode::MULTI_STATUS, "Some emails could not be sent"),
        DispatchStatus::Failed => (StatusCode::BAD_GATEWAY, "No email could be sent"),
    };

    Ok(HttpResponse::build(status_code).json(json!({
        "success": outcome.status == DispatchStatus::Sent,
        "message": message,
        "outcome": outcome
    })))
}
