//! handlers/user_handler.rs
//! Endpoints de asistentes: listar, columnas, subir CSV, borrar todo.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde_json::json;

use crate::{
    config::app_config::AppConfig,
    errors::AppError,
    services::{csv_ingest_service, record_store_service::RecordStoreService},
};

/// Nombre del campo multipart con el archivo.
const FILE_FIELD: &str = "file";

/// GET /api/users
pub async fn list_users_endpoint(
    store: web::Data<RecordStoreService>,
) -> Result<HttpResponse, AppError> {
    let records = store.list_all().await?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /api/headers
pub async fn list_headers_endpoint(
    store: web::Data<RecordStoreService>,
) -> Result<HttpResponse, AppError> {
    let columns = store.list_columns().await?;
    Ok(HttpResponse::Ok().json(columns))
}

/// POST /api/users/upload
/// Reemplaza todos los registros con el CSV del campo `file`.
/// Un CSV sin filas se rechaza y no toca lo guardado.
pub async fn upload_users_endpoint(
    store: web::Data<RecordStoreService>,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let bytes = read_file_field(payload, config.upload_limit_bytes).await?;
    let table = csv_ingest_service::parse_csv(&bytes)?;

    store.replace_all(&table.rows, &table.columns).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Users uploaded successfully",
        "rows": table.rows.len(),
        "columns": table.columns
    })))
}

/// DELETE /api/users/delete-all
pub async fn delete_all_endpoint(
    store: web::Data<RecordStoreService>,
) -> Result<HttpResponse, AppError> {
    store.clear_all().await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "All users deleted successfully"
    })))
}

/// Lee el contenido del campo `file`; el resto de campos se ignora.
async fn read_file_field(mut payload: Multipart, limit: usize) -> Result<Bytes, AppError> {
    let mut file: Option<Bytes> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::ParseFailure(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some(FILE_FIELD) {
            // Drenar el campo para poder seguir con el siguiente
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::ParseFailure(e.to_string()))?;
            }
            continue;
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::ParseFailure(e.to_string()))?;
            if buf.len() + chunk.len() > limit {
                return Err(AppError::ParseFailure(format!(
                    "file exceeds the {limit} byte upload limit"
                )));
            }
            buf.extend_from_slice(&chunk);
        }
        file = Some(buf.freeze());
    }

    file.ok_or_else(|| AppError::ParseFailure("missing multipart field 'file'".to_string()))
}
