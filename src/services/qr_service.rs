//! services/qr_service.rs
//! Genera el PNG con el código QR de cada asistente.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

use crate::{errors::RecordFailure, models::record_model::Record};

pub const QR_FILENAME: &str = "attendee-qr-code.png";
pub const QR_CONTENT_TYPE: &str = "image/png";

/// Tamaño mínimo (px) del lado del QR renderizado.
const QR_MIN_DIMENSION: u32 = 300;

/// Texto canónico del registro: JSON compacto con los campos en su orden.
pub fn record_payload(record: &Record) -> Result<String, RecordFailure> {
    serde_json::to_string(record).map_err(|e| RecordFailure::Encoding(e.to_string()))
}

/// Codifica `payload` como QR y lo devuelve en PNG.
/// Si no entra en la capacidad del QR, falla solo este registro.
pub fn encode_png(payload: &str) -> Result<Vec<u8>, RecordFailure> {
    let code =
        QrCode::new(payload.as_bytes()).map_err(|e| RecordFailure::Encoding(e.to_string()))?;

    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RecordFailure::Encoding(e.to_string()))?;

    Ok(png)
}

/// Atajo: registro -> PNG.
pub fn encode_record(record: &Record) -> Result<Vec<u8>, RecordFailure> {
    encode_png(&record_payload(record)?)
}
