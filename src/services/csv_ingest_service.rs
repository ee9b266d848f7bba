//! services/csv_ingest_service.rs
//! Convierte el CSV subido en filas + columnas.

use crate::{errors::AppError, models::record_model::Record};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Resultado del parseo: filas en orden de archivo y columnas del encabezado.
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub rows: Vec<Record>,
    pub columns: Vec<String>,
}

/// Parsea un CSV con encabezado.
///
/// Filas cortas: los campos que faltan al final quedan ausentes (no nulos).
/// Filas largas: lo que sobra respecto al encabezado se descarta.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedTable, AppError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(AppError::EmptyFile);
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        if row.len() > columns.len() {
            log::debug!(
                "(parse_csv) Fila {} trae {} campos de más, se descartan",
                idx + 2,
                row.len() - columns.len()
            );
        }

        let record: Record = columns
            .iter()
            .zip(row.iter())
            .map(|(col, value)| (col.clone(), value.to_string()))
            .collect();
        rows.push(record);
    }

    if rows.is_empty() {
        return Err(AppError::EmptyFile);
    }

    log::info!(
        "(parse_csv) CSV parseado: {} filas, columnas={:?}",
        rows.len(),
        columns
    );
    Ok(ParsedTable { rows, columns })
}
