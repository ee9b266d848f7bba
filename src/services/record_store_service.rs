//! services/record_store_service.rs
//! Persistencia de asistentes y columnas en SQLite.
//!
//! Filas y columnas se reemplazan/borran siempre dentro de la misma
//! transacción: nunca queda visible una mezcla de dos archivos.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{
    errors::AppError,
    models::record_model::{ColumnSet, Record},
};

#[derive(Clone, Debug)]
pub struct RecordStoreService {
    db_pool: Pool<Sqlite>,
}

impl RecordStoreService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        RecordStoreService { db_pool }
    }

    /// Abre (o crea) la BD indicada por `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("DATABASE_URL inválida: {database_url}"))?
            .create_if_missing(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("No se pudo conectar a SQLite en {database_url}"))?;

        Ok(Self::new(db_pool))
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo en migraciones de 'attendees'")?;
        Ok(())
    }

    /// Todos los registros, en el orden en que se subieron.
    pub async fn list_all(&self) -> Result<Vec<Record>, AppError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT data FROM attendees ORDER BY position ASC")
                .fetch_all(&self.db_pool)
                .await?;

        rows.into_iter()
            .map(|(data,)| {
                serde_json::from_str::<Record>(&data).map_err(|e| {
                    AppError::StoreUnavailable(format!("registro corrupto en attendees: {e}"))
                })
            })
            .collect()
    }

    /// Columnas vigentes; vacío si no hay nada subido.
    pub async fn list_columns(&self) -> Result<ColumnSet, AppError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT headers FROM column_sets WHERE id = 1")
                .fetch_optional(&self.db_pool)
                .await?;

        match row {
            Some((headers,)) => {
                let headers = serde_json::from_str(&headers).map_err(|e| {
                    AppError::StoreUnavailable(format!("columnas corruptas: {e}"))
                })?;
                Ok(ColumnSet { headers })
            }
            None => Ok(ColumnSet::default()),
        }
    }

    /// Reemplaza filas y columnas de forma atómica.
    pub async fn replace_all(&self, records: &[Record], columns: &[String]) -> Result<(), AppError> {
        let headers = serde_json::to_string(columns)
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        let uploaded_at = Utc::now().to_rfc3339();

        let mut tx = self.db_pool.begin().await?;

        sqlx::query("DELETE FROM attendees").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM column_sets").execute(&mut *tx).await?;

        for (position, record) in records.iter().enumerate() {
            let data = serde_json::to_string(record)
                .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
            sqlx::query("INSERT INTO attendees (position, data) VALUES (?1, ?2)")
                .bind(position as i64)
                .bind(data)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("INSERT INTO column_sets (id, headers, uploaded_at) VALUES (1, ?1, ?2)")
            .bind(headers)
            .bind(uploaded_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!(
            "(replace_all) Guardados {} registros con {} columnas",
            records.len(),
            columns.len()
        );
        Ok(())
    }

    /// Borra filas y columnas de forma atómica.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        let mut tx = self.db_pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM attendees")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM column_sets").execute(&mut *tx).await?;
        tx.commit().await?;

        log::info!("(clear_all) Eliminados {} registros", deleted);
        Ok(())
    }
}
