//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod csv_ingest_service;
pub mod dispatch_service;
pub mod email_service;
pub mod qr_service;
pub mod record_store_service;
