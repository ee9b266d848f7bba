//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod dispatch_model;
pub mod email_model;
pub mod record_model;
