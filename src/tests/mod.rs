//! tests/mod.rs
//! Helpers compartidos por las pruebas.

mod email_tests;
mod record_tests;

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::{
    config::app_config::AppConfig,
    errors::RecordFailure,
    models::{email_model::OutboundEmail, record_model::Record},
    services::{email_service::MailTransport, record_store_service::RecordStoreService},
};

/// Transporte falso: guarda lo enviado y falla para los destinatarios indicados.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub fail_for: HashSet<String>,
    pub calls: AtomicUsize,
}

impl RecordingTransport {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            fail_for: recipients.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.recipient.clone())
            .collect()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: OutboundEmail) -> Result<(), RecordFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_for.contains(&email.recipient) {
            return Err(RecordFailure::Transport(
                "550 mailbox unavailable".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Registro a partir de pares (campo, valor).
pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

/// BD SQLite en un directorio temporal, con migraciones aplicadas.
/// El `TempDir` debe vivir mientras se use el store.
pub async fn temp_store() -> (RecordStoreService, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("attendees.db").display());
    let store = RecordStoreService::connect(&url)
        .await
        .expect("Failed to open test database");
    store
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    (store, dir)
}

pub fn test_config(extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = [
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_USER", "events@example.com"),
        ("SMTP_PASS", "secret"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}
