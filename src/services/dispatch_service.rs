//! services/dispatch_service.rs
//! Envío masivo: filtra registros con Email válido, genera un QR por
//! registro, manda un correo por registro y arma el reporte agregado.
//!
//! Un fallo de un registro (QR o SMTP) nunca corta el lote.

use std::{str::FromStr, sync::Arc};

use futures::stream::{self, StreamExt};
use lettre::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::{
    errors::{AppError, RecordFailure},
    models::{
        dispatch_model::{DispatchFailure, DispatchOutcome, DispatchRequest},
        email_model::{EmailAttachment, OutboundEmail},
        record_model::Record,
    },
    services::{
        email_service::MailTransport,
        qr_service::{self, QR_CONTENT_TYPE, QR_FILENAME},
    },
};

/// Forma general: local@dominio, sin espacios, un solo '@' y al menos un '.'
/// en el dominio con etiquetas no vacías.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email regex is valid")
});

/// Una sola dirección válida: la forma general más la sintaxis que acepta
/// lettre (rechaza `<a@x.com>`, `a,b@x.com`, `a@x.com;`, ...).
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate) && Address::from_str(candidate).is_ok()
}

/// Registro apto para envío, con su Email ya recortado.
#[derive(Debug)]
pub struct Eligible<'a> {
    pub record: &'a Record,
    pub email: &'a str,
}

/// Separa los registros con Email válido. Devuelve los aptos (en orden)
/// y la cantidad de descartados; cada descarte queda en el log.
pub fn filter_eligible(records: &[Record]) -> (Vec<Eligible<'_>>, usize) {
    let mut eligible = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (idx, record) in records.iter().enumerate() {
        match record.email() {
            Some(email) if is_valid_email(email) => eligible.push(Eligible { record, email }),
            other => {
                skipped += 1;
                let who = record
                    .display_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("fila {}", idx + 1));
                log::warn!(
                    "(filter_eligible) Se omite '{}': Email {}",
                    who,
                    match other {
                        Some(e) => format!("inválido ({e:?})"),
                        None => "ausente o vacío".to_string(),
                    }
                );
            }
        }
    }

    (eligible, skipped)
}

#[derive(Clone)]
pub struct DispatchService {
    transport: Arc<dyn MailTransport>,
    concurrency: usize,
}

impl DispatchService {
    pub fn new(transport: Arc<dyn MailTransport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    /// Ejecuta el broadcast sobre `records` (snapshot leído por el caller).
    ///
    /// Sin destinatarios válidos falla con `NoEligibleRecipients` sin tocar
    /// el transporte. Con `concurrency > 1` los envíos se solapan, pero el
    /// reporte conserva el orden de entrada.
    pub async fn dispatch(
        &self,
        req: &DispatchRequest,
        records: &[Record],
    ) -> Result<DispatchOutcome, AppError> {
        let dispatch_id = Uuid::new_v4();
        let (eligible, skipped) = filter_eligible(records);

        if eligible.is_empty() {
            log::warn!(
                "(dispatch) {} sin destinatarios válidos ({} registros revisados)",
                dispatch_id,
                records.len()
            );
            return Err(AppError::NoEligibleRecipients);
        }

        let eligible_count = eligible.len();
        log::info!(
            "(dispatch) Iniciando {}: {} elegibles, {} omitidos, html={}",
            dispatch_id,
            eligible_count,
            skipped,
            req.is_html
        );

        let results: Vec<Result<(), DispatchFailure>> = stream::iter(eligible)
            .map(|target| self.process_record(req, target))
            .buffered(self.concurrency)
            .collect()
            .await;

        let failures: Vec<DispatchFailure> = results.into_iter().filter_map(Result::err).collect();
        let outcome = DispatchOutcome::from_failures(dispatch_id, eligible_count, skipped, failures);

        log::info!(
            "(dispatch) Finalizado {}: status={:?}, enviados={}, fallidos={}",
            dispatch_id,
            outcome.status,
            outcome.sent_count,
            outcome.failures.len()
        );
        Ok(outcome)
    }

    async fn process_record(
        &self,
        req: &DispatchRequest,
        target: Eligible<'_>,
    ) -> Result<(), DispatchFailure> {
        let recipient = target.email.to_string();

        let result = match qr_service::encode_record(target.record) {
            Ok(png) => {
                let email = OutboundEmail {
                    recipient: recipient.clone(),
                    subject: req.subject.clone(),
                    body: req.body.clone(),
                    is_html: req.is_html,
                    attachments: vec![EmailAttachment {
                        filename: QR_FILENAME.to_string(),
                        content_type: QR_CONTENT_TYPE.to_string(),
                        data: png,
                    }],
                };
                self.transport.send(email).await
            }
            Err(e) => Err(e),
        };

        result.map_err(|e: RecordFailure| {
            log::error!("(process_record) Fallo para '{}': {}", recipient, e);
            DispatchFailure {
                identifier: recipient,
                reason: e.to_string(),
            }
        })
    }
}
