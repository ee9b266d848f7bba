//! services/email_service.rs
//! Transporte de correo saliente. `SmtpMailer` es la implementación real;
//! el motor de envío solo conoce el trait `MailTransport`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{
        header::{ContentDisposition, ContentType},
        Body, Mailbox, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::app_config::MailConfig,
    errors::RecordFailure,
    models::email_model::OutboundEmail,
};

/// Puerto SMTP con TLS implícito; el resto usa STARTTLS.
const SMTPS_PORT: u16 = 465;

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Envía un único mensaje. Cualquier error queda a nivel de registro.
    async fn send(&self, email: OutboundEmail) -> Result<(), RecordFailure>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        // lettre se encarga de citar el nombre si trae ',' '(' etc.
        let address: Address = config
            .sender_address
            .parse()
            .context("Invalid from address")?;
        let from = Mailbox::new(config.sender_name.clone(), address);

        let tls_params = TlsParameters::new(config.smtp_host.clone())
            .context("No se pudieron armar los parámetros TLS")?;
        let tls = if config.smtp_port == SMTPS_PORT {
            Tls::Wrapper(tls_params)
        } else {
            Tls::Required(tls_params)
        };

        let timeout = Duration::from_secs(config.timeout_secs);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("SMTP host inválido: {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .tls(tls)
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            mailer,
            from,
            timeout,
        })
    }

    /// Abre una conexión autenticada para validar credenciales al arrancar.
    pub async fn verify(&self) -> Result<()> {
        let ok = self
            .mailer
            .test_connection()
            .await
            .context("No se pudo conectar al servidor SMTP")?;
        if !ok {
            return Err(anyhow!("El servidor SMTP rechazó la conexión"));
        }
        Ok(())
    }

    pub(crate) fn build_message(&self, email: OutboundEmail) -> Result<Message> {
        let to: Mailbox = email
            .recipient
            .parse()
            .context("Invalid recipient address")?;

        let body_part = if email.is_html {
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(email.body)
        } else {
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(email.body)
        };

        let mut multipart = MultiPart::mixed().singlepart(body_part);

        for attach in email.attachments {
            let part = SinglePart::builder()
                .header(ContentType::parse(attach.content_type.as_str())?)
                .header(ContentDisposition::attachment(&attach.filename))
                .body(Body::new(attach.data));
            multipart = multipart.singlepart(part);
        }

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(multipart)
            .context("No se pudo construir el mensaje")
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), RecordFailure> {
        let message = self
            .build_message(email)
            .map_err(|e| RecordFailure::Transport(format!("{e:#}")))?;

        match tokio::time::timeout(self.timeout, self.mailer.send(message)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(RecordFailure::Transport(e.to_string())),
            Err(_) => Err(RecordFailure::Transport(format!(
                "timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
