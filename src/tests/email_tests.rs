//! tests/email_tests.rs
//! Armado del mensaje MIME de `SmtpMailer` sin abrir conexión.

#[cfg(test)]
mod tests {
    use actix_rt::test;

    use crate::errors::RecordFailure;
    use crate::models::email_model::{EmailAttachment, OutboundEmail};
    use crate::services::email_service::{MailTransport, SmtpMailer};
    use crate::services::qr_service::{QR_CONTENT_TYPE, QR_FILENAME};
    use crate::tests::test_config;

    fn mailer(extra: &[(&str, &str)]) -> SmtpMailer {
        SmtpMailer::new(&test_config(extra).mail).unwrap()
    }

    fn email(recipient: &str, is_html: bool) -> OutboundEmail {
        OutboundEmail {
            recipient: recipient.to_string(),
            subject: "Tu entrada".to_string(),
            body: "<p>Nos vemos</p>".to_string(),
            is_html,
            attachments: vec![EmailAttachment {
                filename: QR_FILENAME.to_string(),
                content_type: QR_CONTENT_TYPE.to_string(),
                data: b"\x89PNG\r\n\x1a\nfake".to_vec(),
            }],
        }
    }

    fn formatted(mailer: &SmtpMailer, email: OutboundEmail) -> String {
        let message = mailer.build_message(email).unwrap();
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    async fn test_html_and_plain_bodies() {
        let m = mailer(&[]);

        let html = formatted(&m, email("ana@x.com", true));
        assert!(html.contains("Content-Type: text/html"));
        assert!(!html.contains("Content-Type: text/plain"));

        let plain = formatted(&m, email("ana@x.com", false));
        assert!(plain.contains("Content-Type: text/plain"));
        assert!(!plain.contains("Content-Type: text/html"));
    }

    #[test]
    async fn test_headers_and_attachment() {
        let out = formatted(&mailer(&[]), email("ana@x.com", true));

        assert!(out.contains("Subject: Tu entrada"));
        assert!(out.contains("To: ana@x.com"));
        // Sin SENDER_NAME el From es la dirección sola
        assert!(out.contains("From: events@example.com"));
        assert!(out.contains("multipart/mixed"));
        assert!(out.contains("Content-Type: image/png"));
        assert!(out.contains("Content-Disposition: attachment"));
        assert!(out.contains(QR_FILENAME));
    }

    #[test]
    async fn test_sender_name_with_special_characters() {
        for name in ["TEDx, University of Algiers", "Eventos (2025)", "Event Team"] {
            let out = formatted(&mailer(&[("SENDER_NAME", name)]), email("ana@x.com", false));
            let from = out
                .lines()
                .find(|l| l.starts_with("From: "))
                .unwrap_or_default();
            assert!(from.contains(name), "From sin el nombre: {from}");
            assert!(from.ends_with("<events@example.com>"), "From inválido: {from}");
        }
    }

    #[test]
    async fn test_invalid_sender_address_fails_at_startup() {
        let config = test_config(&[("SENDER_ADDRESS", "not an address")]);
        assert!(SmtpMailer::new(&config.mail).is_err());
    }

    #[test]
    async fn test_unparsable_recipient_is_a_transport_failure() {
        let m = mailer(&[]);
        assert!(m.build_message(email("not an address", false)).is_err());

        // Falla al armar el mensaje, antes de tocar la red
        let res = m.send(email("not an address", false)).await;
        match res {
            Err(RecordFailure::Transport(reason)) => {
                assert!(reason.contains("Invalid recipient address"))
            }
            other => panic!("se esperaba Transport, llegó {other:?}"),
        }
    }
}
