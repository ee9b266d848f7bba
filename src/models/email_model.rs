//! models/email_model.rs

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Mensaje listo para el transporte: un destinatario, un cuerpo.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    pub attachments: Vec<EmailAttachment>,
}
