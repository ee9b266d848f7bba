//! config/app_config.rs
//! Configuración del servicio, leída de variables de entorno (.env incluido).

use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Context, Result};

/// Configuración del transporte SMTP.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub sender_address: String,
    pub sender_name: Option<String>,
    /// Tiempo máximo por envío individual
    pub timeout_secs: u64,
    /// Probar conexión y credenciales SMTP al arrancar
    pub verify_on_startup: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Envíos simultáneos durante un broadcast (1 = secuencial)
    pub dispatch_concurrency: usize,
    pub upload_limit_bytes: usize,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la config usando `lookup` para resolver cada variable.
    /// Faltan credenciales SMTP => error (fatal al arrancar).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mail = MailConfig {
            smtp_host: required(&lookup, "SMTP_HOST")?,
            smtp_port: parse_or(&lookup, "SMTP_PORT", 465)?,
            smtp_user: required(&lookup, "SMTP_USER")?,
            smtp_pass: required_secret(&lookup, "SMTP_PASS")?,
            sender_address: match non_empty(&lookup, "SENDER_ADDRESS") {
                Some(addr) => addr,
                None => required(&lookup, "SMTP_USER")?,
            },
            sender_name: non_empty(&lookup, "SENDER_NAME"),
            timeout_secs: parse_or(&lookup, "SMTP_TIMEOUT_SECS", 30)?,
            verify_on_startup: parse_or(&lookup, "SMTP_VERIFY", true)?,
        };

        let dispatch_concurrency: usize = parse_or(&lookup, "DISPATCH_CONCURRENCY", 1)?;
        if dispatch_concurrency == 0 {
            return Err(anyhow!("DISPATCH_CONCURRENCY debe ser mayor que 0"));
        }

        Ok(Self {
            host: non_empty(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            database_url: non_empty(&lookup, "DATABASE_URL")
                .unwrap_or_else(|| "sqlite:data/attendees.db".to_string()),
            dispatch_concurrency,
            upload_limit_bytes: parse_or(&lookup, "UPLOAD_LIMIT_BYTES", 10 * 1024 * 1024)?,
            mail,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).ok_or_else(|| anyhow!("Falta la variable de entorno {key}"))
}

/// Como `required`, pero sin recortar: los espacios de un secreto son parte
/// del valor. Solo se rechaza si queda vacío.
fn required_secret<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("Falta la variable de entorno {key}"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Valor inválido para {key}: {raw}")),
        None => {
            log::debug!("{key} no definido, usando valor por defecto");
            Ok(default)
        }
    }
}
