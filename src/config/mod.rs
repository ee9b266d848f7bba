//! config/mod.rs

pub mod app_config;
