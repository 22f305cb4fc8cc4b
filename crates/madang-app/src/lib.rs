//! Madang application layer
//!
//! Wires settings, logging, the driver registry and the table gateway into a
//! [`TableBrowser`] session. The windowed front end renders the browser's
//! grid and dialogs and implements [`Notifier`] for modal messages.

pub mod browser;
pub mod logging;
pub mod notify;
pub mod settings;

use anyhow::{Context, Result};
use madang_drivers::DriverRegistry;
use madang_services::{ErrorLog, TableGateway};

pub use browser::{TableBrowser, TableView};
pub use notify::{LogNotifier, Notification, Notifier, Severity};
pub use settings::Settings;

/// Build a gateway for the configured driver and database.
///
/// Nothing is opened yet; the first operation connects.
pub fn gateway_from_settings(settings: &Settings) -> Result<TableGateway> {
    let registry = DriverRegistry::with_defaults();
    let driver = registry
        .require(&settings.connection.driver)
        .with_context(|| format!("Available drivers: {}", registry.list().join(", ")))?;

    tracing::info!(
        driver = %settings.connection.driver,
        database = %settings.connection.database,
        "gateway configured"
    );
    Ok(TableGateway::new(driver, settings.connection.clone())
        .with_error_log(ErrorLog::new(&settings.error_log_dir)))
}

/// Load settings, start logging, and open a browsing session.
///
/// Keep the returned guard alive for as long as file logging should run.
pub fn bootstrap<N: Notifier>(notifier: N) -> Result<(TableBrowser<N>, logging::LoggingGuard)> {
    let settings = Settings::load().context("Failed to load settings")?;
    let guard = logging::init(logging::LoggingConfig::for_profile(settings.logging))?;
    let gateway = gateway_from_settings(&settings)?;
    Ok((TableBrowser::new(gateway, notifier), guard))
}
