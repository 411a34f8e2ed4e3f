use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use autoshop_core::{Error, Result};

use crate::config::LogConfig;

/// Install the global subscriber.
///
/// Logs go to stderr so stdout only carries records and operator messages.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|err| Error::Config(format!("log filter '{}': {err}", config.filter)))?;

    let layer = tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(log_writer(config)?);

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_ansi(false))
            .try_init()
    };
    installed.map_err(|err| Error::Config(format!("logging: {err}")))
}

/// Stderr, or the configured file opened for append.
///
/// Concurrent events share the file through a mutex so lines never interleave.
fn log_writer(config: &LogConfig) -> Result<BoxMakeWriter> {
    let Some(path) = &config.file else {
        return Ok(BoxMakeWriter::new(io::stderr));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| Error::Config(format!("log file {}: {err}", path.display())))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}
